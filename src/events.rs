//! Outbound display events
//!
//! Two ways to listen: a callback registered per event kind (runs on the UI
//! thread, synchronously) or a channel subscription that receives every event.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::view_state::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// Fresh capture after any zoom, visibility or axis change
    StateChanged(ViewState),
    /// Hz value of a pick gesture
    FrequencySelected(f64),
}

type StateCallback = Box<dyn FnMut(&ViewState)>;
type FrequencyCallback = Box<dyn FnMut(f64)>;

#[derive(Default)]
pub struct EventHub {
    state_callbacks: Vec<StateCallback>,
    frequency_callbacks: Vec<FrequencyCallback>,
    subscribers: Vec<Sender<DisplayEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_state_changed(&mut self, callback: impl FnMut(&ViewState) + 'static) {
        self.state_callbacks.push(Box::new(callback));
    }

    pub fn on_frequency_selected(&mut self, callback: impl FnMut(f64) + 'static) {
        self.frequency_callbacks.push(Box::new(callback));
    }

    /// Receiver for every event from now on
    pub fn subscribe(&mut self) -> Receiver<DisplayEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit(&mut self, event: DisplayEvent) {
        match &event {
            DisplayEvent::StateChanged(state) => {
                for callback in self.state_callbacks.iter_mut() {
                    callback(state);
                }
            }
            DisplayEvent::FrequencySelected(hz) => {
                for callback in self.frequency_callbacks.iter_mut() {
                    callback(*hz);
                }
            }
        }

        // Retain only subscribers whose channel is still open
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("state_callbacks", &self.state_callbacks.len())
            .field("frequency_callbacks", &self.frequency_callbacks.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state() -> ViewState {
        ViewState {
            zoom_stack: vec![crate::zoom::Rect::new(0.0, -100.0, 1.0, 0.0)],
            zoom_index: 0,
            visibility: vec![true],
        }
    }

    #[test]
    fn test_callbacks_get_their_kind_only() {
        let mut hub = EventHub::new();
        let seen_states = Rc::new(RefCell::new(0));
        let seen_hz = Rc::new(RefCell::new(Vec::new()));

        let s = seen_states.clone();
        hub.on_state_changed(move |_| *s.borrow_mut() += 1);
        let h = seen_hz.clone();
        hub.on_frequency_selected(move |hz| h.borrow_mut().push(hz));

        hub.emit(DisplayEvent::StateChanged(state()));
        hub.emit(DisplayEvent::FrequencySelected(1.5e6));

        assert_eq!(*seen_states.borrow(), 1);
        assert_eq!(*seen_hz.borrow(), vec![1.5e6]);
    }

    #[test]
    fn test_subscribers_receive_everything_in_order() {
        let mut hub = EventHub::new();
        let rx = hub.subscribe();
        hub.emit(DisplayEvent::FrequencySelected(10.0));
        hub.emit(DisplayEvent::StateChanged(state()));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![DisplayEvent::FrequencySelected(10.0), DisplayEvent::StateChanged(state())]
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut hub = EventHub::new();
        let keep = hub.subscribe();
        drop(hub.subscribe());
        assert_eq!(hub.subscriber_count(), 2);

        hub.emit(DisplayEvent::FrequencySelected(1.0));
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), DisplayEvent::FrequencySelected(1.0));
    }
}

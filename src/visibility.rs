//! Visibility reconciliation
//!
//! Traces get created by the data path whenever the first frame for a channel
//! shows up, which is often after a saved view state was restored. A restored
//! visibility vector is therefore stashed and applied only once the trace
//! count matches its length.

use crate::trace::Trace;

#[derive(Debug, Clone, Default)]
pub struct VisibilitySynchronizer {
    /// Restored vector waiting for the trace count to catch up
    pending: Option<Vec<bool>>,
}

impl VisibilitySynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live visibility flags in creation order
    pub fn capture(traces: &[Trace]) -> Vec<bool> {
        traces.iter().map(|t| t.visible).collect()
    }

    /// Stash a restored vector and try to apply it right away.
    ///
    /// Returns true if it was applied.
    pub fn restore(&mut self, visibility: Vec<bool>, traces: &mut [Trace]) -> bool {
        self.pending = Some(visibility);
        self.apply_if_ready(traces)
    }

    /// Called after every trace attach
    pub fn on_trace_attached(&mut self, traces: &mut [Trace]) -> bool {
        self.apply_if_ready(traces)
    }

    /// Apply the pending vector if (and only if) its length equals the trace
    /// count, then drop it. Mismatched lengths leave it stashed untouched.
    pub fn apply_if_ready(&mut self, traces: &mut [Trace]) -> bool {
        let ready = matches!(&self.pending, Some(pending) if pending.len() == traces.len());
        if !ready {
            if let Some(pending) = &self.pending {
                tracing::debug!(
                    "[Visibility] Holding {} flag(s), {} trace(s) attached",
                    pending.len(),
                    traces.len()
                );
            }
            return false;
        }

        if let Some(pending) = self.pending.take() {
            for (trace, visible) in traces.iter_mut().zip(pending) {
                trace.set_visible(visible);
            }
            tracing::debug!("[Visibility] Applied restored flags to {} trace(s)", traces.len());
        }
        true
    }

    /// Legend checkbox flipped by the user. Never touches the pending vector.
    pub fn on_checkbox_toggled(trace: &mut Trace, checked: bool) {
        trace.set_visible(checked);
    }

    pub fn pending(&self) -> Option<&[bool]> {
        self.pending.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// =============== Tests ==================
#[cfg(test)]
mod tests {
    use super::*;

    fn traces(n: usize) -> Vec<Trace> {
        (0..n).map(|i| Trace::new(format!("ch{}", i), i)).collect()
    }

    fn flags(traces: &[Trace]) -> Vec<(bool, Option<bool>)> {
        traces.iter().map(|t| (t.visible, t.is_checked())).collect()
    }

    #[test]
    fn test_capture_in_creation_order() {
        let mut t = traces(3);
        t[1].set_visible(false);
        assert_eq!(VisibilitySynchronizer::capture(&t), vec![true, false, true]);
    }

    #[test]
    fn test_restore_applies_immediately_when_counts_match() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(2);
        assert!(sync.restore(vec![false, true], &mut t));
        assert_eq!(flags(&t), vec![(false, Some(false)), (true, Some(true))]);
        assert!(!sync.has_pending());
    }

    #[test]
    fn test_restore_waits_for_third_trace() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(2);

        assert!(!sync.restore(vec![true, false, true], &mut t));
        assert_eq!(flags(&t), vec![(true, Some(true)), (true, Some(true))]);
        assert_eq!(sync.pending(), Some(&[true, false, true][..]));

        t.push(Trace::new("ch2", 2));
        assert!(sync.on_trace_attached(&mut t));
        assert_eq!(
            flags(&t),
            vec![(true, Some(true)), (false, Some(false)), (true, Some(true))]
        );
        assert_eq!(sync.pending(), None);
    }

    #[test]
    fn test_apply_happens_exactly_once() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(1);
        sync.restore(vec![true, false], &mut t);

        t.push(Trace::new("ch1", 1));
        assert!(sync.on_trace_attached(&mut t));

        // user re-enables trace 1; later attaches must not re-apply
        VisibilitySynchronizer::on_checkbox_toggled(&mut t[1], true);
        t.push(Trace::new("ch2", 2));
        assert!(!sync.on_trace_attached(&mut t));
        assert!(t[1].visible);
    }

    #[test]
    fn test_shorter_vector_never_applies() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(3);
        assert!(!sync.restore(vec![false, false], &mut t));
        t.push(Trace::new("ch3", 3));
        assert!(!sync.on_trace_attached(&mut t));
        assert!(t.iter().all(|t| t.visible));
        // stays stashed indefinitely
        assert_eq!(sync.pending(), Some(&[false, false][..]));
    }

    #[test]
    fn test_checkbox_toggle_leaves_pending_alone() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(1);
        sync.restore(vec![true, true], &mut t);

        VisibilitySynchronizer::on_checkbox_toggled(&mut t[0], false);
        assert!(!t[0].visible);
        assert_eq!(t[0].is_checked(), Some(false));
        assert_eq!(sync.pending(), Some(&[true, true][..]));
    }

    #[test]
    fn test_new_restore_replaces_pending() {
        let mut sync = VisibilitySynchronizer::new();
        let mut t = traces(1);
        sync.restore(vec![false, false, false], &mut t);
        sync.restore(vec![false, true], &mut t);

        t.push(Trace::new("ch1", 1));
        assert!(sync.on_trace_attached(&mut t));
        assert_eq!(VisibilitySynchronizer::capture(&t), vec![false, true]);
    }
}

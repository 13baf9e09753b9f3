use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, Receiver};

use periodogram_display::{DisplayConfig, DisplayEvent, ViewState};

use crate::settings;

/// Quiet time before pending writes hit the disk
const FLUSH_AFTER: Duration = Duration::from_millis(500);

/// Consumer of state-changed notifications and settings snapshots.
///
/// Only the latest of each is kept; it is written once the UI has been quiet
/// for a moment, and again on exit. The thread ends when the GUI drops its
/// end of either channel.
pub fn start(
    events: Receiver<DisplayEvent>,
    settings_rx: Receiver<DisplayConfig>,
    view_state_file: PathBuf,
    settings_file: PathBuf,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::info!("[Persist] Writing view state to {}", view_state_file.display());

        let mut pending_state: Option<ViewState> = None;
        let mut pending_config: Option<DisplayConfig> = None;
        let mut writes = 0u32;

        loop {
            select! {
                recv(events) -> msg => match msg {
                    Ok(DisplayEvent::StateChanged(state)) => pending_state = Some(state),
                    Ok(DisplayEvent::FrequencySelected(_)) => {}
                    Err(_) => break,
                },
                recv(settings_rx) -> msg => match msg {
                    Ok(config) => pending_config = Some(config),
                    Err(_) => break,
                },
                default(FLUSH_AFTER) => {
                    writes += flush(&mut pending_state, &mut pending_config, &view_state_file, &settings_file);
                }
            }
        }

        // drain whatever is still queued, then write it out
        for event in events.try_iter() {
            if let DisplayEvent::StateChanged(state) = event {
                pending_state = Some(state);
            }
        }
        if let Some(config) = settings_rx.try_iter().last() {
            pending_config = Some(config);
        }
        writes += flush(&mut pending_state, &mut pending_config, &view_state_file, &settings_file);
        tracing::info!("[Persist] Shutdown ({} write(s))", writes);
    })
}

fn flush(
    pending_state: &mut Option<ViewState>,
    pending_config: &mut Option<DisplayConfig>,
    view_state_file: &Path,
    settings_file: &Path,
) -> u32 {
    let mut writes = 0;

    if let Some(state) = pending_state.take() {
        let result = state
            .to_blob()
            .map_err(anyhow::Error::from)
            .and_then(|blob| settings::save_view_state(view_state_file, &blob));
        match result {
            Ok(()) => {
                tracing::debug!(
                    "[Persist] View state saved (depth {}, {} trace(s))",
                    state.zoom_index,
                    state.visibility.len()
                );
                writes += 1;
            }
            Err(e) => tracing::error!("[Persist] Failed to save view state: {:#}", e),
        }
    }

    if let Some(config) = pending_config.take() {
        match settings::save_config(settings_file, &config) {
            Ok(()) => {
                tracing::debug!("[Persist] Settings saved");
                writes += 1;
            }
            Err(e) => tracing::error!("[Persist] Failed to save settings: {:#}", e),
        }
    }

    writes
}

// === Tests ====
#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use periodogram_display::Rect;

    #[test]
    fn test_last_state_is_written_on_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("view_state.json");
        let settings_file = dir.path().join("settings.json");

        let (event_tx, event_rx) = unbounded();
        let (settings_tx, settings_rx) = unbounded();
        let worker = start(event_rx, settings_rx, state_file.clone(), settings_file.clone());

        let state = |depth: usize| ViewState {
            zoom_stack: vec![Rect::new(0.0, -100.0, 1.0, 0.0); depth + 1],
            zoom_index: depth,
            visibility: vec![true, false],
        };
        event_tx.send(DisplayEvent::StateChanged(state(0))).unwrap();
        event_tx.send(DisplayEvent::FrequencySelected(5.0)).unwrap();
        event_tx.send(DisplayEvent::StateChanged(state(2))).unwrap();
        settings_tx.send(DisplayConfig::default()).unwrap();
        drop(event_tx);
        drop(settings_tx);
        worker.join().unwrap();

        let blob = std::fs::read(&state_file).unwrap();
        assert_eq!(ViewState::from_blob(&blob).unwrap(), state(2));
        assert!(settings_file.exists());
    }
}

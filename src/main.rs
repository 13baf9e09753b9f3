mod gui;
mod logging;
mod persistence;
mod settings;
mod signal_source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use crossbeam_channel::unbounded;
use eframe::egui;
use time::UtcOffset;

use periodogram_display::SpectrumDisplayController;

use crate::gui::PeriodogramApp;
use crate::settings::AppPaths;
use crate::signal_source::SourceSettings;

/// Channels the synthetic source produces
const DEMO_CHANNELS: usize = 3;

fn main() -> anyhow::Result<()> {
    // must be resolved while we are still single-threaded
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let paths = AppPaths::discover();
    if let Some(paths) = &paths {
        paths.create_dirs()?;
    }
    let _log_guard = logging::init(paths.as_ref().map(|p| p.log_dir.as_path()), offset);

    tracing::info!("=== Periodogram v{} ===", env!("CARGO_PKG_VERSION"));

    // === Configuration ===
    let config = match &paths {
        Some(paths) => settings::load_or_create(&paths.settings_file)?,
        None => {
            tracing::warn!("[Main] No home directory, running without saved settings");
            settings::first_run_config()
        }
    };

    let mut display = SpectrumDisplayController::new(config.clone());

    // Restore the last view. Traces don't exist yet, so visibility waits for them.
    if let Some(blob) = paths.as_ref().and_then(|p| settings::load_view_state(&p.view_state_file)) {
        match display.restore_state_blob(&blob) {
            Ok(()) => tracing::info!("[Main] Restored view state"),
            Err(e) => tracing::warn!("[Main] Ignoring saved view state: {}", e),
        }
    }

    // === Wiring ===
    let shutdown = Arc::new(AtomicBool::new(false));
    let (retune_tx, retune_rx) = unbounded();
    let (picks_tx, picks_rx) = unbounded();
    display.on_frequency_selected(move |hz| {
        tracing::info!("[Main] Frequency selected: {:.0} Hz", hz);
        let _ = retune_tx.send(hz);
        let _ = picks_tx.send(hz);
    });

    let (settings_tx, settings_rx) = unbounded();
    let persist = paths.as_ref().map(|p| {
        persistence::start(
            display.subscribe(),
            settings_rx,
            p.view_state_file.clone(),
            p.settings_file.clone(),
        )
    });

    let frames_rx = signal_source::start(
        SourceSettings::from_config(&config, DEMO_CHANNELS),
        display.handle(),
        retune_rx,
        shutdown.clone(),
    );

    // === GUI ===
    tracing::info!("[Main] Starting GUI...");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 600.0])
            .with_title("Periodogram"),
        ..Default::default()
    };

    let app = PeriodogramApp::new(display, frames_rx, settings_tx, picks_rx);
    let result = eframe::run_native("Periodogram", options, Box::new(|_cc| Ok(Box::new(app))));

    // The window has closed and the app (with its channel ends) is gone
    shutdown.store(true, Ordering::Relaxed);
    if let Some(handle) = persist {
        if handle.join().is_err() {
            tracing::error!("[Main] Persistence thread panicked");
        }
    }

    result.map_err(|e| anyhow!("eframe: {e}"))?;
    tracing::info!("[Main] ✓ Shutdown complete");
    Ok(())
}

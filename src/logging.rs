use std::path::Path;

use time::macros::format_description;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install console + (optional) daily file logging.
///
/// `offset` must be resolved before any thread is spawned. `RUST_LOG`
/// overrides the default `info` filter. Keep the returned guard alive until
/// exit or the file writer stops flushing.
pub fn init(log_dir: Option<&Path>, offset: UtcOffset) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = OffsetTime::new(
        offset,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );

    let console = fmt::layer().with_target(false).with_timer(timer.clone());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "periodogram.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            None
        }
    }
}

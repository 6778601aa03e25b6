//! File logging. The terminal belongs to the UI, so logs never go to
//! stdout; without `--log-file` nothing is installed.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "POKEDEX_LOG";

/// Install a file subscriber. Keep the returned guard alive until exit
/// so buffered lines get flushed.
pub fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let path = log_file?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name()?;

    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let appender = tracing_appender::rolling::never(parent, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        return None;
    }
    Some(guard)
}

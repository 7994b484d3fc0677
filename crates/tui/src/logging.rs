use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Sends diagnostics to `path`. The terminal belongs to the UI, so nothing is
/// installed without a log file.
pub fn init_logging(path: Option<&Path>) -> io::Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
    tracing::info!(path = %path.display(), "logging to file");
    Ok(true)
}

use crate::error::AppError;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// The terminal belongs to the TUI, so output goes to `log_file` when one is
/// given and to stderr only in headless runs. Otherwise nothing is installed
/// and the `tracing` macros stay silent.
pub fn init(log_file: Option<&Path>, headless: bool) -> Result<(), AppError> {
    match (log_file, headless) {
        (Some(path), _) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| AppError::Logging(e.to_string()))
        }
        (None, true) => tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| AppError::Logging(e.to_string())),
        (None, false) => Ok(()),
    }
}

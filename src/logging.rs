//! File logging. The terminal belongs to the UI, so logs only go to a file.

use std::{
    fs::{self, OpenOptions},
    io,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::config::Config;

/// Install the global subscriber if a log file is configured.
///
/// Returns whether logging was enabled.
pub fn init(config: &Config) -> io::Result<bool> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(false);
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&config.log_filter);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(true)
}

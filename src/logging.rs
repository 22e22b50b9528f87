// File: ./src/logging.rs
// Log setup for the terminal front end. Output goes to a file because stdout
// belongs to the alternate screen.
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "MEALPREP_LOG";
pub const LOG_FILE: &str = "mealprep.log";

pub fn log_path() -> PathBuf {
    LocalStorage::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE)
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the file subscriber and a panic hook writing to the same file.
pub fn init(default_level: &str) -> Result<PathBuf> {
    let path = log_path();
    let file = open_append(&path).with_context(|| format!("opening {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    let panic_path = path.clone();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = open_append(&panic_path) {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    tracing::info!("Logging to {}", path.display());
    Ok(path)
}

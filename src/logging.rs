use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "tasktrack=debug,tower_http=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Logs to stderr. Used by the server.
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .init();
}

/// Logs to an append-only file so the terminal UI owns the screen.
pub fn init_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

use std::fs::File;

use tracing::info;
use tracing_subscriber::EnvFilter;

use stanza_core::AppConfig;

fn filter_for(config: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level))
}

/// Stderr logging for one-shot commands. RUST_LOG overrides the
/// configured level.
pub fn init_cli(config: &AppConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// File logging for the TUI, which owns the terminal and cannot share
/// stderr with the subscriber.
pub fn init_tui(config: &AppConfig) {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: could not create log file {}: {e}", log_path.display());
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("logging to {}", log_path.display());
}

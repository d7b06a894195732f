use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_NAME: &str = "minikt.log";

/// Sends the session log to `minikt_logs/minikt.log` under the system temp
/// directory. Each run starts with an empty file.
pub fn initialize_tracing(filter: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_new(filter).with_context(|| format!("invalid log filter `{}`", filter))?;

    let log_dir = std::env::temp_dir().join("minikt_logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(LOG_FILE_NAME);
    if log_file.exists() {
        std::fs::remove_file(&log_file)
            .with_context(|| format!("removing old log {}", log_file.display()))?;
    }

    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME))
        .with_ansi(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("installing the tracing subscriber")
}

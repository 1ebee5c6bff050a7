//! Log setup: stderr plus a per-run file under the platform cache directory.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output is flushed.
pub fn setup_logging() -> Result<WorkerGuard> {
    let run_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| format!("run_{}", elapsed.as_secs()))
        .unwrap_or_else(|_| "run".to_string());

    let log_dir = log_directory().join(&run_id);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}", log_dir.join("client.log").display());

    Ok(guard)
}

fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("gg", "tileworld", "tileworld")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("tileworld").join("logs"))
}

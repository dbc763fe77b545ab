use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::LoggingConfig;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(logging: &LoggingConfig) -> String {
  let level = if logging.debug { "debug" } else { "info" };
  format!("donut_diaries={},actix_web=info", level)
}

/// Installs console and file logging.
///
/// The returned guard flushes the file writer on drop, so keep it alive for
/// the lifetime of the process.
pub fn init_tracing(logging: &LoggingConfig) -> std::io::Result<WorkerGuard> {
  fs::create_dir_all(&logging.directory)?;

  let file_appender = tracing_appender::rolling::never(&logging.directory, logging.file_name());
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(logging).into()))
    .with(fmt::layer())
    .with(fmt::layer().with_ansi(false).with_writer(file_writer))
    .init();

  Ok(guard)
}

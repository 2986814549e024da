use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. "datapad=debug")
const LOG_ENV: &str = "DATAPAD_LOG";

/// Where log lines go
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
  /// Daily rolling file in this directory
  File(PathBuf),
  /// Standard error, warnings only unless DATAPAD_LOG says otherwise
  Stderr,
}

impl LogTarget {
  fn default_filter(&self) -> &'static str {
    match self {
      LogTarget::File(_) => "info",
      LogTarget::Stderr => "warn",
    }
  }
}

/// Install the global subscriber.
///
/// Normal runs log to a daily file so stdout stays reserved for command
/// output. Ephemeral runs never touch the disk and log to stderr instead.
/// Logging is best effort: a setup failure is reported on stderr and the
/// command goes on. Keep the returned guard alive for the whole run or
/// buffered lines are lost.
pub fn init(ephemeral: bool) -> Option<WorkerGuard> {
  match install(target(ephemeral)) {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("warning: {}", e);
      None
    }
  }
}

fn target(ephemeral: bool) -> LogTarget {
  if ephemeral {
    return LogTarget::Stderr;
  }
  match log_dir() {
    Ok(dir) => LogTarget::File(dir),
    Err(e) => {
      eprintln!("warning: {}, logging to stderr", e);
      LogTarget::Stderr
    }
  }
}

fn install(target: LogTarget) -> Result<WorkerGuard> {
  let filter =
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(target.default_filter()));

  let (writer, guard) = match &target {
    LogTarget::File(dir) => match file_writer(dir) {
      Ok(pair) => pair,
      Err(e) => {
        eprintln!("warning: {}, logging to stderr", e);
        tracing_appender::non_blocking(std::io::stderr())
      }
    },
    LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}

fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(dir, "datapad.log");
  Ok(tracing_appender::non_blocking(appender))
}

fn log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("datapad").join("logs"))
}

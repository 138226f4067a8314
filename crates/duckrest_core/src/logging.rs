//! Logging for the library and the `duckrest` binary.
//!
//! Console output always goes to stderr so stdout carries only command
//! results. When stderr is not a terminal, events are also written to a
//! daily rolling file under the data directory and the console only shows
//! warnings and errors.
//!
//! Filter priority: explicit filter > `DUCKREST_LOG` > `RUST_LOG` > build default.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "DUCKREST_LOG";

const LOG_FILE_PREFIX: &str = "duckrest";

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Directory for rolling log files. `None` logs to stderr only.
    pub file_dir: Option<PathBuf>,
    /// Filter directives overriding the environment.
    pub filter: Option<String>,
}

impl LogConfig {
    /// Log to stderr only.
    pub fn console() -> Self {
        Self::default()
    }

    /// Log to stderr, plus a daily file in `dir` when stderr is not a terminal.
    pub fn for_stderr(dir: PathBuf) -> Self {
        if atty::is(atty::Stream::Stderr) {
            Self::console()
        } else {
            Self { file_dir: Some(dir), filter: None }
        }
    }

    /// Set filter directives, taking priority over `DUCKREST_LOG` and `RUST_LOG`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Keeps the background file writer alive. Dropping it flushes buffered events.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// Never fails: an unusable log directory degrades to stderr-only logging,
/// and an already installed subscriber (tests, embedding applications) is
/// left in place.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let (file_layer, guard) = match config.file_dir.as_deref().map(file_writer) {
        Some(Ok((writer, guard))) => {
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("duckrest: file logging disabled ({e}), logging to stderr only");
            (None, None)
        }
        None => (None, None),
    };

    let console_level = if file_layer.is_some() { LevelFilter::WARN } else { LevelFilter::TRACE };
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .with_filter(console_level);

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.filter.as_deref()))
        .with(console_layer)
        .with(file_layer)
        .try_init();

    LoggingGuard { _file: guard }
}

fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Invalid directives fall back to the build default.
fn build_env_filter(custom: Option<&str>) -> EnvFilter {
    let from_env = || std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")).ok();
    custom
        .map(str::to_string)
        .or_else(from_env)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_log_filter()))
}

/// Default filter directives for this build type.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,duckrest=debug,duckrest_core=debug,hyper=warn,reqwest=warn"
    } else {
        "warn,duckrest=info,duckrest_core=info,hyper=warn,reqwest=warn"
    }
}

/// Application data directory.
///
/// Debug builds use `./duckrest_data`. Release builds use the platform data
/// directory (`~/.local/share/duckrest`, `~/Library/Application Support/duckrest`,
/// `%APPDATA%\duckrest`), falling back to `./duckrest_data`.
pub fn default_data_dir() -> PathBuf {
    let local = || PathBuf::from("./duckrest_data");
    if cfg!(debug_assertions) {
        return local();
    }
    dirs::data_dir().map(|d| d.join("duckrest")).unwrap_or_else(local)
}

/// Directory for rolling log files: `logs/` under [`default_data_dir`].
pub fn log_dir() -> PathBuf {
    default_data_dir().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(default_log_filter()).is_ok());
    }

    #[test]
    fn test_invalid_custom_filter_falls_back_to_default() {
        let filter = build_env_filter(Some("duckrest=loud"));
        assert_eq!(filter.to_string(), EnvFilter::new(default_log_filter()).to_string());
    }

    #[test]
    fn test_custom_filter_wins() {
        let filter = build_env_filter(Some("duckrest_core=trace"));
        assert_eq!(filter.to_string(), "duckrest_core=trace");
    }

    #[test]
    fn test_log_dir_is_under_data_dir() {
        assert!(log_dir().starts_with(default_data_dir()));
        assert!(log_dir().ends_with("logs"));
    }

    #[test]
    fn test_console_config_has_no_file() {
        let config = LogConfig::console().with_filter("warn");
        assert!(config.file_dir.is_none());
        assert_eq!(config.filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.is_dir());
    }
}

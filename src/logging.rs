//! Logging setup: a log file, plus stderr for headless runs.
//!
//! The terminal belongs to the TUI, so interactive sessions only ever log to
//! the file. Headless modes (`--normalize`, `--tree`) also log to stderr when
//! `FOLDMAP_LOG` or `RUST_LOG` is set.
//!
//! ## Environment Variables
//!
//! 1. **`FOLDMAP_LOG`** (highest priority), e.g. `debug` or `foldmap=trace`
//! 2. **`RUST_LOG`**
//! 3. **Default** - `warn` globally, `info` for foldmap
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/foldmap/logs/foldmap-<pid>.log`
//!
//! Override with `--log-file <path>` or `FOLDMAP_LOG_FILE`.

use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_ENV: &str = "FOLDMAP_LOG";
const LOG_FILE_ENV: &str = "FOLDMAP_LOG_FILE";
const DEFAULT_FILTER: &str = "warn,foldmap=info";

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    /// `--log-file`
    pub log_file_path: Option<PathBuf>,
    /// Also log to stderr when a filter variable is set
    pub stderr: bool,
}

/// Initialize logging.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<LogGuard, InitError> {
    let override_path = config
        .log_file_path
        .or_else(|| env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    let (log_dir, filename) = resolve_log_path(override_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_filter());

    let stderr_enabled = config.stderr && filter_from_env().is_some();
    let stderr_layer = stderr_enabled.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(create_filter())
    });

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Split an override into directory and file name.
///
/// A path with an extension names the file; anything else is a directory
/// that receives the default per-process file name.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("foldmap-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("foldmap")
        .join("logs");
    (dir, filename)
}

fn filter_from_env() -> Option<String> {
    env::var(LOG_ENV)
        .ok()
        .map(|value| expand_filter(&value))
        .or_else(|| env::var("RUST_LOG").ok())
}

fn create_filter() -> EnvFilter {
    EnvFilter::new(filter_from_env().unwrap_or_else(|| DEFAULT_FILTER.to_string()))
}

/// `FOLDMAP_LOG=debug` means `warn,foldmap=debug`; directive syntax is used
/// as-is.
fn expand_filter(value: &str) -> String {
    if value.contains('=') || value.contains(',') {
        value.to_string()
    } else {
        format!("warn,foldmap={value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_filter() {
        assert_eq!(expand_filter("debug"), "warn,foldmap=debug");
        assert_eq!(expand_filter("foldmap::tui=trace"), "foldmap::tui=trace");
        assert_eq!(expand_filter("info,notify=warn"), "info,notify=warn");
    }

    #[test]
    fn test_resolve_explicit_file() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/x/run.log")));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(name, "run.log");

        let (dir, name) = resolve_log_path(Some(PathBuf::from("run.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "run.log");
    }

    #[test]
    fn test_resolve_directory_override() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, format!("foldmap-{}.log", std::process::id()));
    }

    #[test]
    fn test_default_location() {
        let (dir, _) = resolve_log_path(None);
        assert!(dir.ends_with("foldmap/logs"));
    }
}

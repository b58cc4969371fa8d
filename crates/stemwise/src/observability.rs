//! Logging setup: human-readable stderr plus optional JSONL file output.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_PATH_ENV: &str = "STEMWISE_LOG_PATH";
const LOG_DIR_ENV: &str = "STEMWISE_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "stemwise.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file; `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then the configured directory.
    ///
    /// `STEMWISE_LOG_PATH` names the file outright and wins over everything.
    /// `STEMWISE_LOG_DIR` beats `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = env_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                env_dir
                    .filter(|d| !d.as_os_str().is_empty())
                    .or(config_dir)
                    .map(|dir| dir.join(DEFAULT_LOG_FILE))
            });
        Self { log_file }
    }
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `-q` means errors only, `-v` debug,
/// `-vv` trace, and the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(directive(quiet, verbose, config_level))
}

fn directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Install the global subscriber.
///
/// Hold the returned guard until exit so buffered file logs are flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let (file_layer, guard) = match config.log_file {
        Some(ref path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sources_disables_file_logging() {
        assert_eq!(ObservabilityConfig::resolve(None, None, None).log_file, None);
    }

    #[test]
    fn explicit_path_beats_directories() {
        let cfg = ObservabilityConfig::resolve(
            Some(PathBuf::from("/tmp/run.jsonl")),
            Some(PathBuf::from("/var/log")),
            Some(PathBuf::from("logs")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/run.jsonl")));
    }

    #[test]
    fn env_dir_beats_config_dir() {
        let cfg = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/var/log")),
            Some(PathBuf::from("logs")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("/var/log/stemwise.jsonl")));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let cfg = ObservabilityConfig::resolve(
            Some(PathBuf::new()),
            Some(PathBuf::new()),
            Some(PathBuf::from("logs")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("logs/stemwise.jsonl")));
    }

    #[test]
    fn verbosity_flags_pick_the_directive() {
        assert_eq!(directive(true, 2, "info"), "error");
        assert_eq!(directive(false, 0, "warn"), "warn");
        assert_eq!(directive(false, 1, "warn"), "debug");
        assert_eq!(directive(false, 3, "warn"), "trace");
    }
}

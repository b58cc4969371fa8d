//! Info command implementation

use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use stemwise_core::bot::DEFAULT_MODEL;
use stemwise_core::config::{Config, ConfigSources, user_config_dir};
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_config_dir: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    cache_dir: String,
    top_k: usize,
    word_sources: Vec<String>,
    frequency_source: String,
    llm_model: String,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources, cwd: &Utf8Path) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            user_config_dir: user_config_dir().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            cache_dir: config.cache_dir(cwd).to_string(),
            top_k: config.top_k(),
            word_sources: config.word_sources(),
            frequency_source: config.frequency_source(),
            llm_model: config
                .llm
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
/// * `cwd` - Directory relative cache paths resolve against
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    if let Some(ref dir) = cfg.user_config_dir {
        println!("{}: {}", "User config dir".dimmed(), dir);
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Corpus".bold().underline());
    println!("{}: {}", "Cache directory".dimmed(), cfg.cache_dir);
    println!("{}: {}", "Top k".dimmed(), cfg.top_k);
    for source in &cfg.word_sources {
        println!("{}: {}", "Word source".dimmed(), source.cyan());
    }
    println!(
        "{}: {}",
        "Frequency source".dimmed(),
        cfg.frequency_source.cyan()
    );

    println!();
    println!("{}", "Bot".bold().underline());
    println!("{}: {}", "Model".dimmed(), cfg.llm_model);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn cwd() -> Utf8PathBuf {
        Utf8PathBuf::from("/work")
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        let config = Config::default();
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), false, &config, &sources, &cwd()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let config = Config::default();
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), true, &config, &sources, &cwd()).is_ok());
    }

    #[test]
    fn test_config_info_defaults() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default(), &cwd());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.cache_dir, "/work");
        assert_eq!(info.top_k, 50);
        assert_eq!(info.word_sources.len(), 2);
        assert_eq!(info.llm_model, "gpt-4");
    }

    #[test]
    fn test_config_info_relative_cache_dir() {
        let config = Config {
            cache_dir: Some("cache".into()),
            top_k: Some(7),
            ..Config::default()
        };
        let info = ConfigInfo::from_config(&config, &ConfigSources::default(), &cwd());
        assert_eq!(info.cache_dir, "/work/cache");
        assert_eq!(info.top_k, 7);
    }
}

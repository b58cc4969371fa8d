//! Configuration integration tests.
//!
//! Each test runs the compiled binary inside a throwaway directory with its
//! own user config home, then reads the resolved corpus settings back from
//! `info --json` (or from a real `query` against a seeded cache).

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Settings read from the environment by the config loader.
const STEMWISE_ENV: &[&str] = &[
    "STEMWISE_TOP_K",
    "STEMWISE_CACHE_DIR",
    "STEMWISE_WORD_SOURCES",
    "STEMWISE_FREQUENCY_SOURCE",
    "STEMWISE_LLM__MODEL",
    "RUST_LOG",
];

/// A working directory plus an isolated user config home.
struct Sandbox {
    root: TempDir,
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            root: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    fn write(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// Write the user-level config file.
    fn write_user_config(&self, name: &str, contents: &str) {
        let dir = self.home.path().join("stemwise");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    /// The binary, run from `rel` with no inherited stemwise settings.
    #[allow(deprecated)]
    fn cmd(&self, rel: &str) -> Command {
        let dir = self.path().join(rel);
        fs::create_dir_all(&dir).unwrap();
        let mut c = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        for var in STEMWISE_ENV {
            c.env_remove(var);
        }
        c.env("XDG_CONFIG_HOME", self.home.path()).arg("-C").arg(dir);
        c
    }

    /// Seed a corpus cache in `rel` so nothing is downloaded.
    fn seed_cache(&self, rel: &str) {
        self.write(
            &format!("{rel}/word_list.txt"),
            "chart\nheart\nsmart\nstart\n",
        );
        self.write(
            &format!("{rel}/word_frequencies.json"),
            r#"{"heart": 0.95, "smart": 0.4, "start": 0.99}"#,
        );
    }
}

/// Run `info --json` and return the `config` object.
fn info_config(mut c: Command) -> Value {
    let output = c
        .args(["info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    json["config"].clone()
}

fn assert_path_ends_with(value: &Value, suffix: &str) {
    let path = value.as_str().expect("path should be a string");
    assert!(
        Path::new(path).ends_with(suffix),
        "{path} should end with {suffix}"
    );
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults_apply_without_any_config() {
    let sb = Sandbox::new();
    let config = info_config(sb.cmd("work"));

    assert_eq!(config["top_k"], 50);
    assert_path_ends_with(&config["cache_dir"], "work");
    assert!(config["config_file"].is_null());
    let sources = config["word_sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(config["frequency_source"], sources[0]);
}

// =============================================================================
// Precedence: user < project < --config < environment
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn user_config_sets_corpus_settings() {
    let sb = Sandbox::new();
    sb.write_user_config("config.toml", "top_k = 7\ncache_dir = \"corpus\"\n");

    let config = info_config(sb.cmd("work"));

    assert_eq!(config["top_k"], 7);
    assert_path_ends_with(&config["cache_dir"], "work/corpus");
    assert_path_ends_with(&config["config_file"], "stemwise/config.toml");
}

#[cfg(target_os = "linux")]
#[test]
fn project_config_overrides_user_config() {
    let sb = Sandbox::new();
    sb.write_user_config("config.toml", "top_k = 7\ncache_dir = \"corpus\"\n");
    sb.write("work/.stemwise.toml", "top_k = 15\n");

    let config = info_config(sb.cmd("work"));

    assert_eq!(config["top_k"], 15, "project beats user");
    assert_path_ends_with(&config["cache_dir"], "work/corpus");
}

#[test]
fn explicit_config_overrides_project_config() {
    let sb = Sandbox::new();
    sb.write("work/.stemwise.toml", "top_k = 15\ncache_dir = \"project-cache\"\n");
    sb.write("override.yaml", "top_k: 4\n");

    let mut c = sb.cmd("work");
    c.arg("--config").arg(sb.path().join("override.yaml"));
    let config = info_config(c);

    assert_eq!(config["top_k"], 4);
    assert_path_ends_with(&config["cache_dir"], "work/project-cache");
    assert_path_ends_with(&config["config_file"], "override.yaml");
}

#[test]
fn environment_overrides_every_file() {
    let sb = Sandbox::new();
    sb.write("work/.stemwise.toml", "top_k = 15\ncache_dir = \"project-cache\"\n");
    sb.write("override.toml", "top_k = 4\n");
    let shared = sb.path().join("shared");

    let mut c = sb.cmd("work");
    c.env("STEMWISE_TOP_K", "2")
        .env("STEMWISE_CACHE_DIR", &shared)
        .arg("--config")
        .arg(sb.path().join("override.toml"));
    let config = info_config(c);

    assert_eq!(config["top_k"], 2);
    assert_eq!(config["cache_dir"], shared.to_str().unwrap());
}

#[test]
fn nested_environment_key_sets_llm_model() {
    let sb = Sandbox::new();
    sb.write("work/.stemwise.toml", "[llm]\nmodel = \"gpt-4\"\n");

    let mut c = sb.cmd("work");
    c.env("STEMWISE_LLM__MODEL", "gpt-4o-mini");
    let config = info_config(c);

    assert_eq!(config["llm_model"], "gpt-4o-mini");
}

#[test]
fn configured_cache_and_top_k_drive_a_query() {
    let sb = Sandbox::new();
    sb.seed_cache("shared");
    sb.write("work/stemwise.toml", "top_k = 2\n");

    let output = sb
        .cmd("work")
        .env("STEMWISE_CACHE_DIR", sb.path().join("shared"))
        .args(["query", "__ART", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let words: Vec<&str> = json["completions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["word"].as_str().unwrap())
        .collect();
    assert_eq!(words, ["start", "heart"]);
    assert!(!sb.path().join("work/word_list.txt").exists());
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn closer_project_config_wins() {
    let sb = Sandbox::new();
    sb.write(".stemwise.toml", "top_k = 30\ncache_dir = \"outer\"\n");
    sb.write("study/.stemwise.toml", "cache_dir = \"inner\"\n");

    let config = info_config(sb.cmd("study/run"));

    assert_path_ends_with(&config["cache_dir"], "run/inner");
    assert_eq!(config["top_k"], 50, "outer file is not merged");
    assert_path_ends_with(&config["config_file"], "study/.stemwise.toml");
}

#[test]
fn regular_name_overrides_dotfile() {
    let sb = Sandbox::new();
    sb.write("work/.stemwise.toml", "top_k = 8\ncache_dir = \"dot\"\n");
    sb.write("work/stemwise.toml", "top_k = 9\n");

    let config = info_config(sb.cmd("work"));

    assert_eq!(config["top_k"], 9);
    assert_path_ends_with(&config["cache_dir"], "work/dot");
}

#[test]
fn yaml_word_sources_replace_toml_in_same_directory() {
    let sb = Sandbox::new();
    sb.write(
        "work/.stemwise.toml",
        "word_sources = [\"https://example.org/a.txt\", \"https://example.org/b.txt\"]\n\
         frequency_source = \"https://example.org/ranked.txt\"\n",
    );
    sb.write(
        "work/.stemwise.yaml",
        "word_sources:\n  - https://example.org/c.txt\n",
    );

    let config = info_config(sb.cmd("work"));

    assert_eq!(
        config["word_sources"],
        json!(["https://example.org/c.txt"]),
        "YAML merges after TOML and replaces the list"
    );
    assert_eq!(config["frequency_source"], "https://example.org/ranked.txt");
}

#[test]
fn json_word_sources_are_read() {
    let sb = Sandbox::new();
    sb.write(
        "work/stemwise.json",
        r#"{"word_sources": ["https://example.org/words.txt"], "top_k": 5}"#,
    );

    let config = info_config(sb.cmd("work"));

    assert_eq!(config["word_sources"], json!(["https://example.org/words.txt"]));
    assert_eq!(config["top_k"], 5);
}

#[test]
fn git_boundary_stops_parent_cache_dir() {
    let sb = Sandbox::new();
    sb.write(".stemwise.toml", "cache_dir = \"/srv/shared-corpus\"\n");
    fs::create_dir_all(sb.path().join("repo/.git")).unwrap();

    let config = info_config(sb.cmd("repo/src"));

    assert_path_ends_with(&config["cache_dir"], "repo/src");
    assert!(config["config_file"].is_null());
}

#[test]
fn config_beside_git_is_found() {
    let sb = Sandbox::new();
    fs::create_dir_all(sb.path().join("repo/.git")).unwrap();
    sb.write("repo/.stemwise.toml", "cache_dir = \"corpus\"\ntop_k = 20\n");

    let config = info_config(sb.cmd("repo/src"));

    // Relative cache dirs follow the working directory, not the config file.
    assert_path_ends_with(&config["cache_dir"], "repo/src/corpus");
    assert_eq!(config["top_k"], 20);
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let sb = Sandbox::new();
    sb.write("work/.stemwise.toml", "top_k = [[[");

    sb.cmd("work")
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn wrong_type_for_top_k_shows_error() {
    let sb = Sandbox::new();
    sb.write("work/stemwise.yaml", "top_k: plenty\n");

    sb.cmd("work")
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("top_k"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let sb = Sandbox::new();
    sb.write(
        "work/.stemwise.toml",
        "top_k = 6\nstem_file = \"word_stems.txt\"\n[extra]\nanswer = 42\n",
    );

    let config = info_config(sb.cmd("work"));
    assert_eq!(config["top_k"], 6);
}

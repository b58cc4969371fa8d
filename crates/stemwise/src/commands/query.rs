//! Query command: complete a single stem.

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use stemwise_core::config::Config;
use stemwise_core::pattern::StemPattern;
use stemwise_core::rank::{Completion, StemCompleter};

use super::{corpus_store, load_corpus, print_completion_table};

/// Arguments for the `query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Stem to complete; `_` marks each missing letter (e.g. `HON__`).
    pub stem: String,

    /// Completions to show (overrides config).
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

#[derive(Serialize)]
struct QueryReport<'a> {
    stem: &'a str,
    regex: &'a str,
    placeholders: usize,
    completions: Vec<Completion>,
}

/// Complete one stem and print its ranked completions.
#[instrument(name = "cmd_query", skip_all, fields(stem = %args.stem))]
pub fn cmd_query(
    args: QueryArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    let top_k = args.top_k.unwrap_or_else(|| config.top_k());
    debug!(top_k, "executing query command");

    // Compile before touching the corpus so a typo fails without a download.
    let pattern = StemPattern::compile(&args.stem)
        .with_context(|| format!("invalid stem {:?}", args.stem))?;

    let store = corpus_store(config, cwd);
    let (corpus, _report) = load_corpus(&store, global_json)?;
    let completions = StemCompleter::new(&corpus)
        .with_top_k(top_k)
        .complete_pattern(&pattern);

    if global_json {
        let report = QueryReport {
            stem: pattern.as_str(),
            regex: pattern.regex(),
            placeholders: pattern.placeholders(),
            completions,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if completions.is_empty() {
        println!("No completions found for pattern '{}'", pattern.as_str().bold());
    } else {
        println!("Completions for pattern '{}':", pattern.as_str().bold());
        print_completion_table(&completions);
    }

    Ok(())
}

//! Corpus command: build the word cache and report on it.

use anyhow::Context;
use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use stemwise_core::config::Config;
use stemwise_core::corpus::{BuildReport, SourceOutcome};

use super::{corpus_store, load_corpus};

/// Arguments for the `corpus` subcommand.
#[derive(Args, Debug, Default)]
pub struct CorpusArgs {
    /// Delete the cache files and download every source again.
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Serialize)]
struct CorpusInfo<'a> {
    cache_dir: &'a Utf8Path,
    words: usize,
    scored_words: usize,
    #[serde(flatten)]
    build: &'a BuildReport,
}

/// Load (or rebuild) the corpus and print its size and provenance.
#[instrument(name = "cmd_corpus", skip_all, fields(refresh = args.refresh))]
pub fn cmd_corpus(
    args: CorpusArgs,
    global_json: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    let store = corpus_store(config, cwd);
    debug!(dir = %store.dir(), "executing corpus command");

    if args.refresh {
        store
            .clear()
            .with_context(|| format!("failed to clear cache in {}", store.dir()))?;
    }
    let (corpus, report) = load_corpus(&store, true)?;

    let info = CorpusInfo {
        cache_dir: store.dir(),
        words: corpus.len(),
        scored_words: corpus.scored_len(),
        build: &report,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}: {}", "Cache directory".dimmed(), info.cache_dir.cyan());
    println!("{}: {}", "Words".dimmed(), info.words);
    println!("{}: {}", "Scored words".dimmed(), info.scored_words);
    println!(
        "{}: {}",
        "Word list".dimmed(),
        provenance(report.words_cached)
    );
    println!(
        "{}: {}",
        "Frequencies".dimmed(),
        provenance(report.frequencies_cached)
    );

    for source in &report.sources {
        match source.outcome {
            SourceOutcome::Loaded { count } => {
                println!("  {} {} ({count} words)", "ok".green(), source.source);
            }
            SourceOutcome::Failed { ref reason } => {
                println!("  {} {}: {reason}", "failed".red(), source.source);
            }
        }
    }

    Ok(())
}

const fn provenance(cached: bool) -> &'static str {
    if cached { "cache" } else { "downloaded" }
}

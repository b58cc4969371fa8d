//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use owo_colors::OwoColorize;
use stemwise_core::config::Config;
use stemwise_core::corpus::{BuildReport, Corpus, CorpusStore, HttpSource, SourceOutcome};
use stemwise_core::rank::Completion;

pub mod bot;
pub mod complete;
pub mod corpus;
pub mod info;
pub mod query;
pub mod schema;
pub mod summary;
pub mod table;

/// Build the corpus store described by `config`, rooted at `cwd`.
pub fn corpus_store(config: &Config, cwd: &Utf8Path) -> CorpusStore {
    let timeout = config.fetch_timeout();
    let store = config
        .word_sources()
        .into_iter()
        .fold(CorpusStore::new(config.cache_dir(cwd)), |store, url| {
            store.with_word_source(HttpSource::new(url, timeout))
        });
    store.with_frequency_source(HttpSource::new(config.frequency_source(), timeout))
}

/// Load the corpus from cache or remote sources, warning about failed sources.
///
/// An empty corpus is not an error; every stem then completes to nothing.
pub fn load_corpus(store: &CorpusStore, quiet: bool) -> anyhow::Result<(Corpus, BuildReport)> {
    let (corpus, report) = store
        .load_or_build()
        .with_context(|| format!("failed to load corpus from {}", store.dir()))?;

    if !quiet {
        for failure in report.failures() {
            if let SourceOutcome::Failed { ref reason } = failure.outcome {
                eprintln!("{} {}", "warning:".yellow().bold(), reason);
            }
        }
    }

    if corpus.is_empty() {
        tracing::warn!(dir = %store.dir(), "corpus is empty");
        if !quiet {
            eprintln!(
                "{} corpus in {} has no words; every stem will complete to nothing",
                "warning:".yellow().bold(),
                store.dir()
            );
        }
    }
    Ok((corpus, report))
}

/// Print completions as an aligned word/score table.
pub fn print_completion_table(completions: &[Completion]) {
    println!("{}", "-".repeat(40));
    println!("{:<15} {:>10}", "Word".bold(), "Frequency".bold());
    println!("{}", "-".repeat(40));
    for completion in completions {
        println!("{:<15} {:>10.4}", completion.word, completion.freq_score);
    }
}

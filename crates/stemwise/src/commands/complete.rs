//! Complete command: run every stem in a file and save the results.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use stemwise_core::batch::{self, StemOutcome};
use stemwise_core::config::Config;
use stemwise_core::rank::{Completion, StemCompleter};

use super::{corpus_store, load_corpus, print_completion_table};

/// Completions echoed per stem while the batch runs.
const PREVIEW_LIMIT: usize = 5;

/// Completions per stem in the closing summary.
const FINAL_LIMIT: usize = 10;

/// Arguments for the `complete` subcommand.
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// File with one stem per line.
    #[arg(short, long, default_value = "word_stems.txt")]
    pub input: Utf8PathBuf,

    /// Where to write the JSON results.
    #[arg(short, long, default_value = "completions.json")]
    pub output: Utf8PathBuf,

    /// Completions kept per stem (overrides config).
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

#[derive(Serialize)]
struct FailedStem<'a> {
    stem: &'a str,
    error: String,
}

#[derive(Serialize)]
struct CompleteReport<'a> {
    input: &'a Utf8Path,
    output: &'a Utf8Path,
    top_k: usize,
    stems: usize,
    completed: usize,
    failed: Vec<FailedStem<'a>>,
}

/// Complete every stem in the input file and write the result set.
#[instrument(name = "cmd_complete", skip_all, fields(input = %args.input, output = %args.output))]
pub fn cmd_complete(
    args: CompleteArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    let top_k = args.top_k.unwrap_or_else(|| config.top_k());
    debug!(top_k, "executing complete command");

    let stems = batch::read_stems(&args.input)
        .with_context(|| format!("failed to read stems from {}", args.input))?;
    if stems.is_empty() {
        tracing::warn!(input = %args.input, "stem file is empty");
    }

    let store = corpus_store(config, cwd);
    let (corpus, _report) = load_corpus(&store, quiet || global_json)?;
    let completer = StemCompleter::new(&corpus).with_top_k(top_k);

    let chatty = !global_json && !quiet;
    let progress = if chatty {
        progress_bar(stems.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let run = batch::run_batch_with(&completer, &stems, |index, stem, outcome| {
        progress.set_position(index as u64 + 1);
        if chatty {
            progress.suspend(|| print_preview(index, stems.len(), stem, outcome));
        }
    });
    progress.finish_and_clear();

    let results = run.results();
    results
        .write_json(&args.output)
        .with_context(|| format!("failed to save results to {}", args.output))?;

    let failed: Vec<FailedStem<'_>> = run
        .failures()
        .map(|(stem, err)| FailedStem {
            stem,
            error: err.to_string(),
        })
        .collect();

    if global_json {
        let report = CompleteReport {
            input: &args.input,
            output: &args.output,
            top_k,
            stems: run.len(),
            completed: results.len(),
            failed,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if chatty {
        println!();
        println!("{}", "Final Results Summary:".bold());
        println!("{}", "=".repeat(80));
        for (stem, completions) in results.iter() {
            print_final(stem, completions);
        }
    }

    println!(
        "Saved {} of {} stems to {}",
        results.len(),
        run.len(),
        args.output.cyan()
    );
    for failure in &failed {
        eprintln!(
            "{} {}: {}",
            "skipped".red().bold(),
            failure.stem,
            failure.error
        );
    }

    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} stems") {
        bar.set_style(style);
    }
    bar
}

fn print_preview(index: usize, total: usize, stem: &str, outcome: &StemOutcome) {
    println!();
    println!("Processing stem {}/{}: {}", index + 1, total, stem.bold());
    match outcome {
        StemOutcome::Completed(completions) if completions.is_empty() => {
            println!("No completions found for '{stem}'");
        }
        StemOutcome::Completed(completions) => {
            println!("Top completions for '{stem}':");
            for completion in completions.iter().take(PREVIEW_LIMIT) {
                println!(
                    "  {} (frequency score: {:.4})",
                    completion.word, completion.freq_score
                );
            }
        }
        StemOutcome::Failed(err) => {
            println!("{} {}", "error:".red(), err);
        }
    }
}

fn print_final(stem: &str, completions: &[Completion]) {
    println!();
    if completions.is_empty() {
        println!("No completions found for pattern '{stem}'");
    } else {
        println!("Completions for pattern '{stem}':");
        let top = &completions[..completions.len().min(FINAL_LIMIT)];
        print_completion_table(top);
    }
    println!("{}", "=".repeat(80));
}

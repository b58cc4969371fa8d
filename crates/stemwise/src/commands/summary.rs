//! Summary command: readable listing plus frequency-band CSV.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use stemwise_core::batch::ResultSet;
use stemwise_core::report::{bands, summary};

/// Arguments for the `summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Result set written by `complete`.
    #[arg(short, long, default_value = "completions.json")]
    pub input: Utf8PathBuf,

    /// Where to write the readable summary.
    #[arg(long, default_value = "word_completions_summary.txt")]
    pub summary: Utf8PathBuf,

    /// Where to write the frequency-band CSV.
    #[arg(long, default_value = "word_completions_by_frequency.csv")]
    pub csv: Utf8PathBuf,

    /// Also print the summary to stdout.
    #[arg(long)]
    pub print: bool,
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    stems: usize,
    summary: &'a Utf8PathBuf,
    csv: &'a Utf8PathBuf,
}

/// Write both summary reports for a result set.
#[instrument(name = "cmd_summary", skip_all, fields(input = %args.input))]
pub fn cmd_summary(args: SummaryArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(summary = %args.summary, csv = %args.csv, "executing summary command");

    let results = ResultSet::read_json(&args.input)
        .with_context(|| format!("failed to load results from {}", args.input))?;

    let text = summary::render_summary(&results).context("failed to render summary")?;
    std::fs::write(&args.summary, &text)
        .with_context(|| format!("failed to write {}", args.summary))?;

    let file =
        File::create(&args.csv).with_context(|| format!("failed to create {}", args.csv))?;
    let mut out = BufWriter::new(file);
    bands::write_band_csv(&results, &mut out)
        .with_context(|| format!("failed to write {}", args.csv))?;
    out.flush()
        .with_context(|| format!("failed to write {}", args.csv))?;

    if global_json {
        let report = SummaryReport {
            stems: results.len(),
            summary: &args.summary,
            csv: &args.csv,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.print {
        print!("{text}");
    }
    println!(
        "Summarized {} stems into {} and {}",
        results.len(),
        args.summary.cyan(),
        args.csv.cyan()
    );
    Ok(())
}

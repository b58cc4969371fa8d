//! Table command: ILT responses and distractors with their corpus scores.

use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use stemwise_core::batch::ResultSet;
use stemwise_core::report::table;

/// Arguments for the `table` subcommand.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Result set written by `complete`.
    #[arg(short, long, default_value = "completions.json")]
    pub input: Utf8PathBuf,

    /// JSON array of rows to use instead of the study's built-in table.
    #[arg(long)]
    pub rows: Option<Utf8PathBuf>,

    /// Where to write the CSV table.
    #[arg(short, long, default_value = "word_frequencies_table.csv")]
    pub output: Utf8PathBuf,
}

/// Build the comparison table, save it as CSV and print it.
#[instrument(name = "cmd_table", skip_all, fields(input = %args.input))]
pub fn cmd_table(args: TableArgs, global_json: bool) -> anyhow::Result<()> {
    debug!(rows = ?args.rows, output = %args.output, "executing table command");

    let results = ResultSet::read_json(&args.input)
        .with_context(|| format!("failed to load results from {}", args.input))?;

    let rows = match args.rows {
        Some(ref path) => {
            let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
            table::read_rows(BufReader::new(file))
                .with_context(|| format!("failed to read rows from {path}"))?
        }
        None => table::study_rows(),
    };

    let lines = table::build_table(rows, &results);

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output))?;
    table::write_table_csv(&lines, file)
        .with_context(|| format!("failed to write {}", args.output))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        print!("{}", table::render_table(&lines));
        println!();
        println!("Table saved to {}", args.output.cyan());
    }
    Ok(())
}

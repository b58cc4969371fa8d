//! Bot command: leadership-themed completions from a chat model.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use stemwise_core::batch;
use stemwise_core::bot::{self, LeadershipStemBot, OpenAiChat, StemReply};
use stemwise_core::config::LlmConfig;

/// Arguments for the `bot` subcommand.
#[derive(Args, Debug, Default)]
pub struct BotArgs {
    /// Stems to send (default: the study's leadership stems).
    pub stems: Vec<String>,

    /// Read stems from a file, one per line.
    #[arg(short, long, conflicts_with = "stems")]
    pub input: Option<Utf8PathBuf>,

    /// Where to write the plain-text report.
    #[arg(short, long, default_value = "leadership_completions.txt")]
    pub output: Utf8PathBuf,

    /// Chat model (overrides config).
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Serialize)]
struct BotEntry<'a> {
    stem: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<&'a StemReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Send each stem to the chat model and write the report.
#[instrument(name = "cmd_bot", skip_all, fields(output = %args.output))]
pub fn cmd_bot(args: BotArgs, global_json: bool, config: &LlmConfig) -> anyhow::Result<()> {
    let stems = match args.input {
        Some(ref path) => batch::read_stems(path)
            .with_context(|| format!("failed to read stems from {path}"))?,
        None if args.stems.is_empty() => bot::STUDY_STEMS
            .iter()
            .map(|stem| (*stem).to_string())
            .collect(),
        None => args.stems.clone(),
    };

    let mut config = config.clone();
    if args.model.is_some() {
        config.model = args.model.clone();
    }
    let chat = OpenAiChat::from_config(&config).context("cannot reach the chat model")?;
    debug!(model = chat.model(), stems = stems.len(), "executing bot command");

    if !global_json {
        println!("Processing leadership word stems...");
    }
    let results = LeadershipStemBot::new(chat).process_stems(&stems);

    let replies: Vec<StemReply> = results
        .iter()
        .filter_map(|(_, result)| result.as_ref().ok().cloned())
        .collect();

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output))?;
    let mut out = BufWriter::new(file);
    bot::write_report(&replies, &mut out)
        .with_context(|| format!("failed to write {}", args.output))?;
    out.flush()
        .with_context(|| format!("failed to write {}", args.output))?;

    if global_json {
        let entries: Vec<BotEntry<'_>> = results
            .iter()
            .map(|(stem, result)| BotEntry {
                stem,
                reply: result.as_ref().ok(),
                error: result.as_ref().err().map(ToString::to_string),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!();
    println!("{}", "Completion Results:".bold());
    println!("{}", "=".repeat(50));
    for (stem, result) in &results {
        println!();
        println!("Stem: {}", stem.bold());
        match result {
            Ok(reply) => println!("Response:\n{}", reply.response),
            Err(err) => println!("{} {}", "error:".red(), err),
        }
        println!("{}", "-".repeat(50));
    }
    println!();
    println!("Results saved to {}", args.output.cyan());

    let failed = results.len() - replies.len();
    if failed == results.len() && !results.is_empty() {
        anyhow::bail!("every stem failed; see the errors above");
    }
    Ok(())
}

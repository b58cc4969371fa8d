//! Build helpers: man pages and shell completions for `stemwise`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for stemwise")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().task {
        Task::Man { out } => man(&out),
        Task::Completions { out } => completions(&out),
    }
}

fn man(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let cmd = stemwise::command();

    write_page(out, "stemwise", cmd.clone())?;
    for sub in cmd.get_subcommands() {
        let name = format!("stemwise-{}", sub.get_name());
        write_page(out, &name, sub.clone())?;
    }
    println!("man pages written to {}", out.display());
    Ok(())
}

fn write_page(out: &Path, name: &str, cmd: clap::Command) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .with_context(|| format!("failed to render {name}"))?;
    let path = out.join(format!("{name}.1"));
    fs::write(&path, buf).with_context(|| format!("failed to write {}", path.display()))
}

fn completions(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut cmd = stemwise::command();
    for shell in Shell::value_variants() {
        clap_complete::generate_to(*shell, &mut cmd, "stemwise", out)
            .with_context(|| format!("failed to generate {shell} completions"))?;
    }
    println!("completions written to {}", out.display());
    Ok(())
}

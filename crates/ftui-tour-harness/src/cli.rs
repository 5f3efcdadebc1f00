#![forbid(unsafe_code)]

//! Command-line front end: `run` plays a tour document on a virtual clock
//! and prints its timeline, `check` lists steps whose widget names are
//! missing from the fixture tree.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ftui_tour::WidgetIndex;
use tracing_subscriber::EnvFilter;

use crate::document::HarnessDocument;
use crate::error::{HarnessError, Result};
use crate::timeline::Timeline;

#[derive(Debug, Parser)]
#[command(
    name = "ftui-tour-harness",
    about = "Dry-run and check guided tour scripts against a fixture widget tree",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a tour on a virtual clock and print its timeline.
    Run(RunArgs),

    /// Report steps whose widget names do not resolve.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Tour document (.toml or .json).
    pub file: PathBuf,

    /// Print the timeline as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Stop the dry run after this many virtual seconds.
    #[arg(long, default_value_t = 600)]
    pub limit_secs: u64,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Tour document (.toml or .json).
    pub file: PathBuf,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Run(args) => run_tour(&args, &mut out),
        Commands::Check(args) => check_tour(&args, &mut out),
    }
}

/// Install the global subscriber. `RUST_LOG` selects levels (default `warn`).
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn run_tour(args: &RunArgs, out: &mut impl Write) -> Result<()> {
    let doc = load(&args.file)?;
    let timeline = Timeline::run(&doc, Duration::from_secs(args.limit_secs));
    let rendered = if args.json {
        timeline.to_jsonl()
    } else {
        timeline.to_text()
    };
    out.write_all(rendered.as_bytes())?;

    if timeline.truncated {
        return Err(HarnessError::Truncated {
            limit_secs: args.limit_secs,
        });
    }
    Ok(())
}

pub fn check_tour(args: &CheckArgs, out: &mut impl Write) -> Result<()> {
    let doc = load(&args.file)?;
    let index = WidgetIndex::build(&doc.tree());
    let script = doc.script();

    let missing: Vec<_> = script.unresolved(&index).collect();
    for (i, step) in &missing {
        writeln!(out, "step {i}: no widget named {:?}", step.name)?;
    }
    writeln!(
        out,
        "{} step(s), {} resolved, {} missing ({:.0}s of holds)",
        script.len(),
        script.len() - missing.len(),
        missing.len(),
        script.total_hold().as_secs_f64()
    )?;

    if missing.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::Unresolved {
            count: missing.len(),
        })
    }
}

fn load(path: &Path) -> Result<HarnessDocument> {
    tracing::debug!(path = %path.display(), "loading tour document");
    HarnessDocument::from_file(path).map_err(|source| HarnessError::Load {
        path: path.to_path_buf(),
        source,
    })
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::FetcherKind;

/// Verify that the articles a journal registers are reachable under the
/// registered URLs and that the landing pages carry the article titles.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub logs: LogArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify a single journal by ISSN.
    Check(CheckArgs),
    /// Aggregate statistics over the summary log.
    Report,
}

/// Options shared by every command
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Summary log (one JSON line per finished journal).
    #[arg(long, global = true, default_value = "summary.jsonl")]
    pub summary: PathBuf,

    /// Detail log (events and per-article verdicts).
    #[arg(long, global = true, default_value = "detail.jsonl")]
    pub detail: PathBuf,

    /// TOML configuration file; environment variables override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// How pages are loaded.
    #[arg(long, global = true, value_enum, default_value_t = FetcherKind::Browser)]
    pub fetcher: FetcherKind,

    /// Close the browser without waiting for Enter.
    #[arg(long, global = true)]
    pub no_pause: bool,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Input journal list (JSON array).
    #[arg(long, default_value = "journals.json")]
    pub input: PathBuf,

    /// Maximum number of journals to process (0 = all).
    #[arg(long, default_value_t = 0)]
    pub max: usize,

    /// 1-based index of the first journal to consider.
    #[arg(long, default_value_t = 1)]
    pub start: usize,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Print ISSN or e-ISSN of the journal.
    #[arg(long)]
    pub issn: String,

    /// Journal name as it appears in the input list.
    #[arg(long)]
    pub name: Option<String>,
}

//! CLI argument definitions for modelgate.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `select` | Print the current usable candidate |
//! | `candidates` | List every candidate that passed the filter |
//! | `catalog` | Dump raw catalog ids (total, substring matches, free tier) |
//! | `demo` | Interactive success/failure rotation loop |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--base-url` | env / OpenRouter | Catalog base URL |
//! | `--timeout-ms` | env / `10000` | Catalog request timeout |
//!
//! The credential is always taken from `MODELGATE_API_KEY` or
//! `OPENROUTER_API_KEY`; it is never accepted on the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Free, tool-capable model selection with failover.
#[derive(Debug, Parser)]
#[command(
    name = "modelgate",
    author,
    version,
    about = "Pick a usable model from a remote catalog, skipping failed ones"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Catalog base URL; `/models` is appended.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Catalog request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain key/value text for terminals.
    Table,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current usable candidate.
    ///
    /// Exits with code 3 when no candidate is available.
    ///
    ///   modelgate select
    ///   modelgate select --exclude vendor/flaky:free
    Select(SelectArgs),

    /// List every candidate that passed the cost and capability filter.
    Candidates,

    /// Dump the raw catalog without filtering.
    ///
    ///   modelgate catalog --contains gemini
    ///   modelgate catalog --free-only
    Catalog(CatalogArgs),

    /// Interactive loop: answer s(uccess), f(ailure) or q(uit) per candidate.
    Demo,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Candidate ids to treat as unusable before selecting.
    #[arg(long)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Case-insensitive substring the listed ids must contain.
    #[arg(long)]
    pub contains: Option<String>,

    /// Only list free-tier ids.
    #[arg(long, default_value_t = false)]
    pub free_only: bool,
}

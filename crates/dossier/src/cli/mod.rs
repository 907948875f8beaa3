pub mod aggregate;
pub mod names;
pub mod phones;
pub mod schema;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "dossier",
    about = "Consolidate multi-provider identity lookups into deduplicated reports",
    version
)]
pub struct Cli {
    /// Increase log verbosity (repeatable); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate one or more lookup result files into reports
    Aggregate(AggregateArgs),
    /// Deduplicate and classify phone numbers
    Phones {
        /// Raw phone strings
        #[arg(required = true)]
        phones: Vec<String>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Clean and cluster name variants
    Names {
        /// Raw name strings
        #[arg(required = true)]
        names: Vec<String>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Print the effective provider field schema
    Schema {
        /// Schema override to merge over the built-in field names
        #[arg(long, env = "DOSSIER_SCHEMA")]
        schema: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct AggregateArgs {
    /// Lookup result files (full lookup response or bare provider map)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Schema override to merge over the built-in field names
    #[arg(long, env = "DOSSIER_SCHEMA")]
    pub schema: Option<PathBuf>,
    /// Extra phone number to include (repeatable)
    #[arg(long = "phone")]
    pub phones: Vec<String>,
    /// Extra name to include (repeatable)
    #[arg(long = "name")]
    pub names: Vec<String>,
    /// Directory for `<stem>.report.json` files; defaults to stdout for a
    /// single input and to each input's directory otherwise
    #[arg(long, env = "DOSSIER_OUT_DIR")]
    pub out_dir: Option<PathBuf>,
    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
    /// Print every extraction event to stderr as JSON lines
    #[arg(long)]
    pub explain: bool,
}

pub fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

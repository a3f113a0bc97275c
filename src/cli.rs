//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seed the storefront database and inspect how ingredient lines are parsed.
#[derive(Parser, Debug)]
#[command(name = "sastojci")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load categories, ingredients and recipes into the database
    Seed {
        /// Seed data file, replacing the built-in data set
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Run against an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the parsed ingredients of each line as JSON
    Parse {
        /// Ingredient lines, e.g. "600g mesa (junetina/svinjetina)"
        #[arg(required = true)]
        lines: Vec<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

impl Args {
    /// Default log filter for the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

//! CLI module for threadwise.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// threadwise - community discussion Q&A
///
/// Scrapes recurring daily question threads, indexes them in a vector store,
/// and answers questions with cited excerpts from the discussions.
#[derive(Parser, Debug)]
#[command(name = "threadwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the indexed discussions
    Ask {
        /// The question to ask
        question: String,

        /// Number of discussion fragments to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Fetch and index recent daily threads
    Fetch {
        /// Number of days of threads to fetch
        #[arg(short, long, default_value = "5")]
        days: u32,
    },

    /// Show corpus status (document count and date range)
    Status,

    /// Delete all indexed discussions
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

//! CLI module for talkrag.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// talkrag - question answering over talk transcripts
///
/// Ingests a talk dataset into a vector index and answers questions using
/// only the retrieved transcript passages.
#[derive(Parser, Debug)]
#[command(name = "talkrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
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
    /// Chunk, embed and index a CSV dataset of talks
    Ingest {
        /// CSV file with talk_id, title, speaker_1 and transcript columns
        #[arg(long)]
        csv: String,

        /// Only ingest the first N talks
        #[arg(short, long)]
        limit: Option<usize>,

        /// Records per upsert call (overrides config)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Index into an in-memory store instead of Pinecone
        #[arg(long)]
        memory: bool,
    },

    /// Start the HTTP question-answering API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question from the command line
    Ask {
        /// The question to ask
        question: String,

        /// Number of passages to retrieve (overrides config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print the full prompt sent to the model
        #[arg(long)]
        show_prompt: bool,
    },

    /// Check configuration and credentials
    Doctor,

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

//! CLI module for Svar.

mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - YouTube Transcript Chatbot
///
/// An HTTP service for chatting with a YouTube video's transcript.
/// The name "Svar" comes from the Norwegian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
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
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
}

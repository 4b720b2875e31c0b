pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tweet-extractor")]
#[command(about = "Extract structured data from X/Twitter posts", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Extract a single tweet and print the result as JSON
    Extract {
        /// URL of the tweet
        url: String,
    },
    /// Extract several tweets one after another
    Batch {
        /// URLs of the tweets
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

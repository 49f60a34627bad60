use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `selfbuild` - Self-Building Site API backend.
#[derive(Parser, Debug)]
#[command(name = "selfbuild")]
#[command(version)]
#[command(about = "Creator command channel and user API for the self-building site.", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.selfbuild/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP/WebSocket gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print recent structured agent logs, most recent first
    Logs {
        /// Number of entries to print
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

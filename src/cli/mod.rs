//! CLI interface for Authlab

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "authlab")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Credential login with server-side sessions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new authlab.toml configuration file
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long, env = "AUTHLAB_HOST")]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long, env = "AUTHLAB_PORT")]
        port: Option<u16>,

        /// Path to the configuration file
        #[arg(short, long, env = "AUTHLAB_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print a bcrypt hash for use as an account's password_hash
    HashPassword {
        /// Plaintext password to hash. Read from stdin when omitted, which
        /// keeps it out of shell history and process listings.
        password: Option<String>,

        /// bcrypt cost factor
        #[arg(short, long, default_value = "10")]
        cost: u32,
    },

    /// List configured accounts
    Accounts {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Path to the configuration file
        #[arg(short, long, env = "AUTHLAB_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

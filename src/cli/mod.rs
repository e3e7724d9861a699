//! Command-line interface for City Explorer.

mod commands;

use clap::{Parser, Subcommand};

/// City Explorer - location, weather, business and movie lookups for a city
#[derive(Parser)]
#[command(name = "city-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Validate the configuration and ping the database
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Resolve a location through the cache and print it
    #[command(alias = "l")]
    Lookup {
        /// Free-text location query
        #[arg(required = true)]
        query: Vec<String>,
    },
}

pub use commands::*;

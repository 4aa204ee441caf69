//! CLI interface for coin-cache
//!
//! Provides subcommands for:
//! - `serve`: Run the HTTP service with periodic refresh (default)
//! - `refresh`: Run one refresh cycle and print the snapshot
//! - `ping`: Check upstream connectivity
//! - `config`: Show effective configuration

mod ping;
mod refresh;
mod serve;

pub use ping::PingArgs;
pub use refresh::RefreshArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coin-cache")]
#[command(about = "Cached CoinGecko USD prices over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Run one refresh cycle and print the snapshot
    Refresh(RefreshArgs),
    /// Check upstream connectivity
    Ping(PingArgs),
    /// Show effective configuration
    Config,
}

impl Cli {
    /// Subcommand to run, `serve` when none given
    pub fn subcommand(&self) -> Commands {
        match &self.command {
            Some(command) => command.clone(),
            None => Commands::Serve(ServeArgs::default()),
        }
    }
}

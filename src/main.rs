use clap::Parser;
use coin_cache::cli::{Cli, Commands};
use coin_cache::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; a missing file falls back to defaults
    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    config.apply_env()?;
    config.validate()?;

    // Initialize telemetry
    coin_cache::telemetry::init_telemetry(&config.telemetry)?;

    match cli.subcommand() {
        Commands::Serve(args) => {
            tracing::info!("Starting price service");
            args.execute(&config).await?;
        }
        Commands::Refresh(args) => {
            args.execute(&config).await?;
        }
        Commands::Ping(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use selfbuild::Config;
use selfbuild::logging::AgentLogger;
use selfbuild::transport::gateway;
use std::sync::Arc;

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load_or_init(),
    }
}

/// Load config, install logging, and run the selected subcommand.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(host) = host {
                config.gateway.host = host;
            }
            config.validate()?;

            let _guard = selfbuild::logging::init_tracing(&config.logging)?;
            gateway::run_gateway(Arc::new(config)).await
        }
        Commands::Logs { limit } => {
            let logger =
                AgentLogger::new(config.logging.dir.clone()).context("open agent log directory")?;
            let limit = limit.unwrap_or(config.logging.default_limit);
            for entry in logger.recent(limit)? {
                println!("{}", serde_json::to_string(&entry)?);
            }
            Ok(())
        }
    }
}

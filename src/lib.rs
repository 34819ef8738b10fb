pub mod cli;
pub mod core;
pub mod historical;
pub mod nlp;
pub mod payload;
pub mod providers;
pub mod resolver;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use crate::core::config::AppConfig;
use crate::service::ExchangeHub;
use anyhow::Result;
use tracing::{debug, info};

/// Commands that need a configured hub. Setup is handled by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Currencies,
    Rate {
        base: String,
        target: Option<String>,
    },
    History {
        base: String,
        target: String,
        days: Option<u32>,
    },
    Ask {
        query: String,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>, json: bool) -> Result<()> {
    info!("zarhub starting...");

    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let hub = ExchangeHub::from_config(&config)?;

    match command {
        AppCommand::Currencies => cli::currencies::run(&hub, json),
        AppCommand::Rate { base, target } => {
            cli::rate::run(&hub, &base, target.as_deref(), json).await
        }
        AppCommand::History { base, target, days } => {
            cli::history::run(&hub, &base, &target, days, json).await
        }
        AppCommand::Ask { query } => cli::ask::run(&hub, &query, json).await,
    }
}

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use zarhub::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for zarhub::AppCommand {
    fn from(cmd: Commands) -> zarhub::AppCommand {
        match cmd {
            Commands::Currencies => zarhub::AppCommand::Currencies,
            Commands::Rate { base, target } => zarhub::AppCommand::Rate { base, target },
            Commands::History { base, target, days } => {
                zarhub::AppCommand::History { base, target, days }
            }
            Commands::Ask { query } => zarhub::AppCommand::Ask {
                query: query.join(" "),
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Show the current rate for a currency pair
    Rate {
        /// Currency to convert from, e.g. USD
        base: String,
        /// Currency to convert to (defaults to ZAR)
        #[arg(short, long)]
        target: Option<String>,
    },
    /// Show a simulated rate history for a currency pair
    History {
        base: String,
        target: String,
        /// Number of days back from today (defaults to 30)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Ask about a rate in plain English
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Setup) => zarhub::cli::setup::setup(),
        Some(cmd) => zarhub::run_command(cmd.into(), cli.config_path.as_deref(), cli.json).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

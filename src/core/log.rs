//! Subscriber setup for the CLI. Logs go to stderr so `--json` output on
//! stdout stays parseable.

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Which targets may log. Quiet runs log nothing; verbose runs show the
/// app at debug, HTTP transport at debug and the disk cache at info.
fn app_targets(verbose: bool) -> Targets {
    if !verbose {
        return Targets::new().with_default(LevelFilter::OFF);
    }
    Targets::new()
        .with_target("zarhub", Level::DEBUG)
        .with_target("reqwest", Level::DEBUG)
        .with_target("fjall", Level::INFO)
}

/// Installs the global subscriber. `RUST_LOG` narrows what `--verbose`
/// allows. Fails if a subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<(), TryInitError> {
    let default_level = if verbose { "debug" } else { "off" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_targets(verbose))
        .with(env_filter)
        .try_init()
}

//! Logging setup.

use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
///
/// The library crates log through the `log` facade, which is bridged into tracing.
pub fn init() -> anyhow::Result<()> {
    LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_names(true));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

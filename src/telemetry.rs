//! Process-wide tracing setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::Result;

/// Environment variable holding filter directives (`tracing` syntax).
pub const LOG_ENV: &str = "NAN_LOG";

/// Install the global subscriber.
///
/// Filter directives come from `NAN_LOG`, falling back to `info`. Call once
/// from the service entry point; a second call reports `Error::Telemetry`.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}

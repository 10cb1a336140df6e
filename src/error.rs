use thiserror::Error;

use crate::core::CoreError;

/// Crate-level convenience error.
///
/// The manager itself never surfaces errors synchronously to clients (every
/// failure travels through a callback); this type covers the embedding
/// surface: value-type validation and process setup.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("telemetry init: {0}")]
    Telemetry(#[from] tracing_subscriber::util::TryInitError),
}

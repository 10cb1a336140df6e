use thiserror::Error;

/// Validation errors for core value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid cluster range: low {low:#06x} > high {high:#06x}")]
    InvalidClusterRange { low: u16, high: u16 },

    #[error("invalid MAC address {raw:?}: {reason}")]
    InvalidMac { raw: String, reason: String },
}

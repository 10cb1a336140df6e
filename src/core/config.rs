//! Device-level configuration requested by a client.

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Lowest valid cluster id.
pub const CLUSTER_ID_MIN: u16 = 0x0000;
/// Highest valid cluster id.
pub const CLUSTER_ID_MAX: u16 = 0xffff;

/// One client's requested device configuration.
///
/// The device runs a single merged configuration; see the manager's merge
/// rules. The default requests no 5 GHz support, master preference 0, the
/// full cluster id range, and no identity-change reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    pub support_5g_band: bool,
    pub master_preference: u8,
    pub cluster_low: u16,
    pub cluster_high: u16,
    pub identity_change_enabled: bool,
}

impl Default for ConfigRequest {
    fn default() -> Self {
        ConfigRequest {
            support_5g_band: false,
            master_preference: 0,
            cluster_low: CLUSTER_ID_MIN,
            cluster_high: CLUSTER_ID_MAX,
            identity_change_enabled: false,
        }
    }
}

impl ConfigRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cluster_low > self.cluster_high {
            return Err(CoreError::InvalidClusterRange {
                low: self.cluster_low,
                high: self.cluster_high,
            });
        }
        Ok(())
    }

    /// Whether this request narrows the cluster id range below the full span.
    ///
    /// Only narrowed ranges participate in the device-level range merge.
    pub fn narrows_cluster_range(&self) -> bool {
        self.cluster_low != CLUSTER_ID_MIN || self.cluster_high != CLUSTER_ID_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_full_range() {
        let config = ConfigRequest::default();
        config.validate().unwrap();
        assert!(!config.narrows_cluster_range());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = ConfigRequest {
            cluster_low: 100,
            cluster_high: 5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(CoreError::InvalidClusterRange { low: 100, high: 5 })
        );
    }

    #[test]
    fn narrowed_range_is_detected() {
        let config = ConfigRequest {
            cluster_low: 5,
            cluster_high: 100,
            ..Default::default()
        };
        config.validate().unwrap();
        assert!(config.narrows_cluster_range());
    }
}

//! Firmware capability report.

use serde::{Deserialize, Serialize};

/// Discovery-engine limits reported by the firmware.
///
/// Informational: the manager records the latest report and exposes it
/// through diagnostics. Enforcement happens in the firmware itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub max_publishes: u32,
    pub max_subscribes: u32,
    pub max_service_name_len: u32,
    pub max_service_specific_info_len: u32,
}

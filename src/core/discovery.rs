//! Per-session discovery configuration.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Whether a session advertises or searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Publish,
    Subscribe,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Publish => "publish",
            SessionKind::Subscribe => "subscribe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishType {
    /// Broadcast unsolicited advertisements.
    #[default]
    Unsolicited,
    /// Answer active subscribers only.
    Solicited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeType {
    /// Listen for unsolicited publishes.
    #[default]
    Passive,
    /// Transmit subscribe frames.
    Active,
}

/// Configuration for a publish session.
///
/// `publish_count` and `ttl_sec` of 0 mean "until stopped".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    pub service_name: String,
    pub service_specific_info: Bytes,
    pub publish_type: PublishType,
    pub publish_count: u32,
    pub ttl_sec: u32,
}

/// Configuration for a subscribe session.
///
/// `subscribe_count` and `ttl_sec` of 0 mean "until stopped".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscribeConfig {
    pub service_name: String,
    pub service_specific_info: Bytes,
    pub subscribe_type: SubscribeType,
    pub subscribe_count: u32,
    pub ttl_sec: u32,
}

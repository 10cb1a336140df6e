//! Value types shared between the manager, the HAL seam, and client callbacks.
//!
//! Layering, leaves first:
//! - ids: identifier newtypes
//! - mac: peer hardware addresses
//! - reason: failure / termination / cluster event codes
//! - config: device-level `ConfigRequest`
//! - discovery: per-session `PublishConfig` / `SubscribeConfig`
//! - caps: firmware capability report

pub mod caps;
pub mod config;
pub mod discovery;
pub mod error;
pub mod ids;
pub mod mac;
pub mod reason;

pub use caps::Capabilities;
pub use config::{ConfigRequest, CLUSTER_ID_MAX, CLUSTER_ID_MIN};
pub use discovery::{PublishConfig, PublishType, SessionKind, SubscribeConfig, SubscribeType};
pub use error::CoreError;
pub use ids::{ClientId, MessageId, PeerId, PubSubId, SessionId, TransactionId};
pub use mac::MacAddress;
pub use reason::{ClusterEvent, FailReason, TerminateReason};

#![forbid(unsafe_code)]

pub mod callbacks;
pub mod core;
pub mod error;
pub mod hal;
pub mod looper;
pub mod manager;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::callbacks::{EventCallback, SessionCallback};
pub use crate::core::{
    Capabilities, ClientId, ClusterEvent, ConfigRequest, CoreError, FailReason, MacAddress,
    MessageId, PeerId, PubSubId, PublishConfig, PublishType, SessionId, SessionKind,
    SubscribeConfig, SubscribeType, TerminateReason, TransactionId, CLUSTER_ID_MAX, CLUSTER_ID_MIN,
};
pub use crate::hal::NanHal;
pub use crate::looper::{ManagerHandle, MessageLoop};
pub use crate::manager::StateManager;

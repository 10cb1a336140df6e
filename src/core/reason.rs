//! Reason codes carried on upward callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an operation failed.
///
/// `NoResources` and `InvalidArgs` originate in the firmware; the rest can
/// also be synthesized locally when an operation makes no sense in the
/// current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    NoResources,
    InvalidArgs,
    Other,
    NoMatchSession,
    SessionTerminated,
}

impl FailReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailReason::NoResources => "no_resources",
            FailReason::InvalidArgs => "invalid_args",
            FailReason::Other => "other",
            FailReason::NoMatchSession => "no_match_session",
            FailReason::SessionTerminated => "session_terminated",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the firmware ended a discovery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminateReason {
    /// The session ran to its configured completion (count or ttl).
    Done,
    Failure,
}

impl TerminateReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminateReason::Done => "done",
            TerminateReason::Failure => "failure",
        }
    }
}

impl fmt::Display for TerminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cluster membership transitions reported by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterEvent {
    /// This device started a new cluster.
    Started,
    /// This device joined an existing cluster.
    Joined,
}

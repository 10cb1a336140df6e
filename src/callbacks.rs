//! Upward callback capabilities handed in by clients.
//!
//! Callbacks are opaque capabilities: the manager stores them, invokes the
//! fixed vocabulary below, and never inspects or compares them beyond
//! presence. All invocations happen on the manager's loop thread.

use bytes::Bytes;

use crate::core::{ConfigRequest, FailReason, MessageId, PeerId, SessionId, TerminateReason};

/// Per-client event callback, supplied at connect time.
pub trait EventCallback: Send + Sync {
    /// The device accepted a configuration this client contributed to.
    /// Carries the client's own request, not the merged one.
    fn on_config_completed(&self, config: &ConfigRequest);

    fn on_config_failed(&self, config: &ConfigRequest, reason: FailReason);

    /// The device's discovery identity (MAC) changed. Delivered only when
    /// the client's current request opted in.
    fn on_identity_changed(&self);

    fn on_nan_down(&self, reason: FailReason);
}

/// Per-session callback, supplied with each publish/subscribe request.
pub trait SessionCallback: Send + Sync {
    fn on_session_started(&self, session: SessionId);

    fn on_session_config_fail(&self, reason: FailReason);

    fn on_session_terminated(&self, reason: TerminateReason);

    fn on_match(&self, peer: PeerId, service_specific_info: &Bytes, match_filter: &Bytes);

    fn on_message_received(&self, peer: PeerId, payload: &Bytes);

    fn on_message_send_success(&self, message: MessageId);

    fn on_message_send_fail(&self, message: MessageId, reason: FailReason);
}

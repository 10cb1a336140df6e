//! Messages processed by the manager's loop.
//!
//! Everything the manager does arrives here: client API calls, firmware
//! events, and deliveries the manager deferred for itself. Handlers run
//! serially in posting order.

use std::sync::Arc;

use bytes::Bytes;

use crate::callbacks::{EventCallback, SessionCallback};
use crate::core::{
    Capabilities, ClientId, ClusterEvent, ConfigRequest, FailReason, MacAddress, MessageId,
    PeerId, PubSubId, PublishConfig, SessionId, SubscribeConfig, TerminateReason, TransactionId,
};

pub(crate) enum Message {
    Api(ApiCall),
    Hal(HalEvent),
    Deliver(Delivery),
    Shutdown,
}

/// Client-facing API, one variant per entry point.
pub(crate) enum ApiCall {
    Connect {
        client: ClientId,
        callback: Option<Arc<dyn EventCallback>>,
    },
    Disconnect {
        client: ClientId,
    },
    RequestConfig {
        client: ClientId,
        request: ConfigRequest,
    },
    Publish {
        client: ClientId,
        config: PublishConfig,
        callback: Arc<dyn SessionCallback>,
    },
    UpdatePublish {
        client: ClientId,
        session: SessionId,
        config: PublishConfig,
    },
    Subscribe {
        client: ClientId,
        config: SubscribeConfig,
        callback: Arc<dyn SessionCallback>,
    },
    UpdateSubscribe {
        client: ClientId,
        session: SessionId,
        config: SubscribeConfig,
    },
    TerminateSession {
        client: ClientId,
        session: SessionId,
    },
    SendMessage {
        client: ClientId,
        session: SessionId,
        peer: PeerId,
        payload: Bytes,
        message: MessageId,
    },
}

/// Responses and unsolicited events from the firmware.
pub(crate) enum HalEvent {
    ConfigCompleted {
        tx: TransactionId,
    },
    ConfigFailed {
        tx: TransactionId,
        reason: FailReason,
    },
    PublishSuccess {
        tx: TransactionId,
        pub_sub_id: PubSubId,
    },
    PublishFail {
        tx: TransactionId,
        reason: FailReason,
    },
    SubscribeSuccess {
        tx: TransactionId,
        pub_sub_id: PubSubId,
    },
    SubscribeFail {
        tx: TransactionId,
        reason: FailReason,
    },
    MessageSendSuccess {
        tx: TransactionId,
    },
    MessageSendFail {
        tx: TransactionId,
        reason: FailReason,
    },
    PublishTerminated {
        pub_sub_id: PubSubId,
        reason: TerminateReason,
    },
    SubscribeTerminated {
        pub_sub_id: PubSubId,
        reason: TerminateReason,
    },
    Match {
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        service_specific_info: Bytes,
        match_filter: Bytes,
    },
    MessageReceived {
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: Bytes,
    },
    ClusterChange {
        event: ClusterEvent,
        mac: MacAddress,
    },
    InterfaceAddressChange {
        mac: MacAddress,
    },
    NanDown {
        reason: FailReason,
    },
    CapabilitiesUpdate {
        tx: TransactionId,
        capabilities: Capabilities,
    },
    UnknownTransaction {
        response_type: u32,
        tx: TransactionId,
        status: i32,
    },
    NoOpTransaction {
        tx: TransactionId,
    },
}

/// A callback the manager posted back to itself.
///
/// Locally synthesized failures go through here so they fire after the
/// handler that produced them returns, keeping every client entry point
/// fire-and-forget.
pub(crate) enum Delivery {
    ConfigFailed {
        callback: Arc<dyn EventCallback>,
        request: ConfigRequest,
        reason: FailReason,
    },
    SessionConfigFail {
        callback: Arc<dyn SessionCallback>,
        reason: FailReason,
    },
    MessageSendFail {
        callback: Arc<dyn SessionCallback>,
        message: MessageId,
        reason: FailReason,
    },
}

impl Delivery {
    pub(crate) fn dispatch(self) {
        match self {
            Delivery::ConfigFailed {
                callback,
                request,
                reason,
            } => callback.on_config_failed(&request, reason),
            Delivery::SessionConfigFail { callback, reason } => {
                callback.on_session_config_fail(reason)
            }
            Delivery::MessageSendFail {
                callback,
                message,
                reason,
            } => callback.on_message_send_fail(message, reason),
        }
    }
}

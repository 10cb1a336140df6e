//! Single-threaded message loop wiring.
//!
//! Clients and the HAL shim post through a [`ManagerHandle`]; the
//! [`MessageLoop`] owns the manager and processes messages strictly in
//! posting order, one at a time. Production embeds the loop in a dedicated
//! thread via [`MessageLoop::run`]; tests drive it explicitly with
//! [`MessageLoop::dispatch_all`].

use std::sync::Arc;

use bytes::Bytes;
use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::callbacks::{EventCallback, SessionCallback};
use crate::core::{
    Capabilities, ClientId, ClusterEvent, ConfigRequest, FailReason, MacAddress, MessageId,
    PeerId, PubSubId, PublishConfig, SessionId, SubscribeConfig, TerminateReason, TransactionId,
};
use crate::hal::NanHal;
use crate::manager::message::{ApiCall, HalEvent, Message};
use crate::manager::StateManager;

/// Cloneable posting surface for the manager.
///
/// Every method enqueues and returns immediately; outcomes arrive through
/// the callbacks registered with `connect`, `publish`, and `subscribe`.
/// The `on_*` methods are the firmware side: a HAL shim forwards its
/// notifications through them.
#[derive(Clone)]
pub struct ManagerHandle {
    tx: Sender<Message>,
}

impl ManagerHandle {
    fn post(&self, message: Message) {
        // Ignore send errors - the loop may already have shut down.
        let _ = self.tx.send(message);
    }

    pub fn connect(&self, client: ClientId, callback: Option<Arc<dyn EventCallback>>) {
        self.post(Message::Api(ApiCall::Connect { client, callback }));
    }

    pub fn disconnect(&self, client: ClientId) {
        self.post(Message::Api(ApiCall::Disconnect { client }));
    }

    pub fn request_config(&self, client: ClientId, request: ConfigRequest) {
        self.post(Message::Api(ApiCall::RequestConfig { client, request }));
    }

    pub fn publish(
        &self,
        client: ClientId,
        config: PublishConfig,
        callback: Arc<dyn SessionCallback>,
    ) {
        self.post(Message::Api(ApiCall::Publish {
            client,
            config,
            callback,
        }));
    }

    pub fn update_publish(&self, client: ClientId, session: SessionId, config: PublishConfig) {
        self.post(Message::Api(ApiCall::UpdatePublish {
            client,
            session,
            config,
        }));
    }

    pub fn subscribe(
        &self,
        client: ClientId,
        config: SubscribeConfig,
        callback: Arc<dyn SessionCallback>,
    ) {
        self.post(Message::Api(ApiCall::Subscribe {
            client,
            config,
            callback,
        }));
    }

    pub fn update_subscribe(&self, client: ClientId, session: SessionId, config: SubscribeConfig) {
        self.post(Message::Api(ApiCall::UpdateSubscribe {
            client,
            session,
            config,
        }));
    }

    pub fn terminate_session(&self, client: ClientId, session: SessionId) {
        self.post(Message::Api(ApiCall::TerminateSession { client, session }));
    }

    pub fn send_message(
        &self,
        client: ClientId,
        session: SessionId,
        peer: PeerId,
        payload: Bytes,
        message: MessageId,
    ) {
        self.post(Message::Api(ApiCall::SendMessage {
            client,
            session,
            peer,
            payload,
            message,
        }));
    }

    pub fn on_config_completed(&self, tx: TransactionId) {
        self.post(Message::Hal(HalEvent::ConfigCompleted { tx }));
    }

    pub fn on_config_failed(&self, tx: TransactionId, reason: FailReason) {
        self.post(Message::Hal(HalEvent::ConfigFailed { tx, reason }));
    }

    pub fn on_publish_success(&self, tx: TransactionId, pub_sub_id: PubSubId) {
        self.post(Message::Hal(HalEvent::PublishSuccess { tx, pub_sub_id }));
    }

    pub fn on_publish_fail(&self, tx: TransactionId, reason: FailReason) {
        self.post(Message::Hal(HalEvent::PublishFail { tx, reason }));
    }

    pub fn on_subscribe_success(&self, tx: TransactionId, pub_sub_id: PubSubId) {
        self.post(Message::Hal(HalEvent::SubscribeSuccess { tx, pub_sub_id }));
    }

    pub fn on_subscribe_fail(&self, tx: TransactionId, reason: FailReason) {
        self.post(Message::Hal(HalEvent::SubscribeFail { tx, reason }));
    }

    pub fn on_message_send_success(&self, tx: TransactionId) {
        self.post(Message::Hal(HalEvent::MessageSendSuccess { tx }));
    }

    pub fn on_message_send_fail(&self, tx: TransactionId, reason: FailReason) {
        self.post(Message::Hal(HalEvent::MessageSendFail { tx, reason }));
    }

    pub fn on_publish_terminated(&self, pub_sub_id: PubSubId, reason: TerminateReason) {
        self.post(Message::Hal(HalEvent::PublishTerminated { pub_sub_id, reason }));
    }

    pub fn on_subscribe_terminated(&self, pub_sub_id: PubSubId, reason: TerminateReason) {
        self.post(Message::Hal(HalEvent::SubscribeTerminated { pub_sub_id, reason }));
    }

    pub fn on_match(
        &self,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        service_specific_info: Bytes,
        match_filter: Bytes,
    ) {
        self.post(Message::Hal(HalEvent::Match {
            pub_sub_id,
            peer,
            peer_mac,
            service_specific_info,
            match_filter,
        }));
    }

    pub fn on_message_received(
        &self,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: Bytes,
    ) {
        self.post(Message::Hal(HalEvent::MessageReceived {
            pub_sub_id,
            peer,
            peer_mac,
            payload,
        }));
    }

    pub fn on_cluster_change(&self, event: ClusterEvent, mac: MacAddress) {
        self.post(Message::Hal(HalEvent::ClusterChange { event, mac }));
    }

    pub fn on_interface_address_change(&self, mac: MacAddress) {
        self.post(Message::Hal(HalEvent::InterfaceAddressChange { mac }));
    }

    pub fn on_nan_down(&self, reason: FailReason) {
        self.post(Message::Hal(HalEvent::NanDown { reason }));
    }

    pub fn on_capabilities_update(&self, tx: TransactionId, capabilities: Capabilities) {
        self.post(Message::Hal(HalEvent::CapabilitiesUpdate { tx, capabilities }));
    }

    pub fn on_unknown_transaction(&self, response_type: u32, tx: TransactionId, status: i32) {
        self.post(Message::Hal(HalEvent::UnknownTransaction {
            response_type,
            tx,
            status,
        }));
    }

    pub fn on_no_op_transaction(&self, tx: TransactionId) {
        self.post(Message::Hal(HalEvent::NoOpTransaction { tx }));
    }

    /// Ask a running loop to exit after draining earlier messages.
    pub fn shutdown(&self) {
        self.post(Message::Shutdown);
    }
}

/// Owns the manager and serializes all work onto the calling thread.
pub struct MessageLoop {
    manager: StateManager,
    rx: Receiver<Message>,
}

impl MessageLoop {
    /// Build a manager around `hal` and return its posting handle and loop.
    pub fn new(hal: Arc<dyn NanHal>) -> (ManagerHandle, MessageLoop) {
        let (tx, rx) = unbounded();
        let manager = StateManager::new(hal, tx.clone());
        (ManagerHandle { tx }, MessageLoop { manager, rx })
    }

    /// Drain every queued message, including ones posted while draining.
    ///
    /// This is the test hook: post a batch, then observe the quiescent state.
    pub fn dispatch_all(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            if matches!(message, Message::Shutdown) {
                break;
            }
            self.manager.handle(message);
        }
    }

    /// Serve messages until a shutdown is posted.
    pub fn run(mut self) {
        while let Ok(message) = self.rx.recv() {
            if matches!(message, Message::Shutdown) {
                break;
            }
            self.manager.handle(message);
        }
    }

    /// The manager, for read-only inspection between dispatches.
    pub fn manager(&self) -> &StateManager {
        &self.manager
    }
}

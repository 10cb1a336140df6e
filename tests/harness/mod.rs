//! Shared fixtures: a recording HAL and recording client callbacks.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bytes::Bytes;

use nan_rs::core::{
    ConfigRequest, FailReason, MacAddress, MessageId, PeerId, PubSubId, PublishConfig, SessionId,
    SubscribeConfig, TerminateReason, TransactionId,
};
use nan_rs::{EventCallback, ManagerHandle, MessageLoop, NanHal, SessionCallback};

/// One command the manager issued to the firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HalCall {
    EnableAndConfigure {
        tx: TransactionId,
        config: ConfigRequest,
    },
    Disable {
        tx: TransactionId,
    },
    Publish {
        tx: TransactionId,
        pub_sub_id: Option<PubSubId>,
        config: PublishConfig,
    },
    StopPublish {
        tx: TransactionId,
        pub_sub_id: PubSubId,
    },
    Subscribe {
        tx: TransactionId,
        pub_sub_id: Option<PubSubId>,
        config: SubscribeConfig,
    },
    StopSubscribe {
        tx: TransactionId,
        pub_sub_id: PubSubId,
    },
    SendMessage {
        tx: TransactionId,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: Bytes,
    },
}

/// Records every HAL command in issue order.
#[derive(Default)]
pub struct RecordingHal {
    calls: Mutex<Vec<HalCall>>,
}

impl RecordingHal {
    fn record(&self, call: HalCall) {
        self.calls.lock().expect("hal lock").push(call);
    }

    /// Drain the recorded calls.
    pub fn take_calls(&self) -> Vec<HalCall> {
        std::mem::take(&mut *self.calls.lock().expect("hal lock"))
    }
}

impl NanHal for RecordingHal {
    fn enable_and_configure(&self, tx: TransactionId, config: &ConfigRequest) {
        self.record(HalCall::EnableAndConfigure {
            tx,
            config: config.clone(),
        });
    }

    fn disable(&self, tx: TransactionId) {
        self.record(HalCall::Disable { tx });
    }

    fn publish(&self, tx: TransactionId, pub_sub_id: Option<PubSubId>, config: &PublishConfig) {
        self.record(HalCall::Publish {
            tx,
            pub_sub_id,
            config: config.clone(),
        });
    }

    fn stop_publish(&self, tx: TransactionId, pub_sub_id: PubSubId) {
        self.record(HalCall::StopPublish { tx, pub_sub_id });
    }

    fn subscribe(&self, tx: TransactionId, pub_sub_id: Option<PubSubId>, config: &SubscribeConfig) {
        self.record(HalCall::Subscribe {
            tx,
            pub_sub_id,
            config: config.clone(),
        });
    }

    fn stop_subscribe(&self, tx: TransactionId, pub_sub_id: PubSubId) {
        self.record(HalCall::StopSubscribe { tx, pub_sub_id });
    }

    fn send_message(
        &self,
        tx: TransactionId,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: &Bytes,
    ) {
        self.record(HalCall::SendMessage {
            tx,
            pub_sub_id,
            peer,
            peer_mac,
            payload: payload.clone(),
        });
    }
}

/// One delivery observed on an event callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    ConfigCompleted(ConfigRequest),
    ConfigFailed(ConfigRequest, FailReason),
    IdentityChanged,
    NanDown(FailReason),
}

#[derive(Default)]
pub struct RecordingEventCallback {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingEventCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take_events(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.events.lock().expect("event lock"))
    }
}

impl EventCallback for RecordingEventCallback {
    fn on_config_completed(&self, config: &ConfigRequest) {
        self.events
            .lock()
            .expect("event lock")
            .push(ClientEvent::ConfigCompleted(config.clone()));
    }

    fn on_config_failed(&self, config: &ConfigRequest, reason: FailReason) {
        self.events
            .lock()
            .expect("event lock")
            .push(ClientEvent::ConfigFailed(config.clone(), reason));
    }

    fn on_identity_changed(&self) {
        self.events
            .lock()
            .expect("event lock")
            .push(ClientEvent::IdentityChanged);
    }

    fn on_nan_down(&self, reason: FailReason) {
        self.events
            .lock()
            .expect("event lock")
            .push(ClientEvent::NanDown(reason));
    }
}

/// One delivery observed on a session callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started(SessionId),
    ConfigFail(FailReason),
    Terminated(TerminateReason),
    Match {
        peer: PeerId,
        service_specific_info: Bytes,
        match_filter: Bytes,
    },
    MessageReceived {
        peer: PeerId,
        payload: Bytes,
    },
    SendSuccess(MessageId),
    SendFail(MessageId, FailReason),
}

#[derive(Default)]
pub struct RecordingSessionCallback {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingSessionCallback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take_events(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.lock().expect("session lock"))
    }
}

impl SessionCallback for RecordingSessionCallback {
    fn on_session_started(&self, session: SessionId) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::Started(session));
    }

    fn on_session_config_fail(&self, reason: FailReason) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::ConfigFail(reason));
    }

    fn on_session_terminated(&self, reason: TerminateReason) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::Terminated(reason));
    }

    fn on_match(&self, peer: PeerId, service_specific_info: &Bytes, match_filter: &Bytes) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::Match {
                peer,
                service_specific_info: service_specific_info.clone(),
                match_filter: match_filter.clone(),
            });
    }

    fn on_message_received(&self, peer: PeerId, payload: &Bytes) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::MessageReceived {
                peer,
                payload: payload.clone(),
            });
    }

    fn on_message_send_success(&self, message: MessageId) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::SendSuccess(message));
    }

    fn on_message_send_fail(&self, message: MessageId, reason: FailReason) {
        self.events
            .lock()
            .expect("session lock")
            .push(SessionEvent::SendFail(message, reason));
    }
}

pub struct Fixture {
    pub hal: Arc<RecordingHal>,
    pub handle: ManagerHandle,
    pub looper: MessageLoop,
}

pub fn fixture() -> Fixture {
    let hal = Arc::new(RecordingHal::default());
    let (handle, looper) = MessageLoop::new(hal.clone());
    Fixture {
        hal,
        handle,
        looper,
    }
}

pub fn event_callback(cb: &Arc<RecordingEventCallback>) -> Option<Arc<dyn EventCallback>> {
    let cb: Arc<dyn EventCallback> = cb.clone();
    Some(cb)
}

pub fn session_callback(cb: &Arc<RecordingSessionCallback>) -> Arc<dyn SessionCallback> {
    cb.clone()
}

pub fn mac(octets: [u8; 6]) -> MacAddress {
    MacAddress::from_bytes(octets)
}

/// The single call the HAL saw since the last drain.
pub fn take_single(hal: &RecordingHal) -> HalCall {
    let mut calls = hal.take_calls();
    assert_eq!(calls.len(), 1, "expected exactly one HAL call: {calls:?}");
    calls.remove(0)
}

/// Pull the session id out of a `Started` delivery.
pub fn started_session(events: &[SessionEvent]) -> SessionId {
    for event in events {
        if let SessionEvent::Started(id) = event {
            return *id;
        }
    }
    panic!("no session-started event in {events:?}");
}

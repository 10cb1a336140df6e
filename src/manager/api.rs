//! Client-facing operation handlers.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::callbacks::{EventCallback, SessionCallback};
use crate::core::{
    ClientId, ConfigRequest, FailReason, MessageId, PeerId, PubSubId, PublishConfig, SessionId,
    SessionKind, SubscribeConfig,
};

use super::client::ClientState;
use super::merge::merge_requests;
use super::message::{ApiCall, Delivery};
use super::state::StateManager;
use super::transaction::PendingTransaction;

impl StateManager {
    pub(crate) fn handle_api(&mut self, call: ApiCall) {
        match call {
            ApiCall::Connect { client, callback } => self.on_connect(client, callback),
            ApiCall::Disconnect { client } => self.on_disconnect(client),
            ApiCall::RequestConfig { client, request } => self.on_request_config(client, request),
            ApiCall::Publish {
                client,
                config,
                callback,
            } => self.on_publish(client, config, callback),
            ApiCall::UpdatePublish {
                client,
                session,
                config,
            } => self.on_update_publish(client, session, config),
            ApiCall::Subscribe {
                client,
                config,
                callback,
            } => self.on_subscribe(client, config, callback),
            ApiCall::UpdateSubscribe {
                client,
                session,
                config,
            } => self.on_update_subscribe(client, session, config),
            ApiCall::TerminateSession { client, session } => {
                self.on_terminate_session(client, session)
            }
            ApiCall::SendMessage {
                client,
                session,
                peer,
                payload,
                message,
            } => self.on_send_message(client, session, peer, payload, message),
        }
    }

    fn on_connect(&mut self, client: ClientId, callback: Option<Arc<dyn EventCallback>>) {
        if self.clients.contains_key(&client) {
            warn!(%client, "duplicate connect ignored");
            return;
        }
        debug!(%client, has_callback = callback.is_some(), "client connected");
        self.clients.insert(client, ClientState::new(client, callback));
    }

    fn on_disconnect(&mut self, client_id: ClientId) {
        let Some(mut client) = self.clients.remove(&client_id) else {
            warn!(client = %client_id, "disconnect for unknown client");
            return;
        };
        debug!(client = %client_id, "client disconnected");

        // Sweep this client's in-flight commands. Creates that were already
        // sent to the firmware may still be granted; remember them so the
        // grant can be revoked when the answer arrives.
        for (tx, record) in self.transactions.sweep_client(client_id) {
            if let PendingTransaction::CreateSession { kind, .. } = record {
                self.orphaned_creates.insert(tx, kind);
            }
        }

        // Stop every session the firmware still runs for this client.
        for (_, session) in client.take_sessions() {
            if session.is_terminated() {
                continue;
            }
            if let Some(pub_sub_id) = session.pub_sub_id() {
                self.stop_session(session.kind(), pub_sub_id);
            }
        }

        if client.config().is_some() {
            self.push_device_config();
        }
    }

    fn on_request_config(&mut self, client_id: ClientId, request: ConfigRequest) {
        if !self.clients.contains_key(&client_id) {
            warn!(client = %client_id, "configuration request from unknown client");
            return;
        }
        if let Err(err) = request.validate() {
            warn!(client = %client_id, %err, "rejecting invalid configuration request");
            let callback = self
                .clients
                .get(&client_id)
                .and_then(|client| client.event_callback().cloned());
            if let Some(callback) = callback {
                self.defer(Delivery::ConfigFailed {
                    callback,
                    request,
                    reason: FailReason::InvalidArgs,
                });
            }
            return;
        }

        if let Some(client) = self.clients.get_mut(&client_id) {
            client.set_config(request.clone());
        }
        let Some(merged) = merge_requests(self.clients.values().filter_map(ClientState::config))
        else {
            return;
        };
        let tx = self.transactions.allocate(PendingTransaction::Config {
            client: client_id,
            request,
        });
        debug!(client = %client_id, %tx, "pushing merged device configuration");
        self.device_config = Some(merged.clone());
        self.hal.enable_and_configure(tx, &merged);
    }

    fn on_publish(
        &mut self,
        client: ClientId,
        config: PublishConfig,
        callback: Arc<dyn SessionCallback>,
    ) {
        if !self.clients.contains_key(&client) {
            warn!(%client, "publish from unknown client");
            return;
        }
        let tx = self.transactions.allocate(PendingTransaction::CreateSession {
            client,
            kind: SessionKind::Publish,
            callback,
        });
        debug!(%client, %tx, service = %config.service_name, "starting publish session");
        self.hal.publish(tx, None, &config);
    }

    fn on_subscribe(
        &mut self,
        client: ClientId,
        config: SubscribeConfig,
        callback: Arc<dyn SessionCallback>,
    ) {
        if !self.clients.contains_key(&client) {
            warn!(%client, "subscribe from unknown client");
            return;
        }
        let tx = self.transactions.allocate(PendingTransaction::CreateSession {
            client,
            kind: SessionKind::Subscribe,
            callback,
        });
        debug!(%client, %tx, service = %config.service_name, "starting subscribe session");
        self.hal.subscribe(tx, None, &config);
    }

    fn on_update_publish(&mut self, client: ClientId, session: SessionId, config: PublishConfig) {
        let Some(pub_sub_id) = self.update_precheck(client, session, SessionKind::Publish) else {
            return;
        };
        let tx = self
            .transactions
            .allocate(PendingTransaction::UpdateSession { client, session });
        self.hal.publish(tx, Some(pub_sub_id), &config);
    }

    fn on_update_subscribe(
        &mut self,
        client: ClientId,
        session: SessionId,
        config: SubscribeConfig,
    ) {
        let Some(pub_sub_id) = self.update_precheck(client, session, SessionKind::Subscribe) else {
            return;
        };
        let tx = self
            .transactions
            .allocate(PendingTransaction::UpdateSession { client, session });
        self.hal.subscribe(tx, Some(pub_sub_id), &config);
    }

    /// Shared validation for session updates.
    ///
    /// Returns the firmware id to re-issue against, or `None` after deferring
    /// the appropriate local failure. An update for a session this manager no
    /// longer knows is silent: the app already asked for (or acknowledged)
    /// its termination.
    fn update_precheck(
        &self,
        client_id: ClientId,
        session_id: SessionId,
        kind: SessionKind,
    ) -> Option<PubSubId> {
        let Some(client) = self.clients.get(&client_id) else {
            warn!(client = %client_id, "session update from unknown client");
            return None;
        };
        let Some(session) = client.session(session_id) else {
            debug!(client = %client_id, session = %session_id, "update for unknown session");
            return None;
        };
        if session.is_terminated() {
            self.defer(Delivery::SessionConfigFail {
                callback: session.callback().clone(),
                reason: FailReason::SessionTerminated,
            });
            return None;
        }
        if session.kind() != kind {
            debug!(
                client = %client_id,
                session = %session_id,
                expected = session.kind().as_str(),
                "session update with mismatched kind"
            );
            self.defer(Delivery::SessionConfigFail {
                callback: session.callback().clone(),
                reason: FailReason::Other,
            });
            return None;
        }
        session.pub_sub_id()
    }

    fn on_terminate_session(&mut self, client_id: ClientId, session_id: SessionId) {
        let session = match self.clients.get_mut(&client_id) {
            Some(client) => client.remove_session(session_id),
            None => {
                warn!(client = %client_id, "terminate from unknown client");
                return;
            }
        };
        let Some(session) = session else {
            debug!(client = %client_id, session = %session_id, "terminate for unknown session");
            return;
        };
        if session.is_terminated() {
            // The firmware already dropped its side; nothing to stop.
            return;
        }
        if let Some(pub_sub_id) = session.pub_sub_id() {
            self.stop_session(session.kind(), pub_sub_id);
        }
    }

    fn on_send_message(
        &mut self,
        client_id: ClientId,
        session_id: SessionId,
        peer: PeerId,
        payload: Bytes,
        message: MessageId,
    ) {
        let Some(client) = self.clients.get(&client_id) else {
            warn!(client = %client_id, "send from unknown client");
            return;
        };
        let Some(session) = client.session(session_id) else {
            debug!(client = %client_id, session = %session_id, "send for unknown session");
            return;
        };
        let Some(pub_sub_id) = session.pub_sub_id() else {
            debug!(client = %client_id, session = %session_id, "send before session established");
            return;
        };
        let Some(mac) = session.lookup_peer(peer) else {
            debug!(client = %client_id, session = %session_id, %peer, "send to unknown peer");
            self.defer(Delivery::MessageSendFail {
                callback: session.callback().clone(),
                message,
                reason: FailReason::NoMatchSession,
            });
            return;
        };
        let tx = self.transactions.allocate(PendingTransaction::SendMessage {
            client: client_id,
            session: session_id,
            message,
        });
        self.hal.send_message(tx, pub_sub_id, peer, mac, &payload);
    }

    /// Re-derive and push the device configuration after membership changed.
    ///
    /// With no configured clients left the device is disabled, but only if it
    /// was enabled in the first place.
    fn push_device_config(&mut self) {
        match merge_requests(self.clients.values().filter_map(ClientState::config)) {
            Some(merged) => {
                let tx = self.transactions.allocate(PendingTransaction::NoOp);
                debug!(%tx, "pushing recomputed device configuration");
                self.device_config = Some(merged.clone());
                self.hal.enable_and_configure(tx, &merged);
            }
            None => {
                if self.device_config.take().is_some() {
                    let tx = self.transactions.allocate(PendingTransaction::NoOp);
                    debug!(%tx, "no configured clients remain, disabling");
                    self.hal.disable(tx);
                }
            }
        }
    }
}

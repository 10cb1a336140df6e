//! Firmware event handlers.
//!
//! An unknown transaction id or an unknown publish/subscribe id is absorbed
//! silently: no client notification, no state change beyond clearing the
//! transaction record if one exists. The one exception is a create that was
//! granted after its owner disconnected, which gets a compensating stop.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::core::{
    Capabilities, ClusterEvent, FailReason, MacAddress, PeerId, PubSubId, TerminateReason,
    TransactionId,
};

use super::message::HalEvent;
use super::session::SessionState;
use super::state::StateManager;
use super::transaction::PendingTransaction;

impl StateManager {
    pub(crate) fn handle_hal(&mut self, event: HalEvent) {
        match event {
            HalEvent::ConfigCompleted { tx } => self.on_config_completed(tx),
            HalEvent::ConfigFailed { tx, reason } => self.on_config_failed(tx, reason),
            HalEvent::PublishSuccess { tx, pub_sub_id }
            | HalEvent::SubscribeSuccess { tx, pub_sub_id } => {
                self.on_session_granted(tx, pub_sub_id)
            }
            HalEvent::PublishFail { tx, reason } | HalEvent::SubscribeFail { tx, reason } => {
                self.on_session_request_failed(tx, reason)
            }
            HalEvent::MessageSendSuccess { tx } => self.on_message_send_result(tx, None),
            HalEvent::MessageSendFail { tx, reason } => {
                self.on_message_send_result(tx, Some(reason))
            }
            HalEvent::PublishTerminated { pub_sub_id, reason }
            | HalEvent::SubscribeTerminated { pub_sub_id, reason } => {
                self.on_session_terminated(pub_sub_id, reason)
            }
            HalEvent::Match {
                pub_sub_id,
                peer,
                peer_mac,
                service_specific_info,
                match_filter,
            } => self.on_match(pub_sub_id, peer, peer_mac, service_specific_info, match_filter),
            HalEvent::MessageReceived {
                pub_sub_id,
                peer,
                peer_mac,
                payload,
            } => self.on_message_received(pub_sub_id, peer, peer_mac, payload),
            HalEvent::ClusterChange { event, mac } => self.on_cluster_change(event, mac),
            HalEvent::InterfaceAddressChange { mac } => self.on_interface_address_change(mac),
            HalEvent::NanDown { reason } => self.on_nan_down(reason),
            HalEvent::CapabilitiesUpdate { tx, capabilities } => {
                self.on_capabilities_update(tx, capabilities)
            }
            HalEvent::UnknownTransaction {
                response_type,
                tx,
                status,
            } => self.on_unknown_transaction(response_type, tx, status),
            HalEvent::NoOpTransaction { tx } => self.on_no_op_transaction(tx),
        }
    }

    fn on_config_completed(&mut self, tx: TransactionId) {
        match self.transactions.take(tx) {
            Some(PendingTransaction::Config { client, request }) => {
                let Some(client) = self.clients.get(&client) else {
                    debug!(%tx, "configuration completed for departed client");
                    return;
                };
                if let Some(callback) = client.event_callback() {
                    callback.on_config_completed(&request);
                }
            }
            Some(_) => debug!(%tx, "configuration completion for mismatched transaction"),
            None => debug!(%tx, "configuration completion for unknown transaction"),
        }
    }

    fn on_config_failed(&mut self, tx: TransactionId, reason: FailReason) {
        match self.transactions.take(tx) {
            Some(PendingTransaction::Config { client, request }) => {
                debug!(%tx, %client, %reason, "device configuration failed");
                let Some(client) = self.clients.get(&client) else {
                    return;
                };
                if let Some(callback) = client.event_callback() {
                    callback.on_config_failed(&request, reason);
                }
            }
            Some(_) => debug!(%tx, "configuration failure for mismatched transaction"),
            None => debug!(%tx, "configuration failure for unknown transaction"),
        }
    }

    /// The firmware granted a publish or subscribe request.
    ///
    /// The session kind comes from the create record, not from which flavour
    /// of success callback delivered the grant.
    fn on_session_granted(&mut self, tx: TransactionId, pub_sub_id: PubSubId) {
        match self.transactions.take(tx) {
            Some(PendingTransaction::CreateSession {
                client,
                kind,
                callback,
            }) => {
                let Some(state) = self.clients.get_mut(&client) else {
                    debug!(%tx, %pub_sub_id, "session granted to departed client, revoking");
                    self.stop_session(kind, pub_sub_id);
                    return;
                };
                let started = callback.clone();
                let mut session = SessionState::new(kind, callback);
                session.set_pub_sub_id(pub_sub_id);
                let session_id = state.add_session(session);
                debug!(%client, session = %session_id, %pub_sub_id, kind = kind.as_str(), "session established");
                started.on_session_started(session_id);
            }
            // An update leaves the established id untouched; nothing to report.
            Some(PendingTransaction::UpdateSession { .. }) => {}
            Some(_) => debug!(%tx, "session grant for mismatched transaction"),
            None => {
                if let Some(kind) = self.orphaned_creates.remove(&tx) {
                    debug!(%tx, %pub_sub_id, "session granted after disconnect, revoking");
                    self.stop_session(kind, pub_sub_id);
                } else {
                    debug!(%tx, "session grant for unknown transaction");
                }
            }
        }
    }

    fn on_session_request_failed(&mut self, tx: TransactionId, reason: FailReason) {
        match self.transactions.take(tx) {
            Some(PendingTransaction::CreateSession { callback, .. }) => {
                callback.on_session_config_fail(reason);
            }
            Some(PendingTransaction::UpdateSession { client, session }) => {
                // The session stays alive and established; later updates are
                // legal and route to the same firmware id.
                let callback = self
                    .clients
                    .get(&client)
                    .and_then(|c| c.session(session))
                    .map(|s| s.callback().clone());
                match callback {
                    Some(callback) => callback.on_session_config_fail(reason),
                    None => debug!(%tx, "update failure for vanished session"),
                }
            }
            Some(_) => debug!(%tx, "session failure for mismatched transaction"),
            None => {
                if self.orphaned_creates.remove(&tx).is_some() {
                    debug!(%tx, "orphaned create failed, nothing to revoke");
                } else {
                    debug!(%tx, "session failure for unknown transaction");
                }
            }
        }
    }

    fn on_message_send_result(&mut self, tx: TransactionId, failure: Option<FailReason>) {
        match self.transactions.take(tx) {
            Some(PendingTransaction::SendMessage {
                client,
                session,
                message,
            }) => {
                let callback = self
                    .clients
                    .get(&client)
                    .and_then(|c| c.session(session))
                    .map(|s| s.callback().clone());
                let Some(callback) = callback else {
                    debug!(%tx, "send result for vanished session");
                    return;
                };
                match failure {
                    None => callback.on_message_send_success(message),
                    Some(reason) => callback.on_message_send_fail(message, reason),
                }
            }
            Some(_) => debug!(%tx, "send result for mismatched transaction"),
            None => debug!(%tx, "send result for unknown transaction"),
        }
    }

    /// The firmware ended a session on its own.
    ///
    /// The session is flagged and reported, but stays addressable by its
    /// session id so a racing update still reaches its callback; the app's
    /// terminate_session (or disconnect) drops it for good.
    fn on_session_terminated(&mut self, pub_sub_id: PubSubId, reason: TerminateReason) {
        let Some(session) = self.session_by_pub_sub_mut(pub_sub_id) else {
            debug!(%pub_sub_id, "termination for unknown session");
            return;
        };
        session.mark_terminated();
        session.callback().on_session_terminated(reason);
    }

    fn on_match(
        &mut self,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        service_specific_info: Bytes,
        match_filter: Bytes,
    ) {
        let Some(session) = self.session_by_pub_sub_mut(pub_sub_id) else {
            debug!(%pub_sub_id, "match for unknown session");
            return;
        };
        session.update_peer(peer, peer_mac);
        session
            .callback()
            .on_match(peer, &service_specific_info, &match_filter);
    }

    fn on_message_received(
        &mut self,
        pub_sub_id: PubSubId,
        peer: PeerId,
        peer_mac: MacAddress,
        payload: Bytes,
    ) {
        let Some(session) = self.session_by_pub_sub_mut(pub_sub_id) else {
            debug!(%pub_sub_id, "message for unknown session");
            return;
        };
        // Transparent peer identity refresh: replies go to the new MAC.
        session.update_peer(peer, peer_mac);
        session.callback().on_message_received(peer, &payload);
    }

    fn on_cluster_change(&mut self, event: ClusterEvent, mac: MacAddress) {
        debug!(?event, %mac, "cluster change");
        self.notify_identity_changed();
    }

    fn on_interface_address_change(&mut self, mac: MacAddress) {
        debug!(%mac, "interface address change");
        self.notify_identity_changed();
    }

    /// Deliver identity changes to clients whose current request opted in.
    ///
    /// The device-level merge may have identity reporting on for everyone;
    /// filtering happens here, per client.
    fn notify_identity_changed(&self) {
        for client in self.clients.values() {
            if !client.identity_change_enabled() {
                continue;
            }
            if let Some(callback) = client.event_callback() {
                callback.on_identity_changed();
            }
        }
    }

    fn on_nan_down(&mut self, reason: FailReason) {
        warn!(%reason, "NAN went down");
        // Tables stay intact; clients decide whether to disconnect.
        for client in self.clients.values() {
            if let Some(callback) = client.event_callback() {
                callback.on_nan_down(reason);
            }
        }
    }

    fn on_capabilities_update(&mut self, tx: TransactionId, capabilities: Capabilities) {
        self.transactions.take(tx);
        debug!(%tx, ?capabilities, "capabilities updated");
        self.capabilities = Some(capabilities);
    }

    fn on_unknown_transaction(&mut self, response_type: u32, tx: TransactionId, status: i32) {
        if self.transactions.take(tx).is_some() || self.orphaned_creates.remove(&tx).is_some() {
            warn!(%tx, response_type, status, "response with unknown type, clearing transaction");
        } else {
            debug!(%tx, response_type, status, "unknown-type response for unknown transaction");
        }
    }

    fn on_no_op_transaction(&mut self, tx: TransactionId) {
        self.transactions.take(tx);
    }
}

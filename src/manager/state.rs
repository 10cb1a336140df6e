//! The manager itself: ownership of all state tables and message dispatch.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crossbeam::channel::Sender;

use crate::core::{
    Capabilities, ClientId, ConfigRequest, PubSubId, SessionId, SessionKind, TransactionId,
};
use crate::hal::NanHal;

use super::client::ClientState;
use super::message::{Delivery, Message};
use super::session::SessionState;
use super::transaction::{PendingTransaction, TransactionRegistry};

/// Single-threaded coordinator between application clients and the NAN
/// firmware.
///
/// Owned by a [`MessageLoop`](crate::looper::MessageLoop); every mutation
/// happens inside [`handle`](Self::handle), one message at a time. HAL
/// commands are issued synchronously from handlers and answered later by a
/// `HalEvent` carrying the command's transaction id.
pub struct StateManager {
    pub(crate) hal: Arc<dyn NanHal>,
    /// Loop-back sender for deferred deliveries.
    pub(crate) loop_tx: Sender<Message>,
    pub(crate) clients: BTreeMap<ClientId, ClientState>,
    pub(crate) transactions: TransactionRegistry,
    /// Create transactions swept by a disconnect, waiting for the firmware's
    /// answer so the granted session can be stopped again.
    pub(crate) orphaned_creates: HashMap<TransactionId, SessionKind>,
    /// The configuration currently pushed to the device, if any.
    pub(crate) device_config: Option<ConfigRequest>,
    pub(crate) capabilities: Option<Capabilities>,
}

impl StateManager {
    pub(crate) fn new(hal: Arc<dyn NanHal>, loop_tx: Sender<Message>) -> Self {
        StateManager {
            hal,
            loop_tx,
            clients: BTreeMap::new(),
            transactions: TransactionRegistry::default(),
            orphaned_creates: HashMap::new(),
            device_config: None,
            capabilities: None,
        }
    }

    pub(crate) fn handle(&mut self, message: Message) {
        match message {
            Message::Api(call) => self.handle_api(call),
            Message::Hal(event) => self.handle_hal(event),
            Message::Deliver(delivery) => delivery.dispatch(),
            Message::Shutdown => {}
        }
    }

    /// Post a delivery back to the loop; it fires after the current handler
    /// returns.
    pub(crate) fn defer(&self, delivery: Delivery) {
        // Ignore send errors - receiver may have been dropped.
        let _ = self.loop_tx.send(Message::Deliver(delivery));
    }

    /// Issue the HAL stop matching `kind`, registered as a no-op transaction.
    pub(crate) fn stop_session(&mut self, kind: SessionKind, pub_sub_id: PubSubId) {
        let tx = self.transactions.allocate(PendingTransaction::NoOp);
        match kind {
            SessionKind::Publish => self.hal.stop_publish(tx, pub_sub_id),
            SessionKind::Subscribe => self.hal.stop_subscribe(tx, pub_sub_id),
        }
    }

    /// Locate a live session by its firmware id, across all clients.
    pub(crate) fn session_by_pub_sub_mut(&mut self, id: PubSubId) -> Option<&mut SessionState> {
        self.clients
            .values_mut()
            .find_map(|client| client.session_by_pub_sub_mut(id))
    }
}

/// Read-only introspection, for diagnostics and tests.
impl StateManager {
    pub fn pending_transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn has_pending_transaction(&self, tx: TransactionId) -> bool {
        self.transactions.contains(tx)
    }

    /// How many pending transactions still name `client`.
    pub fn client_references(&self, client: ClientId) -> usize {
        self.transactions.client_references(client)
    }

    pub fn client_ids(&self) -> Vec<ClientId> {
        self.clients.keys().copied().collect()
    }

    pub fn session_ids(&self, client: ClientId) -> Option<Vec<SessionId>> {
        self.clients.get(&client).map(ClientState::session_ids)
    }

    /// The configuration currently active at the device, if enabled.
    pub fn device_config(&self) -> Option<&ConfigRequest> {
        self.device_config.as_ref()
    }

    /// The latest firmware capability report, if one arrived.
    pub fn capabilities(&self) -> Option<Capabilities> {
        self.capabilities
    }
}

//! Pending-transaction registry.
//!
//! Every outgoing HAL command is tagged with a fresh 16-bit transaction id
//! and paired with a continuation record; the response handler takes the
//! record back out. Records removed here and nowhere else: terminal
//! response, owning-client sweep, or an unknown/no-op response.

use std::collections::HashMap;
use std::sync::Arc;

use crate::callbacks::SessionCallback;
use crate::core::{ClientId, ConfigRequest, MessageId, SessionId, SessionKind, TransactionId};

/// Continuation for one in-flight HAL command.
pub(crate) enum PendingTransaction {
    /// `enable_and_configure`. Carries the requesting client's own request,
    /// which is what the completion callback reports back.
    Config {
        client: ClientId,
        request: ConfigRequest,
    },
    /// Initial publish/subscribe; the session does not exist yet, so the
    /// record holds everything needed to build it.
    CreateSession {
        client: ClientId,
        kind: SessionKind,
        callback: Arc<dyn SessionCallback>,
    },
    /// Re-publish/re-subscribe on an established session.
    UpdateSession {
        client: ClientId,
        session: SessionId,
    },
    /// Outgoing message; `message` is echoed in the result callback.
    SendMessage {
        client: ClientId,
        session: SessionId,
        message: MessageId,
    },
    /// stop_publish / stop_subscribe / disable and other commands whose
    /// response carries no payload.
    NoOp,
}

impl PendingTransaction {
    pub(crate) fn client(&self) -> Option<ClientId> {
        match self {
            PendingTransaction::Config { client, .. }
            | PendingTransaction::CreateSession { client, .. }
            | PendingTransaction::UpdateSession { client, .. }
            | PendingTransaction::SendMessage { client, .. } => Some(*client),
            PendingTransaction::NoOp => None,
        }
    }
}

#[derive(Default)]
pub(crate) struct TransactionRegistry {
    pending: HashMap<u16, PendingTransaction>,
    last_id: u16,
}

impl TransactionRegistry {
    /// Bind `record` to a fresh transaction id.
    pub(crate) fn allocate(&mut self, record: PendingTransaction) -> TransactionId {
        let id = self.next_id();
        self.pending.insert(id.get(), record);
        id
    }

    /// Mint the next id: strictly increasing within a run, wrapping at the
    /// type limit, skipping 0 and ids still in flight.
    fn next_id(&mut self) -> TransactionId {
        loop {
            self.last_id = self.last_id.wrapping_add(1);
            if self.last_id == 0 {
                continue;
            }
            if !self.pending.contains_key(&self.last_id) {
                return TransactionId::new(self.last_id);
            }
        }
    }

    /// Remove and return the record for `id`, if known.
    pub(crate) fn take(&mut self, id: TransactionId) -> Option<PendingTransaction> {
        self.pending.remove(&id.get())
    }

    /// Remove every record owned by `client`, returning what was removed.
    pub(crate) fn sweep_client(
        &mut self,
        client: ClientId,
    ) -> Vec<(TransactionId, PendingTransaction)> {
        let ids: Vec<u16> = self
            .pending
            .iter()
            .filter(|(_, record)| record.client() == Some(client))
            .map(|(id, _)| *id)
            .collect();

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.pending.remove(&id) {
                removed.push((TransactionId::new(id), record));
            }
        }
        removed
    }

    pub(crate) fn contains(&self, id: TransactionId) -> bool {
        self.pending.contains_key(&id.get())
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// How many pending records name `client`.
    pub(crate) fn client_references(&self, client: ClientId) -> usize {
        self.pending
            .values()
            .filter(|record| record.client() == Some(client))
            .count()
    }
}

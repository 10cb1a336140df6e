//! Discovery-session state and its peer table.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::callbacks::SessionCallback;
use crate::core::{MacAddress, PeerId, PubSubId, SessionKind};

/// One publish or subscribe session owned by a client.
///
/// The kind is fixed at creation. The firmware-assigned id is installed
/// once, when the initial operation succeeds, and never changes afterwards
/// even across failed update attempts.
pub(crate) struct SessionState {
    kind: SessionKind,
    pub_sub_id: Option<PubSubId>,
    callback: Arc<dyn SessionCallback>,
    terminated: bool,
    peers: PeerTable,
}

impl SessionState {
    pub(crate) fn new(kind: SessionKind, callback: Arc<dyn SessionCallback>) -> Self {
        SessionState {
            kind,
            pub_sub_id: None,
            callback,
            terminated: false,
            peers: PeerTable::default(),
        }
    }

    pub(crate) fn kind(&self) -> SessionKind {
        self.kind
    }

    pub(crate) fn pub_sub_id(&self) -> Option<PubSubId> {
        self.pub_sub_id
    }

    pub(crate) fn set_pub_sub_id(&mut self, id: PubSubId) {
        if let Some(existing) = self.pub_sub_id {
            debug!(%existing, attempted = %id, "ignoring repeated pub/sub id install");
            return;
        }
        self.pub_sub_id = Some(id);
    }

    pub(crate) fn callback(&self) -> &Arc<dyn SessionCallback> {
        &self.callback
    }

    /// The firmware ended this session; it stays in the client table until
    /// the app acknowledges with terminate_session (or disconnects).
    pub(crate) fn mark_terminated(&mut self) {
        self.terminated = true;
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub(crate) fn update_peer(&mut self, peer: PeerId, mac: MacAddress) {
        self.peers.update(peer, mac);
    }

    pub(crate) fn lookup_peer(&self, peer: PeerId) -> Option<MacAddress> {
        self.peers.lookup(peer)
    }
}

/// Per-session map from peer instance id to its most-recently-seen MAC.
///
/// Refreshed on every match and received message; the freshest MAC wins, so
/// outgoing messages follow a peer across identity changes.
#[derive(Default)]
pub(crate) struct PeerTable {
    peers: HashMap<PeerId, MacAddress>,
}

impl PeerTable {
    pub(crate) fn update(&mut self, peer: PeerId, mac: MacAddress) {
        self.peers.insert(peer, mac);
    }

    pub(crate) fn lookup(&self, peer: PeerId) -> Option<MacAddress> {
        self.peers.get(&peer).copied()
    }
}

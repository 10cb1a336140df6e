//! Per-client connection state.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::callbacks::EventCallback;
use crate::core::{ClientId, ConfigRequest, PubSubId, SessionId};

use super::session::SessionState;

/// One connected client: its event callback, latest requested configuration,
/// and discovery sessions.
///
/// A client without an event callback receives no events; its configuration
/// still participates in the device-level merge.
pub(crate) struct ClientState {
    id: ClientId,
    event_callback: Option<Arc<dyn EventCallback>>,
    config: Option<ConfigRequest>,
    sessions: BTreeMap<SessionId, SessionState>,
    next_session_id: u32,
}

impl ClientState {
    pub(crate) fn new(id: ClientId, event_callback: Option<Arc<dyn EventCallback>>) -> Self {
        ClientState {
            id,
            event_callback,
            config: None,
            sessions: BTreeMap::new(),
            next_session_id: 1,
        }
    }

    pub(crate) fn id(&self) -> ClientId {
        self.id
    }

    pub(crate) fn event_callback(&self) -> Option<&Arc<dyn EventCallback>> {
        self.event_callback.as_ref()
    }

    pub(crate) fn config(&self) -> Option<&ConfigRequest> {
        self.config.as_ref()
    }

    pub(crate) fn set_config(&mut self, config: ConfigRequest) {
        self.config = Some(config);
    }

    /// Whether this client's current request opts into identity-change events.
    pub(crate) fn identity_change_enabled(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|config| config.identity_change_enabled)
    }

    /// Attach an established session under a freshly minted session id.
    pub(crate) fn add_session(&mut self, session: SessionState) -> SessionId {
        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;
        self.sessions.insert(id, session);
        id
    }

    pub(crate) fn session(&self, id: SessionId) -> Option<&SessionState> {
        self.sessions.get(&id)
    }

    pub(crate) fn session_mut(&mut self, id: SessionId) -> Option<&mut SessionState> {
        self.sessions.get_mut(&id)
    }

    pub(crate) fn remove_session(&mut self, id: SessionId) -> Option<SessionState> {
        self.sessions.remove(&id)
    }

    /// Locate a live (not firmware-terminated) session by its firmware id.
    pub(crate) fn session_by_pub_sub_mut(&mut self, id: PubSubId) -> Option<&mut SessionState> {
        self.sessions
            .values_mut()
            .find(|session| !session.is_terminated() && session.pub_sub_id() == Some(id))
    }

    pub(crate) fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }

    /// Hand over all sessions for disconnect cleanup.
    pub(crate) fn take_sessions(&mut self) -> BTreeMap<SessionId, SessionState> {
        std::mem::take(&mut self.sessions)
    }
}

//! Session registry for pending rendezvous transfers
//!
//! Maps each live session identifier to the hand-off slot that pairs its
//! downloader with its uploader. The map lock is only held for point
//! lookups and mutations, never while a transfer is waiting or copying.

mod handoff;
mod peer;
mod tunnel;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use p2pshare_common::SessionId;

pub use handoff::{HandOff, HandOffError};
pub use peer::{
    Completion, DeliveryHead, DownloadSink, HeadMissing, Peer, PeerReceiver,
    SINK_CHANNEL_CAPACITY, SinkClosed, TransferOutcome, envelope,
};
pub use tunnel::TunnelError;

/// Hand-off slot stored for one session
pub type Slot = Arc<HandOff<Peer>>;

/// Registry of pending sessions
///
/// Thread-safe registry that allows:
/// - Creating sessions with fresh identifiers
/// - Looking up a session's hand-off slot
/// - Removing sessions (idempotent, releases anyone waiting on the slot)
/// - Pairing a downloader with an uploader (see `deposit` and `claim`)
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Slot>>,
}

impl SessionRegistry {
    /// Create a new empty session registry
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session and return its identifier
    ///
    /// Uniqueness comes from the identifier's 128 bits of entropy; collisions
    /// are not checked.
    pub fn create_session(&self) -> SessionId {
        let id = SessionId::generate();
        self.sessions
            .write()
            .expect("session registry lock poisoned")
            .insert(id.clone(), Arc::new(HandOff::new()));
        id
    }

    /// Get the hand-off slot for a session, if it is still pending
    pub fn lookup(&self, id: &str) -> Option<Slot> {
        self.sessions
            .read()
            .expect("session registry lock poisoned")
            .get(id)
            .cloned()
    }

    /// Whether a session is still pending
    pub fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .expect("session registry lock poisoned")
            .contains_key(id)
    }

    /// Remove a session and close its slot
    ///
    /// Safe to call for unknown or already removed sessions. Any downloader or
    /// uploader blocked on the slot is released with a closed error.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .expect("session registry lock poisoned")
            .remove(id);

        match removed {
            Some(slot) => {
                slot.close();
                true
            }
            None => false,
        }
    }

    /// Get the number of pending sessions
    pub fn active_count(&self) -> usize {
        self.sessions
            .read()
            .expect("session registry lock poisoned")
            .len()
    }

    /// Remove every session and close its slot
    ///
    /// Releases all waiting downloaders and uploaders with a closed error.
    /// Transfers already copying are not affected. Returns how many sessions
    /// were dropped.
    pub fn close_all(&self) -> usize {
        let drained: Vec<Slot> = self
            .sessions
            .write()
            .expect("session registry lock poisoned")
            .drain()
            .map(|(_, slot)| slot)
            .collect();

        for slot in &drained {
            slot.close();
        }
        drained.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("active", &self.active_count())
            .finish()
    }
}

//! Rendezvous between a session's downloader and uploader
//!
//! `deposit` is the downloader's half and `claim` is the uploader's half.
//! Either may be called first; each blocks until the other arrives. Guards
//! keep the registry consistent when a waiting request is dropped because
//! its client disconnected.

use thiserror::Error;
use tracing::debug;

use super::{HandOffError, Peer, SessionRegistry, Slot};

/// Why a rendezvous did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TunnelError {
    /// No live session under this identifier (unknown, consumed, or deleted)
    #[error("session not found")]
    NotFound,
    /// A downloader is already waiting on this session
    #[error("session already has a waiting receiver")]
    ReceiverPresent,
}

impl SessionRegistry {
    /// Deposit a downloader's envelope and wait until an uploader takes it
    ///
    /// If the returned future is dropped while waiting, the session is
    /// removed so no uploader can pick up an envelope nobody is reading.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist, or is deleted while waiting
    /// - `ReceiverPresent` if another downloader is already waiting
    pub async fn deposit(&self, id: &str, peer: Peer) -> Result<(), TunnelError> {
        let slot = self.lookup(id).ok_or(TunnelError::NotFound)?;
        let guard = AbandonGuard::new(self, id, &slot);

        match slot.put(peer).await {
            Ok(()) => {
                guard.disarm();
                Ok(())
            }
            Err(HandOffError::Occupied) => {
                guard.disarm();
                Err(TunnelError::ReceiverPresent)
            }
            // Guard removes whatever is left of the session
            Err(HandOffError::Closed) => Err(TunnelError::NotFound),
        }
    }

    /// Wait for a downloader's envelope and take exclusive ownership of it
    ///
    /// On success the session is removed from the registry, so its identifier
    /// can never be used again. An uploader that stops waiting leaves the
    /// session in place for a retry.
    ///
    /// # Errors
    ///
    /// `NotFound` if the session does not exist, was consumed or deleted, or
    /// another uploader is already waiting on it.
    pub async fn claim(&self, id: &str) -> Result<Peer, TunnelError> {
        let slot = self.lookup(id).ok_or(TunnelError::NotFound)?;
        let _guard = ConsumeGuard {
            registry: self,
            id,
            slot: &slot,
        };

        slot.take().await.map_err(|e| {
            debug!(session = id, error = %e, "uploader could not claim session");
            TunnelError::NotFound
        })
    }
}

/// Removes a session whose waiting downloader went away
///
/// Disarmed once the envelope was handed over; otherwise dropping the guard
/// closes the slot and deletes the registry entry.
struct AbandonGuard<'a> {
    registry: &'a SessionRegistry,
    id: &'a str,
    slot: &'a Slot,
    armed: bool,
}

impl<'a> AbandonGuard<'a> {
    fn new(registry: &'a SessionRegistry, id: &'a str, slot: &'a Slot) -> Self {
        Self {
            registry,
            id,
            slot,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.slot.close();
            if self.registry.remove(self.id) {
                debug!(session = self.id, "removed session abandoned by its receiver");
            }
        }
    }
}

/// Removes a session once its slot has been spent
///
/// Runs on every exit from `claim`: after a successful hand-off, and when a
/// hand-off was lost because the uploader stopped waiting at the last moment.
struct ConsumeGuard<'a> {
    registry: &'a SessionRegistry,
    id: &'a str,
    slot: &'a Slot,
}

impl Drop for ConsumeGuard<'_> {
    fn drop(&mut self) {
        if self.slot.is_spent() {
            self.registry.remove(self.id);
        }
    }
}

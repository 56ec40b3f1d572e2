//! Transfer tracking for DoS protection
//!
//! Limits how many receive and upload requests a single IP address may have
//! in flight at once. Waiting downloaders hold a slot for as long as they
//! wait, so without a cap one client could pin an unbounded number of
//! sessions.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// Tracks active transfers per IP address
///
/// A limit of 0 means unlimited transfers are allowed.
#[derive(Debug)]
pub struct TransferTracker {
    /// Map of IP addresses to their current transfer count
    transfers: Arc<Mutex<HashMap<IpAddr, usize>>>,
    /// Maximum transfers allowed per IP (0 = unlimited)
    max_transfers_per_ip: usize,
}

impl TransferTracker {
    /// Create a new tracker with the specified limit
    #[must_use]
    pub fn new(max_transfers_per_ip: usize) -> Self {
        Self {
            transfers: Arc::new(Mutex::new(HashMap::new())),
            max_transfers_per_ip,
        }
    }

    /// Try to acquire a transfer slot for the given IP
    ///
    /// Returns `None` if the IP has reached its limit. The returned guard
    /// releases the slot when dropped.
    pub fn try_acquire(&self, ip: IpAddr) -> Option<TransferGuard> {
        let max = self.max_transfers_per_ip;
        let mut transfers = self.transfers.lock().expect("transfer tracker lock");
        let count = transfers.entry(ip).or_insert(0);

        // 0 means unlimited
        if max > 0 && *count >= max {
            return None;
        }

        *count += 1;
        Some(TransferGuard {
            ip,
            transfers: self.transfers.clone(),
        })
    }
}

/// RAII guard that releases a transfer slot when dropped
///
/// Held for the whole request, including time spent blocked on the
/// rendezvous, so the slot is released even when the client disconnects.
#[derive(Debug)]
pub struct TransferGuard {
    ip: IpAddr,
    transfers: Arc<Mutex<HashMap<IpAddr, usize>>>,
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        let mut transfers = self.transfers.lock().expect("transfer tracker lock");
        if let Some(count) = transfers.get_mut(&self.ip) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                transfers.remove(&self.ip);
            }
        }
    }
}

//! Single-use rendezvous slot
//!
//! A `HandOff` behaves like an unbuffered channel that carries exactly one
//! value in its lifetime. Whichever side arrives first waits for the other:
//! `put` does not return until a taker has the value, and `take` does not
//! return until a putter has supplied one.
//!
//! The slot state lives behind a short `Mutex` critical section that is never
//! held across an await point. Waiting is done on oneshot channels created
//! inside the critical section, so unrelated slots never contend.

use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::oneshot;

/// Why a hand-off did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandOffError {
    /// Another party of the same role is already waiting on this slot
    #[error("slot already has a waiting party on this side")]
    Occupied,
    /// The slot was consumed or closed
    #[error("slot is closed")]
    Closed,
}

enum SlotState<T> {
    /// Nobody has arrived yet
    Vacant,
    /// A putter is waiting for its value to be taken
    Offered {
        value: T,
        taken: oneshot::Sender<()>,
    },
    /// A taker is waiting for a value
    Awaiting(oneshot::Sender<T>),
    /// The value was delivered, or the slot was closed
    Spent,
}

/// Zero-capacity, single-use synchronization slot
pub struct HandOff<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> HandOff<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Vacant),
        }
    }

    /// Deposit a value and wait until a taker has received it
    ///
    /// # Errors
    ///
    /// - `Occupied` if another putter is already waiting (the slot is untouched)
    /// - `Closed` if the slot was spent, or is closed while waiting
    pub async fn put(&self, value: T) -> Result<(), HandOffError> {
        let taken_rx = {
            let mut state = self.state.lock().expect("hand-off lock poisoned");
            match std::mem::replace(&mut *state, SlotState::Spent) {
                SlotState::Vacant => offer(&mut state, value),
                SlotState::Awaiting(tx) => match tx.send(value) {
                    // Taker had it delivered directly; slot stays spent
                    Ok(()) => return Ok(()),
                    // Taker went away before we arrived; wait for the next one
                    Err(value) => offer(&mut state, value),
                },
                offered @ SlotState::Offered { .. } => {
                    *state = offered;
                    return Err(HandOffError::Occupied);
                }
                SlotState::Spent => return Err(HandOffError::Closed),
            }
        };

        taken_rx.await.map_err(|_| HandOffError::Closed)
    }

    /// Wait for a value to be deposited and take it
    ///
    /// # Errors
    ///
    /// - `Occupied` if another taker is already waiting (the slot is untouched)
    /// - `Closed` if the slot was spent, or is closed while waiting
    pub async fn take(&self) -> Result<T, HandOffError> {
        let value_rx = {
            let mut state = self.state.lock().expect("hand-off lock poisoned");
            match std::mem::replace(&mut *state, SlotState::Spent) {
                SlotState::Offered { value, taken } => {
                    // A putter that stopped waiting must not have its value delivered
                    return match taken.send(()) {
                        Ok(()) => Ok(value),
                        Err(()) => Err(HandOffError::Closed),
                    };
                }
                SlotState::Vacant => await_value(&mut state),
                SlotState::Awaiting(tx) if tx.is_closed() => await_value(&mut state),
                awaiting @ SlotState::Awaiting(_) => {
                    *state = awaiting;
                    return Err(HandOffError::Occupied);
                }
                SlotState::Spent => return Err(HandOffError::Closed),
            }
        };

        value_rx.await.map_err(|_| HandOffError::Closed)
    }

    /// Mark the slot spent, releasing any waiting putter or taker with `Closed`
    pub fn close(&self) {
        let previous = {
            let mut state = self.state.lock().expect("hand-off lock poisoned");
            std::mem::replace(&mut *state, SlotState::Spent)
        };
        drop(previous);
    }

    /// Whether a putter is currently waiting for a taker
    pub fn is_offered(&self) -> bool {
        matches!(
            *self.state.lock().expect("hand-off lock poisoned"),
            SlotState::Offered { .. }
        )
    }

    /// Whether a taker is currently waiting for a putter
    pub fn is_awaiting(&self) -> bool {
        matches!(
            *self.state.lock().expect("hand-off lock poisoned"),
            SlotState::Awaiting(_)
        )
    }

    /// Whether the value was delivered or the slot was closed
    pub fn is_spent(&self) -> bool {
        matches!(
            *self.state.lock().expect("hand-off lock poisoned"),
            SlotState::Spent
        )
    }
}

impl<T> Default for HandOff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandOff<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match *self.state.lock().expect("hand-off lock poisoned") {
            SlotState::Vacant => "vacant",
            SlotState::Offered { .. } => "offered",
            SlotState::Awaiting(_) => "awaiting",
            SlotState::Spent => "spent",
        };
        f.debug_struct("HandOff").field("state", &state).finish()
    }
}

fn offer<T>(state: &mut SlotState<T>, value: T) -> oneshot::Receiver<()> {
    let (taken, taken_rx) = oneshot::channel();
    *state = SlotState::Offered { value, taken };
    taken_rx
}

fn await_value<T>(state: &mut SlotState<T>) -> oneshot::Receiver<T> {
    let (tx, rx) = oneshot::channel();
    *state = SlotState::Awaiting(tx);
    rx
}

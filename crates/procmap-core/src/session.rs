//! Latest-request-wins bookkeeping for recomputations triggered by an
//! interactive shell.
//!
//! Every recompute takes a [`Ticket`] before it starts waiting on a remote
//! source. When the data arrives the result is only published if no newer
//! ticket has been issued in the meantime.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RecomputeGate {
    latest: AtomicU64,
}

impl RecomputeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Holds the most recent accepted value of a recomputation.
#[derive(Debug)]
pub struct LatestValue<T> {
    gate: RecomputeGate,
    value: Mutex<Option<T>>,
}

impl<T: Clone> LatestValue<T> {
    pub fn new() -> Self {
        Self {
            gate: RecomputeGate::new(),
            value: Mutex::new(None),
        }
    }

    /// Issue a new ticket and clear the published value while a request is
    /// in flight. Both happen under the value lock, so a newer request's
    /// result can never be wiped by an older request starting late.
    pub fn begin_and_reset(&self) -> Ticket {
        let mut slot = self.value.lock();
        *slot = None;
        self.gate.begin()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.gate.is_current(ticket)
    }

    /// Store `value` if `ticket` is still the latest; stale results are dropped.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let mut slot = self.value.lock();
        if !self.gate.is_current(ticket) {
            debug!(generation = ticket.0, "dropping stale result");
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().clone()
    }
}

impl<T: Clone> Default for LatestValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

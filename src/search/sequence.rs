use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter for one kind of fetch.
///
/// Each outgoing request takes a [`Ticket`]; when its response arrives it is
/// applied only if no newer ticket has been issued since.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Make every outstanding ticket stale without issuing a new request
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

// Search debounce: at most one pending query, replaced on every keystroke.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct PendingSearch {
    query: String,
    deadline: Instant,
}

/// Cancellable single-slot timer for the search box.
///
/// Scheduling replaces whatever was pending, so only the most recent query
/// can ever come due.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingSearch>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `query` to fire `delay` after `now`, cancelling any pending one.
    pub fn schedule(&mut self, query: String, now: Instant) {
        self.pending = Some(PendingSearch {
            query,
            deadline: now + self.delay,
        });
    }

    /// Drop the pending query, returning it if there was one.
    pub fn cancel(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.query)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending query if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

//! Correlation of outstanding external requests with the step that issued them.
//!
//! Controllers never call the content collaborator themselves. They hand out a
//! [`RequestTicket`], the caller performs the request, and the response is fed
//! back together with the ticket. A response whose ticket no longer matches the
//! outstanding request belongs to a step the user already left and is rejected.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque handle identifying one outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static TICKET_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Tickets are unique for the life of the process, so a response can never
/// match a request issued by another session or an earlier visit to a step.
pub fn next_ticket() -> RequestTicket {
    RequestTicket(TICKET_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// At most one outstanding request of kind `K`.
#[derive(Debug, Clone)]
pub struct Outstanding<K> {
    pending: Option<(RequestTicket, K)>,
}

impl<K> Default for Outstanding<K> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<K: Copy + PartialEq> Outstanding<K> {
    /// Tracker whose first request is already in flight.
    pub fn started(kind: K) -> (Self, RequestTicket) {
        let ticket = next_ticket();
        let outstanding = Self {
            pending: Some((ticket, kind)),
        };
        (outstanding, ticket)
    }

    /// Issue a ticket for `kind`. Returns the kind already in flight when a
    /// request is outstanding.
    pub fn issue(&mut self, kind: K) -> Result<RequestTicket, K> {
        if let Some((_, current)) = self.pending {
            return Err(current);
        }
        let ticket = next_ticket();
        self.pending = Some((ticket, kind));
        Ok(ticket)
    }

    pub fn is_current(&self, ticket: RequestTicket, kind: K) -> bool {
        matches!(
            self.pending,
            Some((current, current_kind)) if current == ticket && current_kind == kind
        )
    }

    /// Clear the outstanding request if `ticket` and `kind` match it.
    pub fn settle(&mut self, ticket: RequestTicket, kind: K) -> bool {
        if self.is_current(ticket, kind) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Forget the outstanding request; its response will be treated as stale.
    pub fn abandon(&mut self) {
        self.pending = None;
    }

    /// Clear the outstanding request if it was issued under `ticket`,
    /// whatever its kind. Returns the released kind.
    pub fn release(&mut self, ticket: RequestTicket) -> Option<K> {
        match self.pending {
            Some((current, kind)) if current == ticket => {
                self.pending = None;
                Some(kind)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<K> {
        self.pending.map(|(_, kind)| kind)
    }

    pub fn ticket(&self) -> Option<RequestTicket> {
        self.pending.map(|(ticket, _)| ticket)
    }
}

/// Runs `release` when dropped unless disarmed first.
///
/// Held across an awaited content call, so a request future dropped before
/// its response frees the ticket it stored.
pub struct ReleaseOnDrop<F: FnOnce()> {
    release: Option<F>,
}

impl<F: FnOnce()> ReleaseOnDrop<F> {
    pub fn new(release: F) -> Self {
        Self {
            release: Some(release),
        }
    }

    /// The response arrived; the caller settles the ticket itself.
    pub fn disarm(mut self) {
        self.release = None;
    }
}

impl<F: FnOnce()> Drop for ReleaseOnDrop<F> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Questions,
        Review,
    }

    #[test]
    fn only_one_request_may_be_outstanding() {
        let mut outstanding = Outstanding::default();
        let ticket = outstanding.issue(Kind::Questions).expect("first issue");
        assert_eq!(outstanding.issue(Kind::Review), Err(Kind::Questions));
        assert!(outstanding.settle(ticket, Kind::Questions));
        assert!(outstanding.issue(Kind::Review).is_ok());
    }

    #[test]
    fn mismatched_or_abandoned_tickets_do_not_settle() {
        let mut outstanding = Outstanding::default();
        let first = outstanding.issue(Kind::Questions).expect("first issue");
        assert!(!outstanding.settle(first, Kind::Review));

        outstanding.abandon();
        assert!(!outstanding.settle(first, Kind::Questions));

        let second = outstanding.issue(Kind::Questions).expect("second issue");
        assert_ne!(first, second);
        assert!(!outstanding.settle(first, Kind::Questions));
        assert!(outstanding.settle(second, Kind::Questions));
        assert_eq!(outstanding.pending(), None);
    }

    #[test]
    fn release_only_clears_the_matching_ticket() {
        let mut outstanding = Outstanding::default();
        let first = outstanding.issue(Kind::Review).expect("first issue");
        outstanding.abandon();
        let second = outstanding.issue(Kind::Review).expect("second issue");

        assert_eq!(outstanding.release(first), None);
        assert_eq!(outstanding.pending(), Some(Kind::Review));
        assert_eq!(outstanding.release(second), Some(Kind::Review));
        assert!(outstanding.issue(Kind::Questions).is_ok());
    }

    #[test]
    fn guard_runs_on_drop_unless_disarmed() {
        use std::cell::Cell;

        let released = Cell::new(0);
        drop(ReleaseOnDrop::new(|| released.set(released.get() + 1)));
        assert_eq!(released.get(), 1);

        ReleaseOnDrop::new(|| released.set(released.get() + 1)).disarm();
        assert_eq!(released.get(), 1);
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonically increasing request sequence shared by one screen's controller.
///
/// Every outstanding operation captures a [`RequestToken`] at issuance; at
/// publish time the operation checks whether it is still the newest issue
/// before mutating shared state, and no-ops otherwise. In-flight work is never
/// aborted, only its result suppressed.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence {
    current: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request generation, superseding all earlier tokens.
    pub fn begin(&self) -> RequestToken {
        let seq = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            seq,
            current: Arc::clone(&self.current),
        }
    }

    /// Revokes every outstanding token without issuing a new request.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

/// Identity of one issued request.
#[derive(Debug)]
pub struct RequestToken {
    seq: u64,
    current: Arc<AtomicU64>,
}

impl RequestToken {
    /// True while no newer request has been issued and nothing invalidated
    /// the sequence since this token was handed out.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.seq
    }

    /// Sequence number captured at issuance.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_is_current() {
        let sequence = RequestSequence::new();
        let token = sequence.begin();
        assert!(token.is_current());
        assert_eq!(token.seq(), 1);
    }

    #[test]
    fn test_newer_token_supersedes_older() {
        let sequence = RequestSequence::new();
        let first = sequence.begin();
        let second = sequence.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_invalidate_revokes_all_outstanding() {
        let sequence = RequestSequence::new();
        let token = sequence.begin();
        sequence.invalidate();
        assert!(!token.is_current());
    }

    #[test]
    fn test_clones_share_one_sequence() {
        let sequence = RequestSequence::new();
        let token = sequence.begin();
        sequence.clone().begin();
        assert!(!token.is_current());
    }
}

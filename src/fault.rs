//! Fault identities for classification.
//!
//! A [`Fault`] is an opaque error identity: a process-wide unique id paired
//! with a human-readable message. Registries match faults by identity, never
//! by message text, so two faults constructed from the same message are
//! distinct errors. Pattern rules are the only place message text is consulted.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque, cheaply clonable error identity with an associated message.
///
/// Equality and hashing use the identity only: a clone compares equal to the
/// fault it was cloned from, while a second `Fault::new` with the same message
/// does not. This is what lets exact-match and mapping rules distinguish
/// independently registered errors that happen to share wording.
#[derive(Clone, Debug)]
pub struct Fault {
    id: u64,
    message: Arc<str>,
}

impl Fault {
    /// Creates a new fault with a fresh identity and the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            message: Arc::from(message.into()),
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Fault {}

impl std::hash::Hash for Fault {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fault_clone_is_same_identity() {
        let fault = Fault::new("disk full");
        let clone = fault.clone();
        assert_eq!(fault, clone);
    }

    #[test]
    fn test_same_message_is_different_identity() {
        let a = Fault::new("disk full");
        let b = Fault::new("disk full");
        assert_ne!(a, b);
        assert_eq!(a.message(), b.message());
    }

    #[test]
    fn test_fault_display() {
        let fault = Fault::new("connection refused");
        assert_eq!(format!("{}", fault), "connection refused");
    }

    #[test]
    fn test_fault_usable_in_set() {
        let a = Fault::new("one");
        let b = Fault::new("two");

        let mut set = HashSet::new();
        set.insert(a.clone());
        set.insert(b);
        set.insert(a.clone());

        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_fault_is_error() {
        let fault = Fault::new("boom");
        let err: Box<dyn std::error::Error> = Box::new(fault);
        assert_eq!(err.to_string(), "boom");
    }
}

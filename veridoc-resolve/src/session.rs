//! Last-call-wins coordination for overlapping resolutions.
//!
//! Concurrent resolutions are not locked against each other; instead each
//! caller takes a ticket from a shared generation counter and compares it
//! at the point of state commit. A stale in-flight resolution can then
//! never overwrite the result of a newer one, and the fallback loop uses
//! the same check to stop early once its work is no longer wanted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use veridoc_core::error::{Result, VeridocError};

/// Hands out resolution tickets; the most recently issued ticket is the
/// only one allowed to commit.
#[derive(Clone, Debug, Default)]
pub struct ResolutionSession {
    current: Arc<AtomicU64>,
}

impl ResolutionSession {
    /// Creates a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new resolution, invalidating every earlier ticket.
    pub fn begin(&self) -> ResolutionTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        ResolutionTicket {
            current: Arc::clone(&self.current),
            generation,
        }
    }
}

/// A handle for one in-flight resolution.
#[derive(Clone, Debug)]
pub struct ResolutionTicket {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl ResolutionTicket {
    /// Returns true while no newer resolution has started.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Gate for committing a finished resolution: passes the value through
    /// only if this ticket is still the latest.
    pub fn commit<T>(&self, value: T) -> Result<T> {
        if self.is_current() {
            Ok(value)
        } else {
            Err(VeridocError::Superseded)
        }
    }
}

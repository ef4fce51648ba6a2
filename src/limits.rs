use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Caps the number of connections served at once.
///
/// Per-IP limits are enforced by tarpc (`max_channels_per_key`); this covers the
/// server-wide total.
#[derive(Clone, Debug)]
pub struct ConnectionLimiter {
    active: Arc<AtomicUsize>,
    max_connections: usize,
}

/// Slot held by an admitted connection. Dropping it frees the slot.
#[derive(Debug)]
pub struct ConnectionPermit {
    active: Arc<AtomicUsize>,
}

impl ConnectionLimiter {
    pub fn new(max_connections: usize) -> Self {
        ConnectionLimiter {
            active: Arc::new(AtomicUsize::new(0)),
            max_connections,
        }
    }

    /// Admit a connection if a slot is free.
    pub fn try_acquire(&self) -> Option<ConnectionPermit> {
        self.active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current < self.max_connections).then_some(current + 1)
            })
            .ok()
            .map(|_| ConnectionPermit {
                active: Arc::clone(&self.active),
            })
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

//! Per-client serialization.
//!
//! Webhook deliveries for the same client can interleave arbitrarily; the
//! conversation row is read-modify-written as a whole, so transitions must
//! be serialized per client. One async mutex per phone number, held across
//! the whole handler, closes that window while leaving distinct clients
//! fully concurrent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A registry of per-client locks, keyed by phone number.
#[derive(Clone, Default)]
pub struct ClientLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ClientLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a phone number, creating it on first use.
    pub async fn acquire(&self, phone: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("locks map poisoned");
            locks
                .entry(phone.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

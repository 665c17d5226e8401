//! In-process goal store.
//!
//! Used by tests and by embedders that keep state elsewhere. Clones share the
//! same slot, so a test can hand one clone to an engine and inspect the other.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::store::GoalStore;
use crate::error::PersistenceError;

#[derive(Debug, Default)]
struct Slot {
    blob: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Slot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut guard) = store.slot.blob.lock() {
            *guard = Some(blob.into());
        }
        store
    }

    /// Make every subsequent save/clear fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.slot.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current contents of the slot.
    pub fn blob(&self) -> Option<String> {
        self.slot.blob.lock().ok().and_then(|guard| guard.clone())
    }

    fn check_writable(&self, make: fn(String) -> PersistenceError) -> Result<(), PersistenceError> {
        if self.slot.fail_writes.load(Ordering::SeqCst) {
            return Err(make("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl GoalStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        let guard = self
            .slot
            .blob
            .lock()
            .map_err(|e| PersistenceError::Read(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, blob: &str) -> Result<(), PersistenceError> {
        self.check_writable(PersistenceError::Write)?;
        let mut guard = self
            .slot
            .blob
            .lock()
            .map_err(|e| PersistenceError::Write(e.to_string()))?;
        *guard = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        self.check_writable(PersistenceError::Delete)?;
        let mut guard = self
            .slot
            .blob
            .lock()
            .map_err(|e| PersistenceError::Delete(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.save("a").unwrap();
        assert_eq!(view.blob().as_deref(), Some("a"));
        view.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn failing_writes_leave_contents() {
        let store = MemoryStore::with_blob("kept");
        store.set_fail_writes(true);
        assert!(matches!(store.save("new"), Err(PersistenceError::Write(_))));
        assert!(matches!(store.clear(), Err(PersistenceError::Delete(_))));
        assert_eq!(store.blob().as_deref(), Some("kept"));
    }
}

use crate::error::PersistenceError;

/// Key-value slot holding the single encoded goal record.
///
/// Implementations store an opaque blob; encoding lives in
/// [`super::record`]. Writes must complete before returning.
pub trait GoalStore {
    /// The stored blob, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored blob.
    fn save(&self, blob: &str) -> Result<(), PersistenceError>;

    /// Remove the record. Removing a missing record is not an error.
    fn clear(&self) -> Result<(), PersistenceError>;
}

impl<T: GoalStore + ?Sized> GoalStore for Box<T> {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> Result<(), PersistenceError> {
        (**self).save(blob)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        (**self).clear()
    }
}

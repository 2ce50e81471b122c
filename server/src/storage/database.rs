//! High-level database interface.
//!
//! Provides a clean API for opening the store and running reads and
//! write transactions against it.

use std::path::Path;
use std::sync::Mutex;

#[cfg(test)]
use super::collection::CollectionName;
use super::collection::Collections;
use super::file::SnapshotFile;
use super::transaction::Transaction;
use super::StoreError;

/// A database instance.
///
/// This is the main entry point for working with the store. It owns the
/// collections and, when durable, the snapshot file they are persisted to.
///
/// # Invariants
///
/// - At most one transaction is open at a time; reads wait for it.
/// - For a durable store, the snapshot on disk equals the in-memory
///   collections after every successful commit.
pub struct Database {
    state: Mutex<Collections>,
    snapshot: Option<SnapshotFile>,
    #[cfg(test)]
    faults: Mutex<Vec<CollectionName>>,
}

impl Database {
    /// Create an empty store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_state(Collections::default(), None)
    }

    /// Open the store persisted in `directory`, creating the directory and
    /// an empty store if needed.
    pub fn open(directory: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(directory)?;
        let file = SnapshotFile::in_directory(directory);
        let state = file.load()?.unwrap_or_default();
        tracing::info!(
            "opened store at {}: {} users, {} classes",
            file.path().display(),
            state.users.len(),
            state.classes.len()
        );
        Ok(Self::with_state(state, Some(file)))
    }

    fn with_state(state: Collections, snapshot: Option<SnapshotFile>) -> Self {
        Self {
            state: Mutex::new(state),
            snapshot,
            #[cfg(test)]
            faults: Mutex::new(Vec::new()),
        }
    }

    /// Run a read against a consistent view of every collection.
    pub fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R, StoreError> {
        let state = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&state))
    }

    /// Run `f` inside a write transaction.
    ///
    /// Commits if `f` returns `Ok`, otherwise rolls back every write `f`
    /// made and returns its error unchanged.
    pub fn transaction<R, E>(
        &self,
        f: impl FnOnce(&mut Transaction<'_>) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let state = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut txn = Transaction::begin(
            state,
            #[cfg(test)]
            &self.faults,
        );
        match f(&mut txn) {
            Ok(value) => {
                txn.commit(self.snapshot.as_ref())?;
                Ok(value)
            }
            Err(e) => {
                txn.abort();
                Err(e)
            }
        }
    }

    /// Make the next write to `collection` fail.
    #[cfg(test)]
    pub fn inject_fault(&self, collection: CollectionName) {
        self.faults
            .lock()
            .expect("fault list lock")
            .push(collection);
    }

    /// Clone the current contents, for assertions.
    #[cfg(test)]
    pub fn dump(&self) -> Collections {
        self.read(Clone::clone).expect("read store")
    }
}

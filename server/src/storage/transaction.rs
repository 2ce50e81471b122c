//! Write transactions.
//!
//! A transaction holds the store's single write lock for its whole
//! lifetime, so transactions are serializable: each one observes every
//! earlier commit and nothing of any concurrent one.
//!
//! Every mutation records how to undo itself. Aborting, failing to
//! persist on commit, or dropping an unfinished transaction replays the
//! undo log in reverse, leaving the collections exactly as they were.

use std::sync::MutexGuard;
#[cfg(test)]
use std::sync::Mutex;

use super::collection::{CollectionName, Collections, Stored};
use super::file::SnapshotFile;
use super::results::{DeleteResult, InsertResult, UpdateResult};
use super::StoreError;
use crate::types::ObjectId;

type UndoStep = Box<dyn FnOnce(&mut Collections)>;

/// An open write transaction.
pub struct Transaction<'a> {
    state: MutexGuard<'a, Collections>,
    undo: Vec<UndoStep>,
    finished: bool,
    #[cfg(test)]
    faults: &'a Mutex<Vec<CollectionName>>,
}

impl<'a> Transaction<'a> {
    pub(super) fn begin(
        state: MutexGuard<'a, Collections>,
        #[cfg(test)] faults: &'a Mutex<Vec<CollectionName>>,
    ) -> Self {
        Self {
            state,
            undo: Vec::new(),
            finished: false,
            #[cfg(test)]
            faults,
        }
    }

    /// Look up a document by id.
    #[must_use]
    pub fn get<T: Stored>(&self, id: ObjectId) -> Option<T> {
        T::collection(&self.state).get(id).cloned()
    }

    pub fn find_one<T: Stored>(&self, filter: impl Fn(&T) -> bool) -> Option<T> {
        T::collection(&self.state).find_one(filter).cloned()
    }

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the id is already taken.
    pub fn insert<T: Stored + 'static>(&mut self, doc: T) -> Result<InsertResult, StoreError> {
        self.check_fault(T::COLLECTION)?;
        let id = doc.id();
        let collection = T::collection_mut(&mut self.state);
        if collection.contains(id) {
            return Err(StoreError::DuplicateId(T::COLLECTION));
        }
        collection.put(doc);
        self.undo.push(Box::new(move |state: &mut Collections| {
            T::collection_mut(state).remove(id);
        }));
        Ok(InsertResult::new(id))
    }

    /// Apply `update` to the document with `id` if it passes `filter`.
    ///
    /// This is the store's conditional write: the filter and the update run
    /// under the same lock, so no other writer can slip in between.
    pub fn update_one<T: Stored + 'static>(
        &mut self,
        id: ObjectId,
        filter: impl FnOnce(&T) -> bool,
        update: impl FnOnce(&mut T),
    ) -> Result<UpdateResult, StoreError> {
        self.check_fault(T::COLLECTION)?;
        let Some(doc) = T::collection_mut(&mut self.state).get_mut(id) else {
            return Ok(UpdateResult::new(false, false));
        };
        if !filter(&*doc) {
            return Ok(UpdateResult::new(false, false));
        }

        let before = doc.clone();
        update(&mut *doc);
        if *doc == before {
            return Ok(UpdateResult::new(true, false));
        }
        self.undo.push(Box::new(move |state: &mut Collections| {
            T::collection_mut(state).put(before);
        }));
        Ok(UpdateResult::new(true, true))
    }

    /// Delete the document with `id` if it passes `filter`.
    pub fn delete_one<T: Stored + 'static>(
        &mut self,
        id: ObjectId,
        filter: impl FnOnce(&T) -> bool,
    ) -> Result<DeleteResult, StoreError> {
        self.check_fault(T::COLLECTION)?;
        let collection = T::collection_mut(&mut self.state);
        if !collection.get(id).is_some_and(filter) {
            return Ok(DeleteResult::new(false));
        }
        let Some(removed) = collection.remove(id) else {
            return Ok(DeleteResult::new(false));
        };
        self.undo.push(Box::new(move |state: &mut Collections| {
            T::collection_mut(state).put(removed);
        }));
        Ok(DeleteResult::new(true))
    }

    /// Whether any write has been applied.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Commit the transaction, persisting to `snapshot` when the store is
    /// durable.
    ///
    /// If the snapshot cannot be written the transaction is rolled back and
    /// the error returned; memory and disk never disagree.
    pub(super) fn commit(mut self, snapshot: Option<&SnapshotFile>) -> Result<(), StoreError> {
        if let Some(file) = snapshot
            && self.is_dirty()
            && let Err(e) = file.write(&self.state)
        {
            tracing::error!("failed to persist snapshot, rolling back: {e}");
            self.rollback();
            self.finished = true;
            return Err(e);
        }
        self.undo.clear();
        self.finished = true;
        Ok(())
    }

    /// Abort the transaction, undoing every write.
    pub fn abort(mut self) {
        self.rollback();
        self.finished = true;
    }

    fn rollback(&mut self) {
        while let Some(step) = self.undo.pop() {
            step(&mut *self.state);
        }
    }

    #[cfg(test)]
    fn check_fault(&self, collection: CollectionName) -> Result<(), StoreError> {
        let mut faults = self.faults.lock().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(pos) = faults.iter().position(|armed| *armed == collection) {
            faults.remove(pos);
            return Err(StoreError::InjectedFault(collection));
        }
        Ok(())
    }

    #[cfg(not(test))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    const fn check_fault(&self, _collection: CollectionName) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("transaction dropped without commit, rolling back");
            self.rollback();
        }
    }
}

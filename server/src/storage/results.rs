//! Write acknowledgements returned to HTTP clients.
//!
//! The shapes mirror what document-store drivers report, so existing web
//! clients can keep checking `insertedId`, `modifiedCount` and
//! `deletedCount`.

use serde::Serialize;

use crate::types::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: ObjectId,
}

impl InsertResult {
    #[must_use]
    pub const fn new(inserted_id: ObjectId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    #[must_use]
    pub fn new(matched: bool, modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: u64::from(matched),
            modified_count: u64::from(modified),
        }
    }

    #[must_use]
    pub const fn matched(&self) -> bool {
        self.matched_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    #[must_use]
    pub fn new(deleted: bool) -> Self {
        Self {
            acknowledged: true,
            deleted_count: u64::from(deleted),
        }
    }
}

//! Embedded document store.
//!
//! Holds the five collections the server works with (users, classes,
//! selected classes, payments, enrollments) in memory behind one lock, and
//! optionally persists them to a checksummed snapshot file.
//!
//! # Usage
//!
//! ```ignore
//! let db = Database::open(Path::new("./data"))?;
//!
//! // Reads see a consistent view of every collection.
//! let approved = db.read(|c| c.classes.find(|class| class.status == ClassStatus::Approved))?;
//!
//! // Writes run in a transaction that commits on Ok and rolls back on Err.
//! db.transaction(|txn| {
//!     txn.insert(user)?;
//!     Ok::<_, StoreError>(())
//! })?;
//! ```

mod collection;
mod database;
mod error;
mod file;
mod results;
mod transaction;

pub use collection::{CollectionName, Collections, Stored};
pub use database::Database;
pub use error::StoreError;
pub use results::{DeleteResult, InsertResult, UpdateResult};
pub use transaction::Transaction;

//! Errors produced by the document store.

use std::path::PathBuf;

use super::CollectionName;

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// File I/O error while reading or writing the snapshot.
    Io(std::io::Error),
    /// The snapshot file failed validation.
    Corrupt { path: PathBuf, reason: String },
    /// A document could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// A document with the same id already exists.
    DuplicateId(CollectionName),
    /// A thread panicked while holding the store lock.
    LockPoisoned,
    /// A failure armed through `Database::inject_fault`.
    #[cfg(test)]
    InjectedFault(CollectionName),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Corrupt { path, reason } => {
                write!(f, "corrupt snapshot {}: {reason}", path.display())
            }
            Self::Serialization(e) => write!(f, "serialization error: {e}"),
            Self::DuplicateId(collection) => {
                write!(f, "duplicate id in collection {}", collection.as_str())
            }
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            #[cfg(test)]
            Self::InjectedFault(collection) => {
                write!(f, "injected fault on collection {}", collection.as_str())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

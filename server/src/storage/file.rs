//! Snapshot file I/O.
//!
//! A durable store keeps a single snapshot file holding every collection.
//!
//! # Format
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 8 | magic `DANCEDB1` |
//! | 8 | 4 | format version, little-endian |
//! | 12 | 4 | CRC32 of the payload, little-endian |
//! | 16 | 8 | payload length, little-endian |
//! | 24 | n | JSON-encoded [`Collections`] |
//!
//! # Invariants
//!
//! - The file on disk is always a complete snapshot: writes go to a
//!   sibling temp file, are fsynced, then renamed over the old one.
//! - A snapshot whose checksum or length does not match is never loaded.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Collections, StoreError};

/// Magic number identifying a snapshot file.
pub const MAGIC: [u8; 8] = *b"DANCEDB1";

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE_NAME: &str = "booking.db";

const HEADER_LEN: usize = 24;

/// Handle to the snapshot file in a data directory.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Create a handle for `{directory}/booking.db`.
    #[must_use]
    pub fn in_directory(directory: &Path) -> Self {
        Self {
            path: directory.join(SNAPSHOT_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or `None` if no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<Collections>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        self.decode(&bytes).map(Some)
    }

    /// Atomically replace the snapshot with `collections`.
    pub fn write(&self, collections: &Collections) -> Result<(), StoreError> {
        let bytes = encode(collections)?;
        let tmp_path = self.path.with_extension("db.tmp");

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        // Persist the rename itself.
        #[cfg(unix)]
        if let Some(parent) = self.path.parent() {
            fs::File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Collections, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        };

        if bytes.len() < HEADER_LEN {
            return Err(corrupt(format!("file is {} bytes, shorter than header", bytes.len())));
        }
        if bytes[0..8] != MAGIC {
            return Err(corrupt("bad magic number".to_string()));
        }
        let version = read_u32(&bytes[8..12]);
        if version != FORMAT_VERSION {
            return Err(corrupt(format!("unsupported format version {version}")));
        }
        let checksum = read_u32(&bytes[12..16]);
        let payload_len = read_u64(&bytes[16..24]);
        let payload = &bytes[HEADER_LEN..];
        if u64::try_from(payload.len()).ok() != Some(payload_len) {
            return Err(corrupt(format!(
                "payload is {} bytes, header says {payload_len}",
                payload.len()
            )));
        }
        let computed = crc32fast::hash(payload);
        if computed != checksum {
            return Err(corrupt(format!(
                "checksum mismatch: stored {checksum:#010x}, computed {computed:#010x}"
            )));
        }

        Ok(serde_json::from_slice(payload)?)
    }
}

fn encode(collections: &Collections) -> Result<Vec<u8>, StoreError> {
    let payload = serde_json::to_vec(collections)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

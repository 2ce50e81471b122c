//! Document identifiers.
//!
//! Every stored document is keyed by an [`ObjectId`]: 12 bytes rendered as
//! 24 lowercase hex characters, laid out the way document stores usually
//! do it so existing clients can keep treating ids as opaque strings.
//!
//! # Layout
//!
//! - bytes 0..4: seconds since the Unix epoch, big-endian
//! - bytes 4..9: random per-process value
//! - bytes 9..12: per-process counter, big-endian
//!
//! # Invariants
//!
//! - Ids generated by one process are strictly increasing (until the
//!   3-byte counter wraps within a single second).
//! - The textual form is always exactly 24 lowercase hex characters.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of raw bytes in an id.
const ID_LEN: usize = 12;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Generate a fresh id.
    #[must_use]
    // Seconds since the epoch fit in u32 until 2106.
    #[allow(clippy::cast_possible_truncation)]
    pub fn generate() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let process = PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Build an id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying byte array.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Parse the 24-character hex form.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectIdError`] if the input is not exactly 24 hex digits.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != ID_LEN * 2 {
            return Err(ObjectIdError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; ID_LEN];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_value(chunk[0]).ok_or(ObjectIdError::InvalidCharacter)?;
            let lo = hex_value(chunk[1]).ok_or(ObjectIdError::InvalidCharacter)?;
            bytes[i] = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

const fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an [`ObjectId`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The input was not 24 characters long.
    InvalidLength(usize),
    /// The input contained a non-hex character.
    InvalidCharacter,
}

impl fmt::Display for ObjectIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "object id must be 24 hex characters, got {len}")
            }
            Self::InvalidCharacter => write!(f, "object id contains a non-hex character"),
        }
    }
}

impl std::error::Error for ObjectIdError {}

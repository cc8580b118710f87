use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters a generated id may contain. Every one is URL-safe.
pub const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of ids produced by [`ShortIdGenerator`].
pub const SHORT_ID_LEN: usize = 10;

/// Identifier of a stored record.
///
/// Ids are opaque strings. Records loaded from disk keep whatever id they
/// were persisted with; freshly created records get one from an
/// [`IdGenerator`]. The empty id is the placeholder for a record that has
/// not been given one yet.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every character is drawn from [`ID_ALPHABET`].
    pub fn is_url_safe(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| ID_ALPHABET.contains(&b))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Source of fresh record ids, invoked once per created record.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> RecordId;
}

/// Random short ids: [`SHORT_ID_LEN`] characters from [`ID_ALPHABET`].
///
/// 64^10 possible values keeps collisions negligible for the dataset sizes
/// this service handles.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortIdGenerator;

impl IdGenerator for ShortIdGenerator {
    fn generate(&self) -> RecordId {
        let mut rng = rand::thread_rng();
        let id: String = (0..SHORT_ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        RecordId(id)
    }
}

/// Deterministic ids `{prefix}-1`, `{prefix}-2`, ... for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> RecordId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId(format!("{}-{n}", self.prefix))
    }
}

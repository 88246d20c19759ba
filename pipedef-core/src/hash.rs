//! Content hashing
//!
//! Every element of an unordered collection is keyed by a [`SetId`]: the
//! IEEE CRC-32 of the element's canonical tokens, concatenated in a fixed
//! per-kind order. Hashing is a pure function of the tokens, so identities
//! are stable across runs, processes and machines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-derived identity of a set element
///
/// Two elements with the same identity are considered the same element.
/// Collisions are accepted as equality, never reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(u32);

impl SetId {
    /// Wrap a raw identity value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw identity value
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SetId> for u32 {
    fn from(id: SetId) -> Self {
        id.0
    }
}

/// Hash a single string
pub fn string_hashcode(s: &str) -> SetId {
    SetId(crc32fast::hash(s.as_bytes()))
}

/// Hash an ordered token stream
///
/// Tokens are concatenated without separators, so the result equals
/// [`string_hashcode`] of the joined string. Missing optional values must be
/// passed as empty strings.
pub fn hash_tokens<I, S>(tokens: I) -> SetId
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = crc32fast::Hasher::new();
    for token in tokens {
        hasher.update(token.as_ref().as_bytes());
    }
    SetId(hasher.finalize())
}

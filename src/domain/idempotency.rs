//! Idempotency keys for repeatable batch issuance.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyParseError;

/// Minimum accepted key length in hex characters.
pub const MIN_KEY_LEN: usize = 8;

/// Maximum accepted key length in hex characters.
pub const MAX_KEY_LEN: usize = 16;

/// A caller-supplied key that seeds deterministic batch generation.
///
/// Repeating a request with the same key (and batch size) regenerates the
/// same DevEUI set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyKey {
    raw: String,
    seed: u64,
}

impl IdempotencyKey {
    /// Seed derived from the key's hex value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The key as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for IdempotencyKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&s.len()) {
            return Err(KeyParseError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(KeyParseError::InvalidHex(s.to_string()));
        }

        let seed =
            u64::from_str_radix(s, 16).map_err(|_| KeyParseError::InvalidHex(s.to_string()))?;

        Ok(Self {
            raw: s.to_string(),
            seed,
        })
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

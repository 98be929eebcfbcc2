//! Document identifiers.
//!
//! Caller-supplied identifiers are restricted to `[A-Za-z0-9_-]+` so that the
//! file name derived from them can never leave the data directory. Upload
//! identifiers are generated from 8 random bytes, hex encoded.

use crate::domain::errors::IdentifierError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on identifier length.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Number of random bytes in a generated identifier.
pub const GENERATED_ID_BYTES: usize = 8;

/// A path-safe token naming one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Validate a caller-supplied identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let len = raw.chars().count();
        if len > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong {
                len,
                max: MAX_IDENTIFIER_LEN,
            });
        }
        if let Some(ch) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(IdentifierError::InvalidCharacter { ch });
        }
        Ok(Self(raw))
    }

    /// Generate a fresh identifier from the OS-seeded thread RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; GENERATED_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

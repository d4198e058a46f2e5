//! Content checksums that address uploaded sandbox files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Shortest accepted checksum (an MD5 digest truncated to 64 bits).
pub const MIN_CHECKSUM_LEN: usize = 16;

/// Longest accepted checksum (a SHA-512 digest).
pub const MAX_CHECKSUM_LEN: usize = 128;

/// A hex-encoded content checksum.
///
/// Clients compute checksums themselves (usually MD5) and upload the file
/// body to the sandbox under that name, so the server never recomputes it.
/// Parsing lowercases the value and rejects anything that is not plain hex,
/// which keeps checksums safe to embed in URLs and storage keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum(String);

impl Checksum {
    /// Parse and normalise a checksum string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.len() < MIN_CHECKSUM_LEN || s.len() > MAX_CHECKSUM_LEN {
            return Err(crate::Error::InvalidChecksum(format!(
                "expected {MIN_CHECKSUM_LEN}-{MAX_CHECKSUM_LEN} hex chars, got {}",
                s.len()
            )));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(crate::Error::InvalidChecksum(format!(
                "invalid character {c:?} in {s}"
            )));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Get the normalised hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key for the blob body, sharded on the first two hex digits.
    pub fn blob_key(&self) -> String {
        format!("sandbox/{}/{}", &self.0[..2], self.0)
    }
}

impl FromStr for Checksum {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.0)
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

//! # Content Digest — Commitments over Canonical Bytes
//!
//! Defines `ContentDigest` and `DigestAlgorithm`. Dispute reasons and
//! resolution actions are committed to as content digests.
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes`. This is
//! enforced by the signature of `sha256_digest()`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::HexError;
use crate::identity::{decode_hex, encode_hex};

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content-addressed digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] for computing digests.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Parse `sha256:<64 hex>` or bare `<64 hex>`.
    ///
    /// # Errors
    ///
    /// Returns [`HexError`] on wrong length or non-hex characters.
    pub fn parse(s: &str) -> Result<Self, HexError> {
        let hex = s.strip_prefix("sha256:").unwrap_or(s);
        Ok(Self::new(DigestAlgorithm::Sha256, decode_hex::<32>(hex)?))
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.bytes)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Canonicalize a value and digest it in one step.
///
/// # Errors
///
/// Propagates [`CanonicalizationError`](crate::error::CanonicalizationError).
pub fn digest_of(
    value: &impl Serialize,
) -> Result<ContentDigest, crate::error::CanonicalizationError> {
    Ok(sha256_digest(&CanonicalBytes::new(value)?))
}

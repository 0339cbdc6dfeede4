//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier the stack passes around. These
//! prevent accidental identifier confusion: you cannot pass a
//! [`DisputeId`] where an [`Address`] is expected, and you cannot invoke a
//! state-changing operation without an explicit [`Caller`].
//!
//! ## Security Invariant
//!
//! No operation infers who is calling it. The boundary layer authenticates
//! the request and hands the core a [`Caller`]; every role check compares
//! that value against stored identities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HexError;

/// Number of bytes in an [`Address`].
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account or component identity.
///
/// Rendered and parsed as `0x` followed by 40 lowercase hex digits.
/// [`Address::ZERO`] is the null identity and is never a valid owner,
/// defendant, or payee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Build an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed hex address.
    ///
    /// # Errors
    ///
    /// Returns [`HexError`] if the prefix is missing, the length is not
    /// 40 hex digits, or a non-hex character is present.
    pub fn parse(s: &str) -> Result<Self, HexError> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| HexError::MissingPrefix(s.to_string()))?;
        Ok(Self(decode_hex::<ADDRESS_LEN>(hex)?))
    }

    /// Raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Render as `0x` + lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", encode_hex(&self.0))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The authenticated identity invoking an operation.
///
/// Constructed by the boundary layer (request authentication, signature
/// verification, or the delegating registry) and threaded explicitly
/// through every state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller(Address);

impl Caller {
    /// Wrap an identity the boundary layer has already authenticated.
    pub fn authenticated(address: Address) -> Self {
        Self(address)
    }

    /// The caller's address.
    pub fn address(&self) -> Address {
        self.0
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a dispute within one registry.
///
/// Assigned sequentially from 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisputeId(u64);

impl DisputeId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

/// Lowercase hex encoding.
pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode exactly `N` bytes from `2 * N` hex digits (no prefix).
pub(crate) fn decode_hex<const N: usize>(hex: &str) -> Result<[u8; N], HexError> {
    let digits = hex.chars().count();
    if digits != N * 2 {
        return Err(HexError::InvalidLength {
            expected: N * 2,
            actual: digits,
        });
    }
    let mut out = [0u8; N];
    let raw = hex.as_bytes();
    for (i, byte) in out.iter_mut().enumerate() {
        let hi = hex_value(raw[2 * i])?;
        let lo = hex_value(raw[2 * i + 1])?;
        *byte = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_value(c: u8) -> Result<u8, HexError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        other => Err(HexError::InvalidHex(other as char)),
    }
}

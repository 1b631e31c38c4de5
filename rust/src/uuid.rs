//! The UUID value and the errors shared by every operation on it.
//!
//! Layout: 16 bytes in network order as in RFC4122. The version lives in the
//! high nibble of byte 6, the variant in the high bits of byte 8.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur during UUID operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UuidError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("Invalid name: must not be empty")]
    InvalidName,
    #[error("Invalid UUID string: {0}")]
    ParseError(String),
    #[error("Buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall { required: usize, available: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid format name: {0}")]
    InvalidFormat(String),
}

/// Generation algorithm recorded in the version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// The all-zero UUID.
    Nil,
    /// Version 4, random.
    Random,
    /// Version 5, SHA-1 name based.
    Sha1,
}

impl Version {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::Random => 4,
            Self::Sha1 => 5,
        }
    }
}

/// Layout family recorded in the variant field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `0xx`, reserved for NCS backward compatibility.
    Ncs,
    /// `10x`, the RFC4122 layout.
    Rfc4122,
    /// `110`, reserved for Microsoft GUIDs.
    Microsoft,
    /// `111`, reserved for future definition.
    Future,
}

/// A 128-bit universally unique identifier.
///
/// Values are plain `Copy` data: once built by a generator or the parser they
/// never change, so they can be shared across threads freely.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Uuid([u8; 16]);

impl Uuid {
    /// Build a UUID from raw bytes, without touching version or variant.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Build a UUID from a big-endian 128-bit integer.
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn into_bytes(self) -> [u8; 16] {
        self.0
    }

    pub const fn as_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// True iff all 128 bits are zero.
    pub const fn is_nil(&self) -> bool {
        self.as_u128() == 0
    }

    /// Raw value of the version nibble.
    pub const fn version_num(&self) -> u8 {
        self.0[6] >> 4
    }

    /// Version of this UUID, if it is one this crate generates.
    ///
    /// Parsed values may carry any bit pattern, so this returns `None` for
    /// versions other than nil, 4 and 5.
    pub fn get_version(&self) -> Option<Version> {
        if self.is_nil() {
            return Some(Version::Nil);
        }
        match self.version_num() {
            4 => Some(Version::Random),
            5 => Some(Version::Sha1),
            _ => None,
        }
    }

    pub fn get_variant(&self) -> Variant {
        match self.0[8] {
            b if b & 0x80 == 0x00 => Variant::Ncs,
            b if b & 0xc0 == 0x80 => Variant::Rfc4122,
            b if b & 0xe0 == 0xc0 => Variant::Microsoft,
            _ => Variant::Future,
        }
    }

    /// Stamp a version and the RFC4122 variant over raw bytes.
    ///
    /// `Version::Nil` has no version field; it yields the nil UUID.
    pub(crate) fn stamped(mut bytes: [u8; 16], version: Version) -> Self {
        if version == Version::Nil {
            return Self::nil();
        }
        bytes[6] = (bytes[6] & 0x0f) | (version.as_u8() << 4);
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({})", self)
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(uuid: Uuid) -> Self {
        uuid.into_bytes()
    }
}

impl Serialize for Uuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UuidVisitor;

        impl Visitor<'_> for UuidVisitor {
            type Value = Uuid;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a UUID string in simple, hyphenated, urn or braced form")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Uuid, E> {
                Uuid::parse_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(UuidVisitor)
    }
}

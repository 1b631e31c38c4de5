//! ruuid: RFC4122 UUIDs for SIP session identifiers.
//!
//! Generates nil, random (version 4) and SHA-1 name based (version 5) UUIDs,
//! parses them strictly and renders them in four canonical styles.
//!
//! # Format
//!
//! ```text
//! UUID       ::= 8HEX "-" 4HEX "-" 4HEX "-" 4HEX "-" 12HEX
//! SIMPLE     ::= 32HEX
//! URN        ::= "urn:uuid:" UUID
//! BRACED     ::= "{" UUID "}"
//! ```
//!
//! # Example
//!
//! ```
//! use ruuid::{Format, Uuid, FORMATTING_MAX_LENGTH};
//!
//! let uuid = Uuid::new_v5_sip(b"a84b4c76e66710@pc33.atlanta.com1928301774").expect("non-empty name");
//! let mut buf = [0u8; FORMATTING_MAX_LENGTH];
//! let len = uuid.format_into(Format::Urn, &mut buf).expect("buffer fits every style");
//! assert_eq!(len, 45);
//! assert_eq!(uuid, Uuid::parse_str(std::str::from_utf8(&buf[..len]).unwrap()).unwrap());
//! ```

mod ffi;
mod format;
mod generate;
mod parse;
mod sip;
mod uuid;

pub use ffi::{
    ruuid_destroy, ruuid_generate_nil, ruuid_generate_version_4, ruuid_generate_version_5_sip,
    ruuid_get_braced, ruuid_get_hyphenated, ruuid_get_simple, ruuid_get_urn, ruuid_is_nil,
    ruuid_parse,
};
pub use format::{FORMATTING_MAX_LENGTH, Format};
pub use generate::{
    EntropySource, NAMESPACE_DNS, NAMESPACE_OID, NAMESPACE_SIP, NAMESPACE_URL, NAMESPACE_X500,
    OsEntropy,
};
pub use parse::{ParsedUuid, parse_uuid, validate_uuid};
pub use sip::{HeaderTag, SessionMessage, UuidKind, UuidSelector, is_nil_uuid, session_name};
pub use uuid::{Uuid, UuidError, Variant, Version};

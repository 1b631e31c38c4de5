//! Strict parsing of UUID text.
//!
//! Accepted shapes (hex digits in any case):
//!
//! ```text
//! simple      32 hex digits
//! hyphenated  8-4-4-4-12 hex digits
//! urn         "urn:uuid:" hyphenated
//! braced      "{" hyphenated "}"
//! ```
//!
//! Version and variant bits are not checked; any bit pattern with a valid
//! layout parses.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::format::Format;
use crate::uuid::{Uuid, UuidError};

const URN_PREFIX: &str = "urn:uuid:";

static SIMPLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").unwrap());

static HYPHENATED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([0-9a-fA-F]{8})-([0-9a-fA-F]{4})-([0-9a-fA-F]{4})-([0-9a-fA-F]{4})-([0-9a-fA-F]{12})$",
    )
    .unwrap()
});

/// A parsed UUID together with the style it was written in.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUuid {
    pub raw: String,
    pub uuid: Uuid,
    pub format: Format,
}

fn reject(text: &str) -> UuidError {
    debug!(input = text, "rejected uuid text");
    UuidError::ParseError(text.to_string())
}

/// Split off the urn prefix or braces and guess the style of what remains.
fn unwrap_shape(text: &str) -> Result<(&str, Format), UuidError> {
    if let Some(rest) = text.strip_prefix(URN_PREFIX) {
        return Ok((rest, Format::Urn));
    }
    if let Some(rest) = text.strip_prefix('{') {
        let inner = rest.strip_suffix('}').ok_or_else(|| reject(text))?;
        return Ok((inner, Format::Braced));
    }
    if text.len() == Format::Simple.encoded_len() {
        return Ok((text, Format::Simple));
    }
    Ok((text, Format::Hyphenated))
}

/// Parse UUID text, reporting which style it used.
pub fn parse_uuid(text: &str) -> Result<ParsedUuid, UuidError> {
    let (body, format) = unwrap_shape(text)?;

    let mut digits = [0u8; 32];
    if format == Format::Simple {
        if !SIMPLE_PATTERN.is_match(body) {
            return Err(reject(text));
        }
        digits.copy_from_slice(body.as_bytes());
    } else {
        let caps = HYPHENATED_PATTERN
            .captures(body)
            .ok_or_else(|| reject(text))?;
        let mut pos = 0;
        for group in caps.iter().skip(1).flatten() {
            let group = group.as_str().as_bytes();
            digits[pos..pos + group.len()].copy_from_slice(group);
            pos += group.len();
        }
    }

    let mut bytes = [0u8; 16];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| reject(text))?;

    Ok(ParsedUuid {
        raw: text.to_string(),
        uuid: Uuid::from_bytes(bytes),
        format,
    })
}

/// Check whether `text` is a UUID in any accepted style.
pub fn validate_uuid(text: &str) -> bool {
    parse_uuid(text).is_ok()
}

impl Uuid {
    /// Parse UUID text in any accepted style.
    pub fn parse_str(text: &str) -> Result<Self, UuidError> {
        parse_uuid(text).map(|parsed| parsed.uuid)
    }
}

impl FromStr for Uuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl TryFrom<&str> for Uuid {
    type Error = UuidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: u128 = 0x550e8400_e29b_41d4_a716_446655440000;

    #[test]
    fn test_parse_each_shape() {
        let cases = [
            ("550e8400e29b41d4a716446655440000", Format::Simple),
            ("550e8400-e29b-41d4-a716-446655440000", Format::Hyphenated),
            ("urn:uuid:550e8400-e29b-41d4-a716-446655440000", Format::Urn),
            ("{550e8400-e29b-41d4-a716-446655440000}", Format::Braced),
            ("550E8400-E29B-41D4-A716-446655440000", Format::Hyphenated),
            ("{550e8400-E29B-41d4-A716-446655440000}", Format::Braced),
        ];
        for (text, format) in cases {
            let parsed = parse_uuid(text).unwrap();
            assert_eq!(parsed.uuid, Uuid::from_u128(SAMPLE), "{}", text);
            assert_eq!(parsed.format, format, "{}", text);
            assert_eq!(parsed.raw, text);
        }
    }

    #[test]
    fn test_hyphenated_groups_keep_their_order() {
        let parsed = parse_uuid("01234567-89ab-cdef-0123-456789abcdef").unwrap();
        assert_eq!(parsed.uuid, Uuid::from_u128(0x01234567_89ab_cdef_0123_456789abcdef));
        assert_eq!(
            parsed.uuid,
            parse_uuid("0123456789abcdef0123456789abcdef").unwrap().uuid
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        let u: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(!u.is_nil());
        assert_eq!(u.encode(Format::Simple), "550e8400e29b41d4a716446655440000");
        assert_eq!(
            u.encode(Format::Urn),
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let bad = [
            "",
            "not-a-uuid",
            "550e8400-e29b-41d4-a716-44665544000",
            "550e8400-e29b-41d4-a716-4466554400000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a7164466554400000",
            "550e8400-e29b-41d4-a716446655440000",
            "550e840-0e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-44665544000g",
            "550e8400e29b41d4a71644665544000g",
            "{550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440000}",
            "{{550e8400-e29b-41d4-a716-446655440000}}",
            "{550e8400e29b41d4a716446655440000}",
            "urn:uuid:550e8400e29b41d4a716446655440000",
            "URN:UUID:550e8400-e29b-41d4-a716-446655440000",
            "urn:uuid:{550e8400-e29b-41d4-a716-446655440000}",
            "uuid:550e8400-e29b-41d4-a716-446655440000",
            " 550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440000\n",
            "550e8400_e29b_41d4_a716_446655440000",
            "éééééééééééééééé",
        ];
        for text in bad {
            assert!(
                matches!(parse_uuid(text), Err(UuidError::ParseError(ref s)) if s == text),
                "accepted {:?}",
                text
            );
            assert!(!validate_uuid(text));
        }
    }

    #[test]
    fn test_parse_ignores_version_and_variant() {
        let u = Uuid::parse_str("ffffffff-ffff-ffff-ffff-ffffffffffff").unwrap();
        assert_eq!(u.version_num(), 15);
        assert_eq!(u.get_version(), None);

        let nil = Uuid::parse_str("00000000000000000000000000000000").unwrap();
        assert!(nil.is_nil());

        assert!(Uuid::try_from("a58587da-c93d-11e2-ae90-f4ea67801e29").is_ok());
    }

    #[test]
    fn test_round_trip_generated() {
        for _ in 0..50 {
            let v4 = Uuid::new_v4().unwrap();
            for format in Format::ALL {
                let parsed = parse_uuid(&v4.encode(format)).unwrap();
                assert_eq!(parsed.uuid, v4);
                assert_eq!(parsed.format, format);
            }
        }

        let mut buf = [0u8; crate::FORMATTING_MAX_LENGTH];
        let v5 = Uuid::new_v5_sip(b"abc123tagXYZ").unwrap();
        for format in Format::ALL {
            let n = v5.format_into(format, &mut buf).unwrap();
            let text = std::str::from_utf8(&buf[..n]).unwrap();
            assert_eq!(Uuid::parse_str(text).unwrap(), v5);
        }
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(s in "\\PC*") {
            let _ = parse_uuid(&s);
        }

        #[test]
        fn prop_any_bits_survive_every_style(bytes in any::<[u8; 16]>()) {
            let u = Uuid::from_bytes(bytes);
            for format in Format::ALL {
                prop_assert_eq!(Uuid::parse_str(&u.encode(format)).unwrap(), u);
            }
        }

        #[test]
        fn prop_corrupted_hyphenated_rejected(
            bytes in any::<[u8; 16]>(),
            idx in 0usize..36,
            c in "[g-zG-Z_ :{}]",
        ) {
            let mut text = Uuid::from_bytes(bytes).encode(Format::Hyphenated);
            text.replace_range(idx..idx + 1, &c);
            prop_assert!(parse_uuid(&text).is_err());
        }
    }
}

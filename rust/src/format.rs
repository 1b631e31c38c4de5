//! Canonical text renderings of a UUID.
//!
//! All styles render lowercase hex:
//!
//! ```text
//! Simple      550e8400e29b41d4a716446655440000
//! Hyphenated  550e8400-e29b-41d4-a716-446655440000
//! Urn         urn:uuid:550e8400-e29b-41d4-a716-446655440000
//! Braced      {550e8400-e29b-41d4-a716-446655440000}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::uuid::{Uuid, UuidError};

/// Longest rendering (urn, 45 bytes) plus the NUL terminator.
pub const FORMATTING_MAX_LENGTH: usize = 46;

const MAX_TEXT_LENGTH: usize = FORMATTING_MAX_LENGTH - 1;
const URN_PREFIX: &str = "urn:uuid:";
/// Byte ranges of the 8-4-4-4-12 groups.
const GROUPS: [(usize, usize); 5] = [(0, 4), (4, 6), (6, 8), (8, 10), (10, 16)];

/// Text style for a rendered UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Simple,
    #[default]
    Hyphenated,
    Urn,
    Braced,
}

impl Format {
    pub const ALL: [Format; 4] = [Self::Simple, Self::Hyphenated, Self::Urn, Self::Braced];

    /// Rendered length in bytes, without terminator.
    pub const fn encoded_len(self) -> usize {
        match self {
            Self::Simple => 32,
            Self::Hyphenated => 36,
            Self::Urn => 45,
            Self::Braced => 38,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Hyphenated => "hyphenated",
            Self::Urn => "urn",
            Self::Braced => "braced",
        }
    }

    /// Parse a style name, or its initial letter, in any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "s" => Some(Self::Simple),
            "hyphenated" | "h" => Some(Self::Hyphenated),
            "urn" | "u" => Some(Self::Urn),
            "braced" | "b" => Some(Self::Braced),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UuidError::InvalidFormat(s.to_string()))
    }
}

fn write_group(src: &[u8], dst: &mut [u8]) -> Result<(), UuidError> {
    hex::encode_to_slice(src, dst).map_err(|e| UuidError::InvalidInput(e.to_string()))
}

/// Render into a stack array, returning it with the used length.
fn render(uuid: &Uuid, format: Format) -> Result<([u8; MAX_TEXT_LENGTH], usize), UuidError> {
    let bytes = uuid.as_bytes();
    let mut out = [0u8; MAX_TEXT_LENGTH];
    let mut pos = 0;

    match format {
        Format::Simple => {
            write_group(bytes, &mut out[..32])?;
            return Ok((out, 32));
        }
        Format::Urn => {
            out[..URN_PREFIX.len()].copy_from_slice(URN_PREFIX.as_bytes());
            pos = URN_PREFIX.len();
        }
        Format::Braced => {
            out[0] = b'{';
            pos = 1;
        }
        Format::Hyphenated => {}
    }

    for (i, &(start, end)) in GROUPS.iter().enumerate() {
        if i > 0 {
            out[pos] = b'-';
            pos += 1;
        }
        let width = (end - start) * 2;
        write_group(&bytes[start..end], &mut out[pos..pos + width])?;
        pos += width;
    }

    if format == Format::Braced {
        out[pos] = b'}';
        pos += 1;
    }

    Ok((out, pos))
}

impl Uuid {
    /// Write the rendering plus a NUL terminator into `buffer`.
    ///
    /// Returns the number of text bytes written, terminator excluded. If the
    /// buffer cannot hold text and terminator, nothing is written.
    pub fn format_into(&self, format: Format, buffer: &mut [u8]) -> Result<usize, UuidError> {
        let required = format.encoded_len() + 1;
        if buffer.len() < required {
            return Err(UuidError::BufferTooSmall {
                required,
                available: buffer.len(),
            });
        }

        let (text, len) = render(self, format)?;
        buffer[..len].copy_from_slice(&text[..len]);
        buffer[len] = 0;
        Ok(len)
    }

    /// Render as an owned string.
    pub fn encode(&self, format: Format) -> String {
        let bytes = self.as_bytes();
        if format == Format::Simple {
            return hex::encode(bytes);
        }

        let groups: Vec<String> = GROUPS
            .iter()
            .map(|&(start, end)| hex::encode(&bytes[start..end]))
            .collect();
        let hyphenated = groups.join("-");
        match format {
            Format::Urn => format!("{}{}", URN_PREFIX, hyphenated),
            Format::Braced => format!("{{{}}}", hyphenated),
            _ => hyphenated,
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, len) = render(self, Format::Hyphenated).map_err(|_| fmt::Error)?;
        let s = std::str::from_utf8(&text[..len]).map_err(|_| fmt::Error)?;
        f.pad(s)
    }
}

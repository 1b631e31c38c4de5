//! SIP session identifiers on top of the UUID core.
//!
//! A proxy configures a UUID by kind (nil, v4, SIP v5) and a short selector
//! name such as `s`, `hf` or `ut`: the first letter picks the text style, an
//! optional second letter picks whether the From or To tag completes the
//! version 5 name. The name itself is the Call-ID followed by that tag.
//!
//! Header extraction stays with the host; it hands over a [`SessionMessage`]
//! holding the values it already parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::format::{FORMATTING_MAX_LENGTH, Format};
use crate::uuid::{Uuid, UuidError};

/// Which generator a selector calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UuidKind {
    Nil,
    V4,
    V5Sip,
}

impl UuidKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::V4 => "v4",
            Self::V5Sip => "v5_sip",
        }
    }

    /// Accepts the short names and the pseudo-variable names
    /// (`uuid_nil`, `uuid4`, `uuid5_sip`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nil" | "uuid_nil" => Some(Self::Nil),
            "v4" | "4" | "uuid4" => Some(Self::V4),
            "v5" | "5" | "v5_sip" | "uuid5_sip" => Some(Self::V5Sip),
            _ => None,
        }
    }
}

impl fmt::Display for UuidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UuidKind {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UuidError::InvalidFormat(s.to_string()))
    }
}

/// Header whose tag completes a version 5 session name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderTag {
    From,
    #[default]
    To,
}

impl fmt::Display for HeaderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From => f.write_str("From"),
            Self::To => f.write_str("To"),
        }
    }
}

/// Header values of one SIP message, as extracted by the host.
///
/// A tag of `None` means the header itself is absent; a header without a tag
/// parameter is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMessage {
    pub call_id: String,
    pub from_tag: Option<String>,
    pub to_tag: Option<String>,
}

impl SessionMessage {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            ..Default::default()
        }
    }

    pub fn with_from_tag(mut self, tag: impl Into<String>) -> Self {
        self.from_tag = Some(tag.into());
        self
    }

    pub fn with_to_tag(mut self, tag: impl Into<String>) -> Self {
        self.to_tag = Some(tag.into());
        self
    }

    /// Session name for the given header: Call-ID followed by its tag.
    pub fn name_for(&self, header: HeaderTag) -> Result<Vec<u8>, UuidError> {
        let tag = match header {
            HeaderTag::From => self.from_tag.as_deref(),
            HeaderTag::To => self.to_tag.as_deref(),
        }
        .ok_or_else(|| UuidError::InvalidInput(format!("no {} header", header)))?;

        Ok(session_name(&self.call_id, tag))
    }
}

/// Concatenate a Call-ID and a header tag into a version 5 name.
pub fn session_name(call_id: &str, tag: &str) -> Vec<u8> {
    let mut name = Vec::with_capacity(call_id.len() + tag.len());
    name.extend_from_slice(call_id.as_bytes());
    name.extend_from_slice(tag.as_bytes());
    name
}

/// A configured UUID request: what to generate and how to print it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UuidSelector {
    pub kind: UuidKind,
    pub format: Format,
    pub tag: HeaderTag,
}

impl UuidSelector {
    pub fn new(kind: UuidKind, format: Format) -> Self {
        Self {
            kind,
            format,
            tag: HeaderTag::default(),
        }
    }

    /// Decode a selector name.
    ///
    /// First letter `s`, `u` or `b` selects simple, urn or braced; anything
    /// else, including an empty name, selects hyphenated. A two letter name
    /// ending in `f` uses the From tag; every other name uses the To tag.
    pub fn from_name(kind: UuidKind, name: &str) -> Self {
        let mut letters = name.chars().map(|c| c.to_ascii_lowercase());

        let format = match letters.next() {
            Some('s') => Format::Simple,
            Some('u') => Format::Urn,
            Some('b') => Format::Braced,
            _ => Format::Hyphenated,
        };

        let tag = match (letters.next(), letters.next()) {
            (Some('f'), None) => HeaderTag::From,
            _ => HeaderTag::To,
        };

        Self { kind, format, tag }
    }

    /// Generate the UUID. `name` is only consulted for [`UuidKind::V5Sip`].
    pub fn generate(&self, name: Option<&[u8]>) -> Result<Uuid, UuidError> {
        match self.kind {
            UuidKind::Nil => Ok(Uuid::nil()),
            UuidKind::V4 => Uuid::new_v4(),
            UuidKind::V5Sip => Uuid::new_v5_sip(name.ok_or(UuidError::InvalidName)?),
        }
    }

    /// Generate and render through a buffer owned by this call.
    pub fn render(&self, name: Option<&[u8]>) -> Result<String, UuidError> {
        let uuid = self.generate(name)?;
        let mut buffer = [0u8; FORMATTING_MAX_LENGTH];
        let len = uuid.format_into(self.format, &mut buffer)?;
        Ok(buffer[..len].iter().map(|&b| b as char).collect())
    }

    /// Render for a SIP message, deriving the version 5 name from its headers.
    pub fn render_for(&self, msg: &SessionMessage) -> Result<String, UuidError> {
        let name = match self.kind {
            UuidKind::V5Sip => Some(msg.name_for(self.tag)?),
            _ => None,
        };
        let text = self.render(name.as_deref())?;
        debug!(kind = %self.kind, format = %self.format, uuid = %text, "rendered session uuid");
        Ok(text)
    }
}

/// Parse UUID text and report whether it is the nil UUID.
pub fn is_nil_uuid(text: &str) -> Result<bool, UuidError> {
    let uuid = Uuid::parse_str(text)?;
    debug!(%uuid, "nil check");
    Ok(uuid.is_nil())
}

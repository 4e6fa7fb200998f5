//! Profile photo encoding as `data:` URIs.

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use graph_core::client::BinaryBody;
use graph_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Media type used when the photo response carries no `Content-Type`.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A photo rendered as `data:<media-type>;base64,<payload>`.
///
/// The string can be used directly as an image source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoEncoding(String);

impl PhotoEncoding {
    /// Encode `bytes` with the given media type.
    ///
    /// Same input always yields the same string. Empty input is valid and
    /// produces an empty payload.
    #[must_use]
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        let media_type = normalize_media_type(Some(media_type));
        Self(format!(
            "{DATA_PREFIX}{media_type}{BASE64_MARKER}{}",
            STANDARD.encode(bytes)
        ))
    }

    /// Encode a fetched response body, taking the media type from its
    /// `Content-Type` header.
    #[must_use]
    pub fn from_body(body: &BinaryBody) -> Self {
        Self::from_bytes(
            &normalize_media_type(body.content_type.as_deref()),
            &body.bytes,
        )
    }

    /// The full data URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the encoding and return the data URI.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Media type embedded in the URI.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.parts().0
    }

    /// Base64 payload embedded in the URI.
    #[must_use]
    pub fn payload(&self) -> &str {
        self.parts().1
    }

    /// Decode the payload back into the original bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD.decode(self.payload()).map_err(Error::from)
    }

    fn parts(&self) -> (&str, &str) {
        self.0
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .unwrap_or(("", ""))
    }
}

fn normalize_media_type(raw: Option<&str>) -> String {
    raw.and_then(|value| value.split(';').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map_or_else(|| DEFAULT_MEDIA_TYPE.to_string(), str::to_ascii_lowercase)
}

impl FromStr for PhotoEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (media_type, payload) = s
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .ok_or_else(|| Error::Decoding(format!("not a base64 data URI: `{s}`")))?;
        if media_type.is_empty() {
            return Err(Error::Decoding("data URI has no media type".to_string()));
        }
        STANDARD.decode(payload)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for PhotoEncoding {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PhotoEncoding> for String {
    fn from(value: PhotoEncoding) -> Self {
        value.0
    }
}

impl AsRef<str> for PhotoEncoding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Convenience builder for HTTP query strings.
//!
//! Graph is picky about a few parameters: `$search` wants its value quoted
//! and form-encoded, while calendar views take raw ISO-8601 timestamps. The
//! builder keeps both kinds of pair in insertion order.

use std::fmt::Display;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Encoding {
    Form,
    Raw,
}

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String, Encoding)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair; the value is form-encoded.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string(), Encoding::Form));
    }

    /// Append a key/value pair whose value is already URL-safe.
    ///
    /// The value is emitted verbatim.
    pub fn push_raw<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string(), Encoding::Raw));
    }

    /// Render the pairs as a query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value, encoding)| match encoding {
                Encoding::Raw => format!("{key}={value}"),
                Encoding::Form => {
                    let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
                    format!("{key}={encoded}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

//! Classification of API responses that may be either an array or an object.
//!
//! GitHub answers some resources with a bare JSON array and others with a
//! single object, and the same configured target can legitimately produce
//! either. The shape is sniffed once from the leading bytes and the decode
//! step branches on it explicitly.

use super::error::GatherError;
use super::models::Datum;

/// Top-level JSON shape of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The body starts with `[`.
    Array,
    /// Anything else, including an empty body.
    Object,
}

impl ResponseShape {
    /// Classifies a body by its first non-whitespace byte.
    ///
    /// The body is not validated; malformed JSON is left for the decoder to
    /// report.
    #[must_use]
    pub fn classify(body: &[u8]) -> Self {
        let first = body
            .iter()
            .copied()
            .find(|byte| !matches!(byte, b' ' | b'\t' | b'\r' | b'\n'));

        match first {
            Some(b'[') => Self::Array,
            _ => Self::Object,
        }
    }
}

/// Returns true when the body looks like a JSON array.
#[must_use]
pub fn is_array(body: &[u8]) -> bool {
    ResponseShape::classify(body) == ResponseShape::Array
}

/// A response body decoded according to its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResponse {
    /// One record per array element.
    Array(Vec<Datum>),
    /// A single record.
    Object(Datum),
}

impl DecodedResponse {
    /// Decodes `body` as a sequence or a single record depending on its shape.
    ///
    /// # Errors
    ///
    /// Returns `GatherError::Decode` when the body is not valid JSON of the
    /// sniffed shape.
    pub fn decode(url: &str, body: &[u8]) -> Result<Self, GatherError> {
        let decoded = match ResponseShape::classify(body) {
            ResponseShape::Array => serde_json::from_slice(body).map(Self::Array),
            ResponseShape::Object => serde_json::from_slice(body).map(Self::Object),
        };

        decoded.map_err(|error| GatherError::Decode {
            url: url.to_owned(),
            message: error.to_string(),
        })
    }
}

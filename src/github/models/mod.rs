//! Normalised records produced by a gather cycle.
//!
//! GitHub payloads are kept opaque: a [`Datum`] passes through every
//! top-level field of the object it was decoded from, while releases and pull
//! requests are carried as raw JSON values in API order.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

const RELEASES_KEY: &str = "releases";
const PULL_REQUESTS_KEY: &str = "pull_requests";

/// One published release, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Release(Value);

impl Release {
    /// Wraps a decoded release payload.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the raw payload.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// One pull request, in any state, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequest(Value);

impl PullRequest {
    /// Wraps a decoded pull request payload.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the raw payload.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Pull request number when the payload carries one.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.0.get("number").and_then(Value::as_u64)
    }
}

/// Normalised record decoded from one API object.
///
/// Releases and pull requests are only attached to records decoded from a
/// single repository resource. They are never read from the response body,
/// so every key of the source object lands in [`Datum::fields`].
///
/// When serialised, each key appears once. An attached collection replaces a
/// source field of the same name only when it is non-empty; otherwise the
/// source field is kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Datum {
    /// Top-level fields of the source object, untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Releases in the API's reverse-chronological order.
    #[serde(skip_deserializing)]
    pub releases: Vec<Release>,
    /// Pull requests across every page, in API order.
    #[serde(skip_deserializing)]
    pub pull_requests: Vec<PullRequest>,
}

impl Datum {
    /// Looks up a pass-through field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let releases_attached = !self.releases.is_empty() || !self.fields.contains_key(RELEASES_KEY);
        let pulls_attached =
            !self.pull_requests.is_empty() || !self.fields.contains_key(PULL_REQUESTS_KEY);

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.fields {
            let replaced = (releases_attached && key == RELEASES_KEY)
                || (pulls_attached && key == PULL_REQUESTS_KEY);
            if !replaced {
                map.serialize_entry(key, value)?;
            }
        }
        if releases_attached {
            map.serialize_entry(RELEASES_KEY, &self.releases)?;
        }
        if pulls_attached {
            map.serialize_entry(PULL_REQUESTS_KEY, &self.pull_requests)?;
        }
        map.end()
    }
}

/// Aggregate result of one successful gather cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GatherReport {
    /// Records in target order, array responses expanded inline.
    pub data: Vec<Datum>,
    /// Every pull request gathered during the cycle, in target order.
    pub pull_requests: Vec<PullRequest>,
}

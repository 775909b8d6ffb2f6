//! Traffic events observed on the wire and the ghost records learned from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Key segment that marks a ghost record.
pub const GHOST_KEY_SEGMENT: &str = "ghost";

/// Key of the aggregate observation counter, relative to the store namespace.
pub const REQUEST_COUNTER_KEY: &str = "stats:request_count";

/// A single request/response pair published by the capture proxy.
///
/// Every field is optional on the wire. Unknown fields (`request_body`,
/// `duration`, ...) are accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficEvent {
    /// HTTP verb
    #[serde(default)]
    pub method: Option<String>,

    /// Request path, query string included
    #[serde(default)]
    pub path: Option<String>,

    /// Response status code; `None` and `0` both mean unknown
    #[serde(default, deserialize_with = "status_code")]
    pub status: Option<i64>,

    /// Opaque response payload
    #[serde(default)]
    pub response_body: Option<String>,

    /// Opaque capture time
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Accept a status sent as a JSON float (`200.0`), rounding down.
fn status_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Code>::deserialize(deserializer)? {
        Some(Code::Int(code)) => Some(code),
        #[allow(clippy::cast_possible_truncation)]
        Some(Code::Float(code)) => Some(code.floor() as i64),
        None => None,
    })
}

impl TrafficEvent {
    /// Decode one channel payload.
    pub fn from_slice(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }

    /// The status code, with `0` folded into "unknown".
    pub fn known_status(&self) -> Option<i64> {
        self.status.filter(|&status| status != 0)
    }

    /// Whether the response was a 2xx.
    pub fn is_success(&self) -> bool {
        self.known_status()
            .is_some_and(|status| (200..300).contains(&status))
    }

    /// The cache key for this event, if it carries both a method and a path.
    pub fn ghost_key(&self) -> Option<GhostKey> {
        match (self.method.as_deref(), self.path.as_deref()) {
            (Some(method), Some(path)) => Some(GhostKey::new(method, path)),
            _ => None,
        }
    }
}

/// Identity of a ghost record: `ghost:{method}:{path}`.
///
/// Built verbatim from its parts. Case, trailing slashes and query-string
/// order all produce distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostKey(String);

impl GhostKey {
    /// Build the key for a method and path.
    pub fn new(method: &str, path: &str) -> Self {
        Self(format!("{GHOST_KEY_SEGMENT}:{method}:{path}"))
    }

    /// The key as stored, before any namespace prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GhostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GhostKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Replayable stand-in for a backend response.
///
/// This is the record format read by the replay proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostResponse {
    /// Status code to replay
    pub status: i64,
    /// Response payload to replay
    pub body: String,
    /// Reserved, always empty for now
    pub headers: HashMap<String, String>,
    /// Capture time of the event that produced this record
    pub timestamp: Option<String>,
}

impl GhostResponse {
    /// Shape a ghost record from the event that triggered it.
    pub fn from_event(event: &TrafficEvent) -> Self {
        Self {
            status: event.status.unwrap_or_default(),
            body: event.response_body.clone().unwrap_or_default(),
            // Headers are not captured upstream yet.
            headers: HashMap::new(),
            timestamp: event.timestamp.clone(),
        }
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

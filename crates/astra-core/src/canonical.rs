//! # Canonical JSON
//!
//! [`CanonicalBytes`] is the only input accepted by [`crate::digest`], so
//! two documents with the same content always hash identically regardless
//! of field order or timestamp formatting.
//!
//! ## Rules
//!
//! 1. Object keys sorted lexicographically.
//! 2. RFC 3339 strings normalized to UTC with a `Z` suffix, truncated to seconds.
//! 3. Compact separators.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced by canonical serialization.
///
/// The inner `Vec<u8>` is private; construct through [`CanonicalBytes::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let normalized = normalize(value);
        Ok(Self(serde_json::to_vec(&normalized)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            // Sort explicitly: another crate in the graph may enable
            // serde_json's `preserve_order`.
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = serde_json::Map::new();
            for (k, v) in entries {
                sorted.insert(k, normalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::String(s) => match chrono::DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Value::String(
                dt.with_timezone(&chrono::Utc)
                    .format("%Y-%m-%dT%H:%M:%SZ")
                    .to_string(),
            ),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

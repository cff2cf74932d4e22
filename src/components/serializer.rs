//! Built-in JSON serializer.

use super::Serializer;
use crate::error::BusError;

/// Serializer backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    /// Creates a new `JsonSerializer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn serialize(&self, body: &serde_json::Value) -> Result<Vec<u8>, BusError> {
        Ok(serde_json::to_vec(body)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<serde_json::Value, BusError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

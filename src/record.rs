//! Record types
//!
//! `RawRecord` is an upstream item exactly as received; `ProjectedRecord`
//! is the `{name, location, image}` shape handed to the sinks.

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// An item as received from the upstream API, before filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    fields: JsonObject,
}

impl RawRecord {
    /// Wrap a JSON object
    pub fn new(fields: JsonObject) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value, if it is an object
    pub fn from_value(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// Look up a dotted path such as `origin.name`
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Look up a dotted path that must hold a string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(JsonValue::as_str)
    }

    /// Human-friendly identifier for log and error messages
    pub fn label(&self) -> String {
        if let Some(name) = self.get_str("name") {
            return name.to_string();
        }
        match self.fields.get("id") {
            Some(id) => format!("id={id}"),
            None => "<unnamed>".to_string(),
        }
    }
}

/// The minimal shape emitted for records that pass the filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectedRecord {
    /// Character name
    pub name: String,
    /// Name of the character's last known location
    pub location: String,
    /// Avatar image URL
    pub image: String,
}

impl ProjectedRecord {
    /// Column names, in output order
    pub const FIELDS: [&'static str; 3] = ["name", "location", "image"];

    /// Create a projected record
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            image: image.into(),
        }
    }

    /// Values in the same order as [`ProjectedRecord::FIELDS`]
    pub fn values(&self) -> [&str; 3] {
        [self.name.as_str(), self.location.as_str(), self.image.as_str()]
    }
}

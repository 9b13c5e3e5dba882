//! Dataview and Datagroup documents
//!
//! Only the identifier is modelled as a field. Everything else in the
//! server's document is kept in a property map so that a document read from
//! the service can be written back unchanged.

use crate::error::{require, Result, SdsError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conversion from decoded JSON into a caller-chosen type
///
/// Used by the preview and interpolated-data calls when
/// [`DecodeMode::Typed`](super::DecodeMode::Typed) is requested.
pub trait Decodable: Sized {
    fn decode(json: Value) -> Result<Self>;
}

/// Decode through serde, for `Decodable` impls of plain serde types
pub fn decode_with_serde<T: DeserializeOwned>(json: Value) -> Result<T> {
    serde_json::from_value(json).map_err(|e| {
        SdsError::InvalidResponse(format!(
            "Failed to decode {}: {}",
            std::any::type_name::<T>(),
            e
        ))
    })
}

impl Decodable for Value {
    fn decode(json: Value) -> Result<Self> {
        Ok(json)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(json: Value) -> Result<Self> {
        match json {
            Value::Array(items) => items.into_iter().map(T::decode).collect(),
            other => Err(SdsError::InvalidResponse(format!(
                "Expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A named view over stream data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataview {
    #[serde(rename = "Id")]
    pub id: String,
    /// Every other key of the document, passed through untouched
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Dataview {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Map::new(),
        }
    }

    /// Set a document property, e.g. `Name`, `Queries` or `IndexTypeCode`
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("Name").and_then(|v| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.properties.get("Description").and_then(|v| v.as_str())
    }

    /// Reject dataviews that cannot be addressed on the server
    pub fn validate(&self) -> Result<()> {
        require(&self.id, "dataview Id")
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(json: Value) -> Result<Self> {
        decode_with_serde(json)
    }
}

impl Decodable for Dataview {
    fn decode(json: Value) -> Result<Self> {
        Self::from_json(json)
    }
}

/// A group of data items inside a dataview
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Datagroup {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Datagroup {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The `Tokens` the server grouped this datagroup by
    pub fn tokens(&self) -> Option<&Value> {
        self.properties.get("Tokens")
    }

    /// The `DataItems` of this datagroup
    pub fn data_items(&self) -> Option<&Value> {
        self.properties.get("DataItems")
    }

    pub fn from_json(json: Value) -> Result<Self> {
        decode_with_serde(json)
    }
}

impl Decodable for Datagroup {
    fn decode(json: Value) -> Result<Self> {
        Self::from_json(json)
    }
}

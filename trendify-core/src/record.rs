//! Weighted records.
//!
//! The shuffle engine only needs a `tickets` weight from each record; every
//! other field is opaque payload. [`Entry`] is the JSON-backed record used by
//! the runner: it keeps the original object intact (key order included) and
//! caches the parsed weight.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field holding a record's weight.
pub const TICKETS_FIELD: &str = "tickets";

/// Anything that can be drawn by weight.
pub trait WeightedRecord {
    /// Draw weight. Expected finite and non-negative.
    fn tickets(&self) -> f64;
}

impl WeightedRecord for f64 {
    fn tickets(&self) -> f64 {
        *self
    }
}

impl<T: WeightedRecord + ?Sized> WeightedRecord for &T {
    fn tickets(&self) -> f64 {
        (**self).tickets()
    }
}

/// Errors building an [`Entry`] from raw JSON.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no numeric '{TICKETS_FIELD}' field")]
    MissingWeightField,
    #[error("record weight {0} must be finite and non-negative")]
    InvalidWeight(f64),
}

/// One input record: the full JSON object plus its parsed weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    tickets: f64,
    fields: Map<String, Value>,
}

impl Entry {
    /// Build an entry from a JSON value, reading its `tickets` field.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Err(RecordError::NotAnObject),
        }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, RecordError> {
        let tickets = fields
            .get(TICKETS_FIELD)
            .and_then(Value::as_f64)
            .ok_or(RecordError::MissingWeightField)?;
        if !tickets.is_finite() || tickets < 0.0 {
            return Err(RecordError::InvalidWeight(tickets));
        }
        Ok(Self { tickets, fields })
    }

    /// Look up an opaque payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Display label taken from `key`, falling back to an empty string.
    ///
    /// String values are returned without quotes; anything else is rendered
    /// as compact JSON.
    pub fn label(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl WeightedRecord for Entry {
    fn tickets(&self) -> f64 {
        self.tickets
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        Entry::from_fields(fields).map_err(serde::de::Error::custom)
    }
}

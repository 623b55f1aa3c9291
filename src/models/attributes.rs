//! Flat attribute rows for dynamic article processing
//!
//! One [`AttributeMap`] describes a single record, typically one decoded
//! spreadsheet row from a seller's mass upload (decoding itself happens
//! upstream). Keys are column names. The `action` and `id` keys are meta
//! keys consumed by the processor and never merged into article content.
//!
//! Values arrive as JSON, so typed getters coerce both native numbers and
//! the string forms a spreadsheet produces (`"4.50"` for a price). JSON
//! null and blank strings count as absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

/// Meta key naming the requested processing action.
pub const ACTION_KEY: &str = "action";
/// Meta key naming the primary key of the targeted article.
pub const ID_KEY: &str = "id";
/// Content key doubling as the seller-supplied secondary identifier.
pub const CUSTOM_IDENTIFIER_KEY: &str = "custom_seller_identifier";

/// A flat string-keyed attribute mapping describing one article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(Map<String, Value>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one column value. Accepts anything JSON-representable.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// The raw action token, if the row carries one.
    pub fn action(&self) -> Option<String> {
        self.get_text(ACTION_KEY)
    }

    /// Whether the row names an `id` column at all, parseable or not.
    /// Drives the default-action inference for rows without an action.
    pub fn has_id(&self) -> bool {
        self.0
            .get(ID_KEY)
            .map(|value| as_text(value).is_some())
            .unwrap_or(false)
    }

    /// The target primary key, when present and well formed.
    pub fn id(&self) -> Option<Uuid> {
        self.get_text(ID_KEY)
            .and_then(|raw| Uuid::from_str(&raw).ok())
    }

    pub fn custom_seller_identifier(&self) -> Option<String> {
        self.get_text(CUSTOM_IDENTIFIER_KEY)
    }

    /// Coerced string value for a column.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(as_text)
    }

    /// Content columns in row order, meta keys excluded.
    pub fn content_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != ACTION_KEY && key.as_str() != ID_KEY)
            .map(|(key, value)| (key.as_str(), value))
    }
}

impl From<Map<String, Value>> for AttributeMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// String coercion: trims, treats null and blank as absent.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decimal coercion for money columns.
pub(crate) fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Integer coercion for count columns.
pub(crate) fn as_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

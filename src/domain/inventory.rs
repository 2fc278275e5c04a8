use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical condition of a stocked product. Part of the record's composite key.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    /// Factory sealed product.
    New,
    /// Previously owned product.
    Used,
    /// Returned or opened product that has not been used.
    OpenBox,
}

impl Condition {
    /// Wire representation used in JSON bodies and URL paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "NEW",
            Condition::Used => "USED",
            Condition::OpenBox => "OPEN_BOX",
        }
    }

    /// Parse the wire representation. Matching is exact, like the server's.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NEW" => Some(Condition::New),
            "USED" => Some(Condition::Used),
            "OPEN_BOX" => Some(Condition::OpenBox),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named list filter understood by the inventory resource.
///
/// `Restock` is computed by the server (records whose quantity is at or below
/// their restock level); the others narrow the list to one [`Condition`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Restock,
    New,
    Used,
    OpenBox,
}

impl Category {
    /// Literal path segment appended to `/inventory`.
    pub fn as_path_segment(self) -> &'static str {
        match self {
            Category::Restock => "RESTOCK",
            Category::New => "NEW",
            Category::Used => "USED",
            Category::OpenBox => "OPEN_BOX",
        }
    }
}

/// Inventory record as returned by the remote resource.
///
/// Every attribute is optional: the server is free to omit fields and the
/// console shows an omitted field as an empty value. Attributes are decoded
/// leniently, so a value of an unexpected type blanks that one cell instead
/// of failing the whole response.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Product identifier, first half of the composite key.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub product_id: Option<i64>,
    /// Product condition, second half of the composite key.
    #[serde(default, deserialize_with = "lenient::condition")]
    pub condition: Option<Condition>,
    /// Units in stock.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub quantity: Option<i64>,
    /// Threshold at or below which the record needs restocking.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub restock_level: Option<i64>,
    /// Server formatted timestamp of the last modification.
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_updated_on: Option<String>,
    /// Whether the server permits update and delete for this record.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub can_update: Option<bool>,
}

/// Decoders accepting any JSON value for a record attribute.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Condition;

    pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0)
                    .map(|value| value as i64)
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(flag) => Some(flag),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Number(number) => match number.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn condition<'de, D>(deserializer: D) -> Result<Option<Condition>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Condition::parse(text.trim()),
            _ => None,
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        })
    }
}

/// Composite key `(product_id, condition)` addressing a single record.
///
/// Both parts hold the text entered by the operator; they are not validated
/// and are sent to the server as individual path segments.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub product_id: String,
    pub condition: String,
}

impl RecordKey {
    pub fn new(product_id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            condition: condition.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.product_id, self.condition)
    }
}

/// Loosely typed value taken from a text field.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum LooseValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl LooseValue {
    /// Interpret field text: integers and `true`/`false` become typed JSON
    /// values, anything else is kept as text. Empty text has no value.
    pub fn from_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(number) = trimmed.parse::<i64>() {
            return Some(LooseValue::Integer(number));
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Some(LooseValue::Boolean(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Some(LooseValue::Boolean(false));
        }
        Some(LooseValue::Text(text.to_string()))
    }
}

/// Request body sent on create and update.
///
/// `quantity` and `restock_level` are `None` when the entered text was not a
/// number; they are forwarded as JSON `null` and left for the server to reject.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct InventoryPayload {
    pub product_id: Option<LooseValue>,
    pub condition: Option<String>,
    pub quantity: Option<i64>,
    pub restock_level: Option<i64>,
    pub last_updated_on: Option<String>,
    pub can_update: Option<LooseValue>,
}

impl InventoryPayload {
    /// Replace the product identifier with a concrete value.
    pub fn with_product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(LooseValue::Integer(product_id));
        self
    }

    /// Replace the modification timestamp.
    pub fn with_last_updated_on(mut self, stamp: impl Into<String>) -> Self {
        self.last_updated_on = Some(stamp.into());
        self
    }
}

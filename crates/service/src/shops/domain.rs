use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Fields a creation body must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["address", "contact_info", "revenue", "name"];

/// A stored shop. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Shop {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub contact_info: String,
    /// Kept as the original JSON number so `1000` and `1000.5` round-trip unchanged.
    pub revenue: Number,
}

/// Rejections produced while reading request bodies. The `Display` text is
/// what clients see in the `error` field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid data types")]
    InvalidTypes,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Request body is empty")]
    EmptyBody,
    #[error("Invalid JSON format")]
    NotAnObject,
    #[error("{0}")]
    Malformed(String),
}

/// Creation input: every field present and correctly typed.
#[derive(Clone, Debug, PartialEq)]
pub struct NewShop {
    pub name: String,
    pub address: String,
    pub contact_info: String,
    pub revenue: Number,
}

impl NewShop {
    /// Parse a raw creation body. Anything that is not a JSON object is an
    /// invalid body; then presence is checked before types.
    pub fn from_slice(body: &[u8]) -> Result<Self, ShopValidationError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ShopValidationError::InvalidBody)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, ShopValidationError> {
        let obj = value.as_object().ok_or(ShopValidationError::InvalidBody)?;
        if !REQUIRED_FIELDS.iter().all(|f| obj.contains_key(*f)) {
            return Err(ShopValidationError::MissingFields);
        }

        match (text(obj, "address"), text(obj, "contact_info"), text(obj, "name"), obj.get("revenue")) {
            (Some(address), Some(contact_info), Some(name), Some(Value::Number(revenue))) => Ok(Self {
                name,
                address,
                contact_info,
                revenue: revenue.clone(),
            }),
            _ => Err(ShopValidationError::InvalidTypes),
        }
    }

    pub fn into_shop(self, id: u64) -> Shop {
        Shop {
            id,
            name: self.name,
            address: self.address,
            contact_info: self.contact_info,
            revenue: self.revenue,
        }
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Partial update: each present field overwrites the stored one, absent
/// fields stay as they are. Unknown keys (including `id`) are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ShopPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Number>,
}

impl ShopPatch {
    /// Parse a raw update body. Syntax errors carry the parser's message.
    pub fn from_slice(body: &[u8]) -> Result<Self, ShopValidationError> {
        if body.is_empty() {
            return Err(ShopValidationError::EmptyBody);
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ShopValidationError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(ShopValidationError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| ShopValidationError::Malformed(e.to_string()))
    }

    pub fn apply(self, shop: &mut Shop) {
        if let Some(name) = self.name { shop.name = name; }
        if let Some(address) = self.address { shop.address = address; }
        if let Some(contact_info) = self.contact_info { shop.contact_info = contact_info; }
        if let Some(revenue) = self.revenue { shop.revenue = revenue; }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of every failed response: `{"error": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Body of successful mutations: `{"message": "..."}`, plus `shop_id` on create.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub shop_id: Option<u64>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), shop_id: None }
    }

    pub fn with_shop_id(mut self, id: u64) -> Self {
        self.shop_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_body_omits_missing_shop_id() {
        let plain = serde_json::to_value(MessageBody::new("Shop deleted successfully")).unwrap();
        assert_eq!(plain, serde_json::json!({"message": "Shop deleted successfully"}));

        let created = serde_json::to_value(MessageBody::new("Shop created successfully").with_shop_id(3)).unwrap();
        assert_eq!(created, serde_json::json!({"message": "Shop created successfully", "shop_id": 3}));
    }

    #[test]
    fn error_body_shape() {
        let v = serde_json::to_value(ErrorBody::new("Shop not found")).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Shop not found"}));
    }
}

//! Platform-side item shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical item pushed to an extraction repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub id: String,
    pub created_date: String,
    pub modified_date: String,
    pub data: Value,
}

/// Identifiers of an item handed to a loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemId {
    pub devrev: String,
    /// Set when the item already exists in the external system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,
}

/// An item read from the platform for loading into the external system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformItem {
    pub id: ItemId,
    pub created_date: String,
    pub modified_date: String,
    #[serde(default)]
    pub data: Value,
}

impl PlatformItem {
    /// Whether the loader should update rather than create
    pub fn is_update(&self) -> bool {
        self.id.external.as_deref().is_some_and(|id| !id.is_empty())
    }
}

impl From<NormalizedItem> for PlatformItem {
    fn from(item: NormalizedItem) -> Self {
        Self {
            id: ItemId {
                devrev: item.id,
                external: None,
            },
            created_date: item.created_date,
            modified_date: item.modified_date,
            data: item.data,
        }
    }
}

/// Result of creating or updating one item in the external system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadingResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_platform_item_update_detection() {
        let mut item: PlatformItem = serde_json::from_value(json!({
            "id": {"devrev": "don:1"},
            "created_date": "2024-01-01",
            "modified_date": "2024-01-02",
            "data": {"name": "Ada"}
        }))
        .unwrap();
        assert!(!item.is_update());

        item.id.external = Some(String::new());
        assert!(!item.is_update());

        item.id.external = Some("c-1".to_string());
        assert!(item.is_update());
    }

    #[test]
    fn test_failure_response() {
        let response = LoadingResponse::failure("nope");
        assert!(!response.is_success());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"error": "nope"}));
    }
}

//! Inbound event payload
//!
//! Only the fields this connector reads are modelled; everything else in the
//! payload is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Phase identifiers carried by inbound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ExtractionExternalSyncUnitsStart,
    ExtractionMetadataStart,
    ExtractionDataStart,
    ExtractionDataContinue,
    ExtractionDataDelete,
    ExtractionAttachmentsStart,
    ExtractionAttachmentsContinue,
    ExtractionAttachmentsDelete,
    StartLoadingData,
    ContinueLoadingData,
    StartLoadingAttachments,
    ContinueLoadingAttachments,
    #[serde(other)]
    Unknown,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractionExternalSyncUnitsStart => "EXTRACTION_EXTERNAL_SYNC_UNITS_START",
            Self::ExtractionMetadataStart => "EXTRACTION_METADATA_START",
            Self::ExtractionDataStart => "EXTRACTION_DATA_START",
            Self::ExtractionDataContinue => "EXTRACTION_DATA_CONTINUE",
            Self::ExtractionDataDelete => "EXTRACTION_DATA_DELETE",
            Self::ExtractionAttachmentsStart => "EXTRACTION_ATTACHMENTS_START",
            Self::ExtractionAttachmentsContinue => "EXTRACTION_ATTACHMENTS_CONTINUE",
            Self::ExtractionAttachmentsDelete => "EXTRACTION_ATTACHMENTS_DELETE",
            Self::StartLoadingData => "START_LOADING_DATA",
            Self::ContinueLoadingData => "CONTINUE_LOADING_DATA",
            Self::StartLoadingAttachments => "START_LOADING_ATTACHMENTS",
            Self::ContinueLoadingAttachments => "CONTINUE_LOADING_ATTACHMENTS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inbound event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub payload: EventPayload,
    #[serde(default)]
    pub context: InvocationContext,
    #[serde(default)]
    pub execution_metadata: ExecutionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    pub event_type: EventType,
    /// Connection configuration entered by the user (may be null)
    #[serde(default)]
    pub connection_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub event_context: EventContext,
}

/// Scope of the event: selected sync unit and external system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_sync_unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_system_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_system: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationContext {
    #[serde(default)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devrev_endpoint: Option<String>,
}

impl Event {
    /// Create an event with an empty context
    pub fn new(event_type: EventType) -> Self {
        Self {
            payload: EventPayload {
                event_type,
                connection_data: None,
                event_context: EventContext::default(),
            },
            context: InvocationContext::default(),
            execution_metadata: ExecutionMetadata::default(),
        }
    }

    /// Set a connection configuration field
    pub fn with_connection_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload
            .connection_data
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn with_sync_unit(mut self, id: impl Into<String>) -> Self {
        self.payload.event_context.external_sync_unit_id = Some(id.into());
        self
    }

    pub fn with_external_system(mut self, id: impl Into<String>) -> Self {
        self.payload.event_context.external_system_id = Some(id.into());
        self
    }

    pub fn with_platform(mut self, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        self.execution_metadata.devrev_endpoint = Some(endpoint.into());
        self.context.secrets.service_account_token = Some(token.into());
        self
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type
    }

    pub fn connection_data(&self) -> Option<&Map<String, Value>> {
        self.payload.connection_data.as_ref()
    }

    /// The sync unit the event is scoped to, if any
    pub fn selected_sync_unit(&self) -> Option<&str> {
        self.payload
            .event_context
            .external_sync_unit_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// External system identifier used to look up stored credentials
    pub fn external_system(&self) -> Option<&str> {
        let scope = &self.payload.event_context;
        scope
            .external_system_id
            .as_deref()
            .or(scope.external_system.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn service_account_token(&self) -> Option<&str> {
        self.context.secrets.service_account_token.as_deref()
    }

    pub fn platform_endpoint(&self) -> Option<&str> {
        self.execution_metadata.devrev_endpoint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_event() {
        let event: Event = serde_json::from_value(json!({
            "payload": {
                "event_type": "EXTRACTION_DATA_START",
                "connection_data": {"key": "don:core:artifact/1", "org_id": "org"},
                "event_context": {
                    "external_sync_unit_id": "maple-kb",
                    "external_system_id": "sys-1",
                    "uuid": "ignored"
                }
            },
            "context": {"secrets": {"service_account_token": "token"}},
            "execution_metadata": {"devrev_endpoint": "https://api.example.com"}
        }))
        .unwrap();

        assert_eq!(event.event_type(), EventType::ExtractionDataStart);
        assert_eq!(event.selected_sync_unit(), Some("maple-kb"));
        assert_eq!(event.external_system(), Some("sys-1"));
        assert_eq!(event.service_account_token(), Some("token"));
        assert_eq!(event.platform_endpoint(), Some("https://api.example.com"));
        assert_eq!(
            event.connection_data().unwrap()["key"],
            "don:core:artifact/1"
        );
    }

    #[test]
    fn test_unknown_event_type_and_null_connection_data() {
        let event: Event = serde_json::from_value(json!({
            "payload": {
                "event_type": "SOMETHING_NEW",
                "connection_data": null
            }
        }))
        .unwrap();

        assert_eq!(event.event_type(), EventType::Unknown);
        assert!(event.connection_data().is_none());
        assert!(event.selected_sync_unit().is_none());
    }

    #[test]
    fn test_external_system_fallback() {
        let mut event = Event::new(EventType::ExtractionDataStart);
        event.payload.event_context.external_system = Some("legacy".to_string());
        assert_eq!(event.external_system(), Some("legacy"));

        let event = event.with_external_system("primary");
        assert_eq!(event.external_system(), Some("primary"));
    }

    #[test]
    fn test_event_type_names_round_trip() {
        for event_type in [
            EventType::ExtractionExternalSyncUnitsStart,
            EventType::ContinueLoadingAttachments,
        ] {
            let value = serde_json::to_value(event_type).unwrap();
            assert_eq!(value, json!(event_type.as_str()));
        }
    }
}

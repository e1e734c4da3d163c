//! Outbound signals and their payloads

use serde::{Deserialize, Serialize};

/// Signals emitted by extraction workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractorEventType {
    ExtractionExternalSyncUnitsDone,
    ExtractionExternalSyncUnitsError,
    ExtractionMetadataDone,
    ExtractionMetadataError,
    ExtractionDataProgress,
    ExtractionDataDone,
    ExtractionDataError,
    ExtractionAttachmentsProgress,
    ExtractionAttachmentsDone,
    ExtractionAttachmentsError,
}

/// Signals emitted by loading workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoaderEventType {
    DataLoadingProgress,
    DataLoadingDone,
    DataLoadingError,
    AttachmentLoadingProgress,
    AttachmentLoadingDone,
    AttachmentLoadingError,
}

/// Any outbound signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Signal {
    Extractor(ExtractorEventType),
    Loader(LoaderEventType),
}

impl Signal {
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            Self::Extractor(
                ExtractorEventType::ExtractionExternalSyncUnitsDone
                    | ExtractorEventType::ExtractionMetadataDone
                    | ExtractorEventType::ExtractionDataDone
                    | ExtractorEventType::ExtractionAttachmentsDone
            ) | Self::Loader(
                LoaderEventType::DataLoadingDone | LoaderEventType::AttachmentLoadingDone
            )
        )
    }

    pub fn is_progress(&self) -> bool {
        matches!(
            self,
            Self::Extractor(
                ExtractorEventType::ExtractionDataProgress
                    | ExtractorEventType::ExtractionAttachmentsProgress
            ) | Self::Loader(
                LoaderEventType::DataLoadingProgress | LoaderEventType::AttachmentLoadingProgress
            )
        )
    }

    pub fn is_error(&self) -> bool {
        !self.is_done() && !self.is_progress()
    }
}

impl From<ExtractorEventType> for Signal {
    fn from(value: ExtractorEventType) -> Self {
        Self::Extractor(value)
    }
}

impl From<LoaderEventType> for Signal {
    fn from(value: LoaderEventType) -> Self {
        Self::Loader(value)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => write!(f, "{}", name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// A sync unit advertised during sync-unit discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSyncUnit {
    pub id: String,
    pub name: String,
    pub description: String,
    pub item_count: usize,
    pub item_type: String,
}

/// Structured error carried by every error signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalError {
    pub message: String,
}

/// Outcome counts for one item type during loading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderReport {
    pub item_type: String,
    #[serde(default)]
    pub created: usize,
    #[serde(default)]
    pub updated: usize,
    #[serde(default)]
    pub failed: usize,
}

impl LoaderReport {
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            ..Default::default()
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.failed
    }
}

/// Payload attached to a signal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_sync_units: Option<Vec<ExternalSyncUnit>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SignalError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<LoaderReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_files: Option<Vec<String>>,
}

impl EventData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(SignalError {
                message: message.into(),
            }),
            ..Default::default()
        }
    }

    pub fn sync_units(units: Vec<ExternalSyncUnit>) -> Self {
        Self {
            external_sync_units: Some(units),
            ..Default::default()
        }
    }

    pub fn loading(reports: Vec<LoaderReport>, processed_files: Vec<String>) -> Self {
        Self {
            reports: Some(reports),
            processed_files: Some(processed_files),
            ..Default::default()
        }
    }
}

/// A signal together with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub event_type: Signal,
    #[serde(default)]
    pub event_data: EventData,
}

//! Locating the archive reference for an invocation
//!
//! The reference to the uploaded archive is normally entered in the
//! connection configuration. When the framework does not forward it, it is
//! looked up in the keyring of the event's external system instead.

use crate::adapter::Event;

use eyre::Report;
use serde_json::{Map, Value};

/// Connection data keys holding the archive reference, in priority order
pub const ARCHIVE_REFERENCE_KEYS: [&str; 4] = ["key", "zip_artifact_id", "zip_file", "artifact_id"];

/// Keyring field names holding the archive reference, in priority order
pub const KEYRING_REFERENCE_KEYS: [&str; 3] = ["zip_artifact_id", "zip_file", "artifact_id"];

/// Keyring containers searched for [`KEYRING_REFERENCE_KEYS`], in priority order
pub const KEYRING_FIELD_CONTAINERS: [&str; 3] = ["field_values", "fields", "values"];

const REFERENCE_PREFIX: &str = "don:";

/// Where the archive for an invocation comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveReference {
    /// Artifact id taken from the connection configuration
    Artifact(String),
    /// To be looked up in the keyring of this external system
    Keyring { external_system: String },
}

/// First non-empty string under one of `keys`
pub fn find_reference(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Archive reference stored in a keyring's details
///
/// Only the first container present as an object is searched.
pub fn reference_from_keyring(keyring: &Value) -> Option<String> {
    KEYRING_FIELD_CONTAINERS
        .iter()
        .find_map(|container| keyring.get(*container).and_then(Value::as_object))
        .and_then(|fields| find_reference(fields, &KEYRING_REFERENCE_KEYS))
}

/// Decide where the event's archive comes from
///
/// # Errors
/// Returns a diagnostic listing the recognized keys and the connection data
/// received when neither the configuration nor an external system can supply
/// the reference.
pub fn resolve_archive_reference(event: &Event) -> Result<ArchiveReference, Report> {
    let fields = event.connection_data().cloned().unwrap_or_default();
    log::debug!(
        "Connection data keys: {:?}",
        fields.keys().collect::<Vec<_>>()
    );

    if let Some(reference) = find_reference(&fields, &ARCHIVE_REFERENCE_KEYS) {
        if !reference.starts_with(REFERENCE_PREFIX) {
            log::warn!(
                "Artifact ID doesn't start with '{}'. Received: {}",
                REFERENCE_PREFIX,
                reference
            );
        }
        log::info!("Found ZIP artifact ID: {}", reference);
        return Ok(ArchiveReference::Artifact(reference));
    }

    match event.external_system() {
        Some(external_system) => {
            log::info!(
                "No archive reference in connection data, will look up keyring for {}",
                external_system
            );
            Ok(ArchiveReference::Keyring {
                external_system: external_system.to_string(),
            })
        }
        None => Err(missing_reference_error(event, false)),
    }
}

/// Diagnostic for an invocation without an archive reference
pub fn missing_reference_error(event: &Event, keyring_checked: bool) -> Report {
    let received = event
        .connection_data()
        .map(|data| serde_json::to_string_pretty(data).unwrap_or_default())
        .unwrap_or_else(|| "null".to_string());
    let searched = if keyring_checked {
        "connection_data or keyring API"
    } else {
        "connection_data"
    };

    eyre::eyre!(
        "ZIP artifact ID is required but not found in {}.\n\n\
         Recognized connection fields: {}\n\
         SOLUTION: In the connection, enter the artifact ID in the \"ZIP Artifact ID\" field.\n\
         Example: \"don:core:dvrv-us-1:devo/YOUR_ORG:artifact/ARTIFACT_ID\"\n\n\
         Connection data received:\n{}",
        searched,
        ARCHIVE_REFERENCE_KEYS.join(", "),
        received
    )
}

//! Bundled domain metadata and initial domain mapping

use crate::maple::ItemType;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const EXTERNAL_DOMAIN_METADATA: &str = include_str!("../assets/external_domain_metadata.json");
const INITIAL_DOMAIN_MAPPING: &str = include_str!("../assets/initial_domain_mapping.json");

/// Record-type catalog advertised during metadata extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMetadata {
    pub schema_version: String,
    pub record_types: BTreeMap<String, Value>,
}

impl DomainMetadata {
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(EXTERNAL_DOMAIN_METADATA)
            .context("Failed to parse bundled external domain metadata")
    }

    /// Keep only the record type of `item_type`
    pub fn narrowed_to(mut self, item_type: ItemType) -> Self {
        self.record_types.retain(|name, _| name == item_type.as_str());
        self
    }

    /// The metadata to advertise for an optional selected sync unit
    ///
    /// An unknown sync unit id leaves the metadata whole.
    pub fn for_sync_unit(self, sync_unit: Option<&str>) -> Self {
        match sync_unit.map(|id| (id, ItemType::from_sync_unit_id(id))) {
            Some((_, Some(item_type))) => self.narrowed_to(item_type),
            Some((id, None)) => {
                log::warn!("Unknown sync unit '{}', advertising every record type", id);
                self
            }
            None => self,
        }
    }
}

/// The initial domain mapping document
pub fn initial_domain_mapping() -> Result<Value> {
    serde_json::from_str(INITIAL_DOMAIN_MAPPING)
        .context("Failed to parse bundled initial domain mapping")
}

//! Extraction phases
//!
//! Each inbound extraction event is routed to one worker:
//!
//! | Event type | Worker |
//! |---|---|
//! | `EXTRACTION_EXTERNAL_SYNC_UNITS_START` | [`SyncUnitsWorker`] |
//! | `EXTRACTION_METADATA_START` | [`MetadataWorker`] |
//! | `EXTRACTION_DATA_START`, `EXTRACTION_DATA_CONTINUE` | [`DataWorker`] |
//! | `EXTRACTION_ATTACHMENTS_START`, `EXTRACTION_ATTACHMENTS_CONTINUE` | [`AttachmentsWorker`] |

mod attachments;
mod data;
mod metadata;
mod sync_units;

pub use attachments::{ATTACHMENTS_INPUT, AttachmentsWorker, stream_attachment};
pub use data::{DataWorker, item_types_to_extract};
pub use metadata::{METADATA_REPO, MetadataWorker};
pub use sync_units::{SyncUnitsWorker, external_sync_units};

use crate::adapter::{
    Emitter, Event, EventType, ExtractorState, LoaderInput, WorkerAdapter, process_task,
};
use crate::context::ConnectorContext;
use crate::schema::initial_domain_mapping;

use eyre::{Context, Result, bail};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::sync::Arc;

pub const INITIAL_DOMAIN_MAPPING_FILE: &str = "initial_domain_mapping.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPhase {
    ExternalSyncUnits,
    Metadata,
    Data,
    Attachments,
}

impl ExtractionPhase {
    pub fn from_event_type(event_type: EventType) -> Option<Self> {
        match event_type {
            EventType::ExtractionExternalSyncUnitsStart => Some(Self::ExternalSyncUnits),
            EventType::ExtractionMetadataStart => Some(Self::Metadata),
            EventType::ExtractionDataStart | EventType::ExtractionDataContinue => Some(Self::Data),
            EventType::ExtractionAttachmentsStart | EventType::ExtractionAttachmentsContinue => {
                Some(Self::Attachments)
            }
            _ => None,
        }
    }
}

/// Run the extraction worker for each event in order
///
/// The checkpoint state is threaded from one event to the next and returned
/// at the end. Repositories and the initial domain mapping are written to the
/// context's output directory when one is set. `inputs` supplies the items
/// handed to the attachments phase, keyed by item type.
///
/// # Errors
/// Returns an error for an event type that is not an extraction phase, or
/// when emitting a signal or writing output fails. Worker failures are
/// reported through error signals instead.
pub async fn run(
    events: Vec<Event>,
    context: &ConnectorContext,
    mut state: ExtractorState,
    inputs: &HashMap<String, LoaderInput>,
    emitter: Arc<dyn Emitter>,
) -> Result<ExtractorState> {
    if let Some(dir) = context.output_dir() {
        write_initial_domain_mapping(dir)?;
    }

    for event in events {
        let event_type = event.event_type();
        let Some(phase) = ExtractionPhase::from_event_type(event_type) else {
            bail!("Unsupported extraction event type: {}", event_type);
        };
        log::info!("Running {} for {:?} phase", event_type.to_string().cyan(), phase);

        let mut adapter =
            WorkerAdapter::new(event, state, emitter.clone()).with_inputs(inputs.clone());
        if let Some(dir) = context.output_dir() {
            adapter = adapter.with_output_dir(dir);
        }

        let budget = context.budget();
        match phase {
            ExtractionPhase::ExternalSyncUnits => {
                process_task(&SyncUnitsWorker::new(context), &mut adapter, budget).await?
            }
            ExtractionPhase::Metadata => process_task(&MetadataWorker, &mut adapter, budget).await?,
            ExtractionPhase::Data => {
                process_task(&DataWorker::new(context), &mut adapter, budget).await?
            }
            ExtractionPhase::Attachments => {
                process_task(&AttachmentsWorker, &mut adapter, budget).await?
            }
        }

        state = adapter.into_state();
    }

    Ok(state)
}

fn write_initial_domain_mapping(dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(INITIAL_DOMAIN_MAPPING_FILE);
    let mapping = initial_domain_mapping()?;
    std::fs::write(&path, serde_json::to_string_pretty(&mapping)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

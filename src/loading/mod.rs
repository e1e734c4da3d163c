//! Loading phases
//!
//! `START_LOADING_DATA` and `CONTINUE_LOADING_DATA` run the
//! [`DataLoadingWorker`]; `START_LOADING_ATTACHMENTS` and
//! `CONTINUE_LOADING_ATTACHMENTS` run the [`AttachmentLoadingWorker`].

mod attachments;
mod data;

pub use attachments::{AttachmentItemLoader, AttachmentLoadingWorker};
pub use data::{ArticleItemLoader, CustomerItemLoader, DataLoadingWorker};

use crate::adapter::{
    Emitter, Event, EventType, LoaderInput, LoaderState, WorkerAdapter, process_task,
};
use crate::context::ConnectorContext;
use crate::maple::ItemType;
use crate::storage::NdjsonReader;

use eyre::{Result, bail};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const ATTACHMENTS_ITEM_TYPE: &str = "attachments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    Data,
    Attachments,
}

impl LoadingPhase {
    pub fn from_event_type(event_type: EventType) -> Option<Self> {
        match event_type {
            EventType::StartLoadingData | EventType::ContinueLoadingData => Some(Self::Data),
            EventType::StartLoadingAttachments | EventType::ContinueLoadingAttachments => {
                Some(Self::Attachments)
            }
            _ => None,
        }
    }
}

/// Read `<dir>/<item_type>.ndjson` for every loadable item type present
pub fn read_inputs(dir: impl AsRef<Path>) -> Result<HashMap<String, LoaderInput>> {
    let dir = dir.as_ref();
    let mut inputs = HashMap::new();

    let item_types = ItemType::ALL
        .iter()
        .map(ItemType::as_str)
        .chain([ATTACHMENTS_ITEM_TYPE]);
    for item_type in item_types {
        let file = format!("{}.ndjson", item_type);
        let path = dir.join(&file);
        if !path.is_file() {
            log::debug!("No input for {} at {}", item_type, path.display());
            continue;
        }

        let items = NdjsonReader::new(&path).read()?;
        log::info!("Read {} {} item(s) from {}", items.len(), item_type, path.display());
        inputs.insert(item_type.to_string(), LoaderInput::new(file, items));
    }

    Ok(inputs)
}

/// Run the loading worker for each event in order
///
/// # Errors
/// Returns an error for an event type that is not a loading phase or when
/// emitting a signal fails. Worker failures are reported through error
/// signals instead.
pub async fn run(
    events: Vec<Event>,
    context: &ConnectorContext,
    inputs: &HashMap<String, LoaderInput>,
    emitter: Arc<dyn Emitter>,
) -> Result<()> {
    for event in events {
        let event_type = event.event_type();
        let Some(phase) = LoadingPhase::from_event_type(event_type) else {
            bail!("Unsupported loading event type: {}", event_type);
        };
        log::info!("Running {} for {:?} phase", event_type.to_string().cyan(), phase);

        let mut adapter = WorkerAdapter::new(event, LoaderState::default(), emitter.clone())
            .with_inputs(inputs.clone());

        let budget = context.budget();
        match phase {
            LoadingPhase::Data => {
                process_task(&DataLoadingWorker::new(context), &mut adapter, budget).await?
            }
            LoadingPhase::Attachments => {
                process_task(&AttachmentLoadingWorker, &mut adapter, budget).await?
            }
        }
    }

    Ok(())
}

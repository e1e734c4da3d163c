//! Data extraction
//!
//! Runs one pipeline per item type: Maple client, normalizer, repository.
//! Each item type is marked completed in the checkpoint state once all of its
//! items were pushed, so a continuation skips it.

use crate::adapter::{
    Event, EventData, EventType, ExtractorEventType, ExtractorState, Signal, Worker, WorkerAdapter,
};
use crate::context::ConnectorContext;
use crate::etl::Pipeline;
use crate::maple::{
    ArticleNormalizer, ArticlesExtractor, CustomerNormalizer, CustomersExtractor, ItemType,
    MapleClient,
};

use eyre::Result;
use owo_colors::OwoColorize;

/// Item types in scope for an event
///
/// A selected sync unit limits extraction to its item type; an unknown
/// selection is ignored.
pub fn item_types_to_extract(event: &Event) -> Vec<ItemType> {
    match event.selected_sync_unit() {
        Some(id) => match ItemType::from_sync_unit_id(id) {
            Some(item_type) => vec![item_type],
            None => {
                log::warn!("Unknown sync unit '{}', extracting every item type", id);
                ItemType::ALL.to_vec()
            }
        },
        None => ItemType::ALL.to_vec(),
    }
}

pub struct DataWorker<'a> {
    context: &'a ConnectorContext,
}

impl<'a> DataWorker<'a> {
    pub fn new(context: &'a ConnectorContext) -> Self {
        Self { context }
    }
}

async fn extract_item_type(
    client: &MapleClient,
    adapter: &WorkerAdapter<ExtractorState>,
    item_type: ItemType,
) -> Result<usize> {
    let repo = adapter.repo(item_type.as_str())?.clone();
    match item_type {
        ItemType::Customers => {
            Pipeline::new(CustomersExtractor::new(client), CustomerNormalizer, repo)
                .run()
                .await
        }
        ItemType::MapleKb => {
            Pipeline::new(ArticlesExtractor::new(client), ArticleNormalizer, repo)
                .run()
                .await
        }
    }
}

impl Worker<ExtractorState> for DataWorker<'_> {
    fn error_signal(&self) -> Signal {
        ExtractorEventType::ExtractionDataError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        if adapter.event().event_type() == EventType::ExtractionDataStart {
            adapter.state_mut().reset();
        }

        let item_types = item_types_to_extract(adapter.event());
        log::info!(
            "Extracting {}",
            item_types
                .iter()
                .map(ItemType::as_str)
                .collect::<Vec<_>>()
                .join(", ")
                .cyan()
        );

        adapter.initialize_repos(&ItemType::ALL.map(|t| t.as_str()))?;
        let client = self.context.maple_client(adapter.event())?;

        for item_type in item_types {
            if adapter.state().is_completed(item_type) {
                log::info!("Skipping {}, already completed", item_type);
                continue;
            }

            // An item type is extracted in one pass; earlier partial output is discarded
            adapter.repo(item_type.as_str())?.truncate()?;

            match extract_item_type(&client, adapter, item_type).await {
                Ok(count) => {
                    log::info!("Pushed {} {} item(s)", count, item_type);
                    adapter.state_mut().mark_completed(item_type);
                }
                Err(e) => {
                    log::error!("Error extracting {}: {:#}", item_type, e);
                    return adapter
                        .emit(
                            ExtractorEventType::ExtractionDataError,
                            EventData::error(format!("{:#}", e)),
                        )
                        .await;
                }
            }
        }

        adapter
            .emit(ExtractorEventType::ExtractionDataDone, EventData::empty())
            .await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        adapter
            .emit(ExtractorEventType::ExtractionDataProgress, EventData::empty())
            .await
    }
}

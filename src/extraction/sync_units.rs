//! Sync-unit discovery

use crate::adapter::{
    EventData, ExternalSyncUnit, ExtractorEventType, ExtractorState, Signal, Worker, WorkerAdapter,
};
use crate::context::ConnectorContext;
use crate::maple::ItemType;

use eyre::Result;

/// The two sync units Maple data is split into, with their item counts
pub fn external_sync_units(customer_count: usize, article_count: usize) -> Vec<ExternalSyncUnit> {
    ItemType::ALL
        .into_iter()
        .map(|item_type| {
            let (name, description, item_count) = match item_type {
                ItemType::Customers => ("Customers", "Customer data from Maple data", customer_count),
                ItemType::MapleKb => (
                    "Maple KB",
                    "Knowledge base articles from Maple data",
                    article_count,
                ),
            };
            ExternalSyncUnit {
                id: item_type.sync_unit_id().to_string(),
                name: name.to_string(),
                description: description.to_string(),
                item_count,
                item_type: item_type.as_str().to_string(),
            }
        })
        .collect()
}

pub struct SyncUnitsWorker<'a> {
    context: &'a ConnectorContext,
}

impl<'a> SyncUnitsWorker<'a> {
    pub fn new(context: &'a ConnectorContext) -> Self {
        Self { context }
    }
}

impl Worker<ExtractorState> for SyncUnitsWorker<'_> {
    fn error_signal(&self) -> Signal {
        ExtractorEventType::ExtractionExternalSyncUnitsError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        let client = self.context.maple_client(adapter.event())?;

        // Both lists are read only to count their items
        let customers = client.list_customers().await?;
        let articles = client.list_articles().await?;
        log::info!("Fetched customers: {}", customers.len());
        log::info!("Fetched Maple KB articles: {}", articles.len());

        let units = external_sync_units(customers.len(), articles.len());
        adapter
            .emit(
                ExtractorEventType::ExtractionExternalSyncUnitsDone,
                EventData::sync_units(units),
            )
            .await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        adapter
            .emit(
                ExtractorEventType::ExtractionExternalSyncUnitsError,
                EventData::error("Failed to extract external sync units. Lambda timeout."),
            )
            .await
    }
}

//! Metadata extraction

use crate::adapter::{EventData, ExtractorEventType, ExtractorState, Signal, Worker, WorkerAdapter};
use crate::schema::DomainMetadata;

use eyre::Result;

pub const METADATA_REPO: &str = "external_domain_metadata";

/// Pushes the domain metadata, narrowed to the selected sync unit if any
pub struct MetadataWorker;

impl Worker<ExtractorState> for MetadataWorker {
    fn error_signal(&self) -> Signal {
        ExtractorEventType::ExtractionMetadataError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        adapter.initialize_repos(&[METADATA_REPO])?;

        let selected = adapter.event().selected_sync_unit();
        log::info!("Metadata extraction - Selected sync unit ID: {:?}", selected);
        let metadata = DomainMetadata::bundled()?.for_sync_unit(selected);

        let repo = adapter.repo(METADATA_REPO)?;
        repo.truncate()?;
        repo.push(&[metadata])?;
        adapter
            .emit(ExtractorEventType::ExtractionMetadataDone, EventData::empty())
            .await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        adapter
            .emit(
                ExtractorEventType::ExtractionMetadataError,
                EventData::error("Failed to extract metadata. Lambda timeout."),
            )
            .await
    }
}

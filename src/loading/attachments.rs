//! Attachment loading; every attachment fails

use super::ATTACHMENTS_ITEM_TYPE;
use crate::adapter::{
    EventData, ItemLoader, LoaderEventType, LoaderState, LoadingResponse, PlatformItem, Signal,
    Worker, WorkerAdapter,
};
use crate::maple::ATTACHMENTS_UNSUPPORTED;

use eyre::Result;

pub struct AttachmentItemLoader;

impl ItemLoader for AttachmentItemLoader {
    fn item_type(&self) -> &str {
        ATTACHMENTS_ITEM_TYPE
    }

    async fn create(&self, _item: PlatformItem) -> LoadingResponse {
        LoadingResponse::failure(ATTACHMENTS_UNSUPPORTED)
    }

    async fn update(&self, _item: PlatformItem) -> LoadingResponse {
        LoadingResponse::failure(ATTACHMENTS_UNSUPPORTED)
    }
}

pub struct AttachmentLoadingWorker;

impl Worker<LoaderState> for AttachmentLoadingWorker {
    fn error_signal(&self) -> Signal {
        LoaderEventType::AttachmentLoadingError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<LoaderState>) -> Result<()> {
        adapter.load_item_type(&AttachmentItemLoader).await?;
        let data = EventData::loading(adapter.reports().to_vec(), adapter.processed_files().to_vec());
        adapter.emit(LoaderEventType::AttachmentLoadingDone, data).await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<LoaderState>) -> Result<()> {
        let data = EventData::loading(adapter.reports().to_vec(), adapter.processed_files().to_vec());
        adapter
            .emit(LoaderEventType::AttachmentLoadingProgress, data)
            .await
    }
}

//! Attachment extraction
//!
//! Maple exports carry no attachments. Any attachment handed to the worker
//! fails with the same message, and the phase still completes with a report
//! counting the failures.

use crate::adapter::{EventData, ExtractorEventType, ExtractorState, Signal, Worker, WorkerAdapter};
use crate::maple::ATTACHMENTS_UNSUPPORTED;

use eyre::Result;
use serde_json::Value;

pub const ATTACHMENTS_INPUT: &str = "attachments";

/// Stream one attachment to the platform
pub fn stream_attachment(attachment: &Value) -> Result<(), String> {
    log::debug!("Streaming attachment {}", attachment.get("id").unwrap_or(&Value::Null));
    Err(ATTACHMENTS_UNSUPPORTED.to_string())
}

pub struct AttachmentsWorker;

impl Worker<ExtractorState> for AttachmentsWorker {
    fn error_signal(&self) -> Signal {
        ExtractorEventType::ExtractionAttachmentsError.into()
    }

    async fn task(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        let report = adapter.stream_item_type(ATTACHMENTS_INPUT, stream_attachment);
        if report.failed > 0 {
            log::warn!("{} attachment(s) failed: {}", report.failed, ATTACHMENTS_UNSUPPORTED);
        }

        let data = progress(adapter);
        adapter
            .emit(ExtractorEventType::ExtractionAttachmentsDone, data)
            .await
    }

    async fn on_timeout(&self, adapter: &mut WorkerAdapter<ExtractorState>) -> Result<()> {
        let data = progress(adapter);
        adapter
            .emit(ExtractorEventType::ExtractionAttachmentsProgress, data)
            .await
    }
}

fn progress(adapter: &WorkerAdapter<ExtractorState>) -> EventData {
    EventData::loading(adapter.reports().to_vec(), adapter.processed_files().to_vec())
}

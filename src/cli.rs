//! CLI helper functions

use crate::{
    adapter::{Emitter, Event, ExtractorState},
    archive::{ArchiveReader, ArchiveWorkspace, WorkspaceOptions, validate_layout},
    config::ConnectorConfig,
    context::ConnectorContext,
    extraction, loading,
    schema::DomainMetadata,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Read events from a file holding one event object or an array of them
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event file: {}", path.display()))?;

    let events = match &value {
        Value::Array(_) => serde_json::from_value::<Vec<Event>>(value),
        _ => serde_json::from_value::<Event>(value).map(|event| vec![event]),
    }
    .with_context(|| format!("Invalid event in {}", path.display()))?;

    Ok(events)
}

/// Load the checkpoint state, starting fresh when the file does not exist
pub fn load_state(path: impl AsRef<Path>) -> Result<ExtractorState> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("No state file at {}, starting fresh", path.display());
        return Ok(ExtractorState::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))
}

pub fn save_state(path: impl AsRef<Path>, state: &ExtractorState) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, serde_json::to_string_pretty(state)?)
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    log::debug!("Saved state to {}", path.display());
    Ok(())
}

/// Run extraction for the events in `event_file`
///
/// Pipeline per data event: MapleClient → Normalizer → Repo (NDJSON).
/// Attachments for the attachments phase are read from
/// `<input_dir>/attachments.ndjson`.
pub async fn run_extract(
    config: &ConnectorConfig,
    event_file: impl AsRef<Path>,
    state_file: Option<&Path>,
    output_dir: Option<&Path>,
    input_dir: Option<&Path>,
    emitter: Arc<dyn Emitter>,
) -> Result<ExtractorState> {
    let events = read_events(event_file)?;
    let inputs = match input_dir {
        Some(dir) => loading::read_inputs(dir)?,
        None => HashMap::new(),
    };
    let state = match state_file {
        Some(path) => load_state(path)?,
        None => ExtractorState::new(),
    };

    let mut context = ConnectorContext::from_config(config)?;
    if let Some(dir) = output_dir {
        log::info!("Writing repositories to {}", dir.display().bright_black());
        context = context.with_output_dir(dir);
    }

    let state = extraction::run(events, &context, state, &inputs, emitter).await?;

    if let Some(path) = state_file {
        save_state(path, &state)?;
    }
    Ok(state)
}

/// Run loading for the events in `event_file` with items from `input_dir`
pub async fn run_load(
    config: &ConnectorConfig,
    event_file: impl AsRef<Path>,
    input_dir: impl AsRef<Path>,
    emitter: Arc<dyn Emitter>,
) -> Result<()> {
    let events = read_events(event_file)?;
    let inputs = loading::read_inputs(&input_dir)?;
    if inputs.is_empty() {
        log::warn!(
            "No input files found in {}",
            input_dir.as_ref().display().bright_black()
        );
    }

    let context = ConnectorContext::from_config(config)?;
    loading::run(events, &context, &inputs, emitter).await
}

/// Counts found in a Maple archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub customers: usize,
    pub articles: usize,
    /// Articles whose content file is missing or empty
    pub missing_content: Vec<String>,
}

/// Extract and validate a local archive
pub fn inspect_archive(path: impl AsRef<Path>, options: &WorkspaceOptions) -> Result<ArchiveSummary> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read archive: {}", path.display()))?;

    let workspace = ArchiveWorkspace::extract(&bytes, options)?;
    validate_layout(workspace.path())?;

    let reader = ArchiveReader::new(workspace.path());
    let customers = reader.customers()?.unwrap_or_default();
    let metadata = reader.article_metadata()?.unwrap_or_default();
    let articles = metadata.len();

    let missing_content = metadata
        .into_iter()
        .filter(|meta| reader.article_text(&meta.content_file).is_empty())
        .map(|meta| meta.content_file)
        .collect();

    Ok(ArchiveSummary {
        customers: customers.len(),
        articles,
        missing_content,
    })
}

/// The domain metadata document, optionally narrowed to a sync unit
pub fn schema(sync_unit: Option<&str>) -> Result<String> {
    let metadata = DomainMetadata::bundled()?.for_sync_unit(sync_unit);
    Ok(serde_json::to_string_pretty(&metadata)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RecordingEmitter;
    use crate::maple::ItemType;
    use tempfile::TempDir;

    #[test]
    fn test_read_single_event_and_array() {
        let temp = TempDir::new().unwrap();
        let single = temp.path().join("event.json");
        std::fs::write(&single, r#"{"payload": {"event_type": "EXTRACTION_METADATA_START"}}"#)
            .unwrap();
        assert_eq!(read_events(&single).unwrap().len(), 1);

        let many = temp.path().join("events.json");
        std::fs::write(
            &many,
            r#"[{"payload": {"event_type": "EXTRACTION_DATA_START"}},
                {"payload": {"event_type": "EXTRACTION_DATA_CONTINUE"}}]"#,
        )
        .unwrap();
        assert_eq!(read_events(&many).unwrap().len(), 2);
    }

    #[test]
    fn test_state_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        assert_eq!(load_state(&path).unwrap(), ExtractorState::new());

        let mut state = ExtractorState::new();
        state.mark_completed(ItemType::Customers);
        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);
    }

    #[tokio::test]
    async fn test_run_extract_reads_attachment_inputs() {
        let temp = TempDir::new().unwrap();
        let events = temp.path().join("events.json");
        std::fs::write(
            &events,
            r#"{"payload": {"event_type": "EXTRACTION_ATTACHMENTS_START"}}"#,
        )
        .unwrap();
        crate::storage::NdjsonWriter::new(temp.path().join("attachments.ndjson"))
            .write(&[serde_json::json!({"id": "att-1"})])
            .unwrap();

        let config = ConnectorConfig {
            source: crate::config::MapleSource::Fixture { dir: None },
            ..Default::default()
        };
        let emitter = RecordingEmitter::new();
        run_extract(
            &config,
            &events,
            None,
            None,
            Some(temp.path()),
            Arc::new(emitter.clone()),
        )
        .await
        .unwrap();

        let reports = emitter.last().unwrap().event_data.reports.unwrap();
        assert_eq!(reports[0].item_type, "attachments");
        assert_eq!(reports[0].failed, 1);
    }

    #[test]
    fn test_inspect_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("maple.zip");
        std::fs::write(
            &archive,
            crate::archive::build_archive(&[
                ("customers.json", "[]"),
                (
                    "maple_kb/articles.json",
                    r#"[{"id":"kb-1","created_date":"a","modified_date":"b","title":"T","content_file":"lost.md"}]"#,
                ),
            ]),
        )
        .unwrap();

        let options = WorkspaceOptions::new(Some(temp.path().to_path_buf()), false);
        let summary = inspect_archive(&archive, &options).unwrap();
        assert_eq!(summary.customers, 0);
        assert_eq!(summary.articles, 1);
        assert_eq!(summary.missing_content, vec!["lost.md".to_string()]);
    }

    #[test]
    fn test_schema_output() {
        let schema: Value = serde_json::from_str(&schema(Some("customers")).unwrap()).unwrap();
        assert!(schema["record_types"].get("customers").is_some());
        assert!(schema["record_types"].get("maple_kb").is_none());
    }
}

//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use eyre::Result;
use maple_snapin::archive::WorkspaceOptions;
use maple_snapin::client::ArtifactStore;
use maple_snapin::{ConnectorContext, Event, EventType};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const ARTIFACT_ID: &str = "don:core:dvrv-us-1:devo/1:artifact/42";

pub const CUSTOMERS: &str = r#"[
    {"id":"c-1","created_date":"2024-01-01T00:00:00Z","modified_date":"2024-01-05T00:00:00Z","name":"Ada Lovelace","email":"ada@example.com","company":"Engines"},
    {"id":"c-2","created_date":"2024-02-01T00:00:00Z","modified_date":"2024-02-05T00:00:00Z","name":"Grace Hopper","email":"grace@example.com"}
]"#;

pub const ARTICLES: &str = r#"[
    {"id":"kb-1","created_date":"2024-03-01T00:00:00Z","modified_date":"2024-03-02T00:00:00Z","title":"Intro","content_file":"intro.md","category":"guides"},
    {"id":"kb-2","created_date":"2024-03-03T00:00:00Z","modified_date":"2024-03-04T00:00:00Z","title":"Lost","content_file":"missing.md"},
    {"id":"kb-3","created_date":"2024-03-05T00:00:00Z","modified_date":"2024-03-06T00:00:00Z","title":"Nested","content_file":"faq/billing.md"}
]"#;

/// Build an in-memory ZIP archive from `(path, contents)` pairs
pub fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (path, contents) in entries {
        zip.start_file(*path, SimpleFileOptions::default()).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A complete archive: two customers, three articles, one text file missing
pub fn maple_archive() -> Vec<u8> {
    build_archive(&[
        ("customers.json", CUSTOMERS),
        ("maple_kb/articles.json", ARTICLES),
        ("maple_kb/intro.md", "# Intro\n\nWelcome."),
        ("maple_kb/faq/billing.md", "Billing answers."),
    ])
}

/// Artifact store serving one archive from memory
pub struct MemoryStore {
    archive: Vec<u8>,
    keyring_reference: Option<String>,
    delay: Duration,
    fetches: AtomicUsize,
}

impl MemoryStore {
    pub fn new(archive: Vec<u8>) -> Self {
        Self {
            archive,
            keyring_reference: None,
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_keyring_reference(mut self, reference: &str) -> Self {
        self.keyring_reference = Some(reference.to_string());
        self
    }

    /// Delay each fetch, to overlap concurrent callers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn fetch_artifact(&self, id: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if id.is_empty() {
            eyre::bail!("empty artifact id");
        }
        Ok(self.archive.clone())
    }

    async fn lookup_archive_reference(&self, _external_system: &str) -> Result<Option<String>> {
        Ok(self.keyring_reference.clone())
    }
}

/// Archive-backed context extracting under `work_dir`
pub fn archive_context(store: Arc<MemoryStore>, work_dir: &TempDir) -> ConnectorContext {
    ConnectorContext::new()
        .with_artifact_store(store)
        .with_workspace_options(WorkspaceOptions::new(Some(work_dir.path().to_path_buf()), false))
}

/// Event referencing [`ARTIFACT_ID`] through the connection configuration
pub fn archive_event(event_type: EventType) -> Event {
    Event::new(event_type).with_connection_field("key", ARTIFACT_ID)
}

//! Per-run connector context
//!
//! Holds what every worker needs besides its event: where Maple data comes
//! from, where archives are extracted, the time budget, and where
//! repositories are written.

use crate::adapter::Event;
use crate::archive::WorkspaceOptions;
use crate::client::ArtifactStore;
use crate::config::{ConnectorConfig, DEFAULT_TIMEOUT_SECS, MapleSource};
use crate::maple::{MapleClient, MapleFixture};

use eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
enum Source {
    Archive,
    Fixture(Arc<MapleFixture>),
}

#[derive(Clone)]
pub struct ConnectorContext {
    source: Source,
    workspace: WorkspaceOptions,
    budget: Duration,
    output_dir: Option<PathBuf>,
    store: Option<Arc<dyn ArtifactStore>>,
}

impl Default for ConnectorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorContext {
    /// Archive-backed context with default settings
    pub fn new() -> Self {
        Self {
            source: Source::Archive,
            workspace: WorkspaceOptions::default(),
            budget: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_dir: None,
            store: None,
        }
    }

    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let source = match &config.source {
            MapleSource::Archive => Source::Archive,
            MapleSource::Fixture { dir: Some(dir) } => {
                log::info!("Using Maple fixture from {}", dir.display());
                Source::Fixture(Arc::new(MapleFixture::from_dir(dir)?))
            }
            MapleSource::Fixture { dir: None } => {
                log::info!("Using bundled Maple fixture");
                Source::Fixture(Arc::new(MapleFixture::bundled()?))
            }
        };

        Ok(Self {
            source,
            workspace: WorkspaceOptions::new(config.work_dir.clone(), config.keep_workdir),
            budget: config.timeout,
            output_dir: None,
            store: None,
        })
    }

    /// Answer every query from `fixture`
    pub fn with_fixture(mut self, fixture: MapleFixture) -> Self {
        self.source = Source::Fixture(Arc::new(fixture));
        self
    }

    /// Fetch archives from `store` instead of the platform named by the event
    pub fn with_artifact_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_workspace_options(mut self, options: WorkspaceOptions) -> Self {
        self.workspace = options;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Build the Maple client for one event
    pub fn maple_client(&self, event: &Event) -> Result<MapleClient> {
        match &self.source {
            Source::Fixture(fixture) => Ok(MapleClient::from_fixture(fixture.clone())),
            Source::Archive => match &self.store {
                Some(store) => MapleClient::from_event(event, store.clone(), self.workspace.clone()),
                None => MapleClient::for_platform(event, self.workspace.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::EventType;

    #[tokio::test]
    async fn test_fixture_context_ignores_event() {
        let context = ConnectorContext::new().with_fixture(MapleFixture::bundled().unwrap());
        let client = context
            .maple_client(&Event::new(EventType::ExtractionDataStart))
            .unwrap();
        assert_eq!(client.list_customers().await.unwrap().len(), 3);
    }

    #[test]
    fn test_archive_context_defers_token_check() {
        let context = ConnectorContext::new();
        let event = Event::new(EventType::ExtractionDataStart).with_connection_field("key", "don:a");
        assert!(context.maple_client(&event).is_ok());

        let event = Event::new(EventType::ExtractionDataStart);
        let err = context.maple_client(&event).err().unwrap();
        assert!(err.to_string().contains("ZIP artifact ID is required"));
    }

    #[test]
    fn test_from_config() {
        let config = ConnectorConfig {
            source: MapleSource::Fixture { dir: None },
            timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let context = ConnectorContext::from_config(&config).unwrap();
        assert_eq!(context.budget(), Duration::from_secs(5));
        assert!(context.output_dir().is_none());
    }
}

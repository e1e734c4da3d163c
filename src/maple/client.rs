//! Access to Maple data
//!
//! [`MapleClient`] answers the two queries extraction needs and exposes the
//! outbound operations used by loading. It is backed either by an in-memory
//! [`MapleFixture`] or by an uploaded archive.
//!
//! The archive variant defers the download until the first query. Every
//! query shares that single initialization, including its failure.

use super::{
    ArchiveReference, ExternalCustomer, ExternalMapleKb, MapleFixture, missing_reference_error,
    resolve_archive_reference,
};
use crate::adapter::{Event, LoadingResponse};
use crate::archive::{ArchiveReader, ArchiveWorkspace, WorkspaceOptions, validate_layout};
use crate::client::{ArtifactStore, PlatformClient};

use eyre::{Result, eyre};
use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Failure reported for every attachment; Maple exports carry none
pub const ATTACHMENTS_UNSUPPORTED: &str = "Attachments not supported for Maple data.";

pub struct MapleClient {
    backend: Backend,
}

enum Backend {
    Fixture(Arc<MapleFixture>),
    Archive(ArchiveBackend),
}

struct ArchiveBackend {
    event: Event,
    reference: ArchiveReference,
    /// Built from the event on first use when absent
    store: Option<Arc<dyn ArtifactStore>>,
    options: WorkspaceOptions,
    workspace: OnceCell<Result<ArchiveWorkspace, String>>,
}

impl MapleClient {
    /// Client answering from an in-memory fixture
    pub fn from_fixture(fixture: Arc<MapleFixture>) -> Self {
        Self {
            backend: Backend::Fixture(fixture),
        }
    }

    /// Client backed by the archive referenced by `event`, fetched from `store`
    ///
    /// Nothing is downloaded here; the archive is fetched, extracted, and
    /// validated on the first query.
    ///
    /// # Errors
    /// Returns an error if the event carries no archive reference and names
    /// no external system to look one up for.
    pub fn from_event(
        event: &Event,
        store: Arc<dyn ArtifactStore>,
        options: WorkspaceOptions,
    ) -> Result<Self> {
        Self::archive(event, Some(store), options)
    }

    /// Client backed by the archive referenced by `event`, fetched from the
    /// platform named by the event
    ///
    /// The platform credentials are only required once the archive is first
    /// queried.
    ///
    /// # Errors
    /// Same as [`MapleClient::from_event`].
    pub fn for_platform(event: &Event, options: WorkspaceOptions) -> Result<Self> {
        Self::archive(event, None, options)
    }

    fn archive(
        event: &Event,
        store: Option<Arc<dyn ArtifactStore>>,
        options: WorkspaceOptions,
    ) -> Result<Self> {
        let reference = resolve_archive_reference(event)?;
        Ok(Self {
            backend: Backend::Archive(ArchiveBackend {
                event: event.clone(),
                reference,
                store,
                options,
                workspace: OnceCell::new(),
            }),
        })
    }

    pub async fn list_customers(&self) -> Result<Vec<ExternalCustomer>> {
        let archive = match &self.backend {
            Backend::Fixture(fixture) => return Ok(fixture.customers().to_vec()),
            Backend::Archive(archive) => archive,
        };

        let reader = archive.reader().await?;
        let customers = reader.customers()?.ok_or_else(|| {
            eyre!(
                "customers.json not found in ZIP file. Please ensure customers.json exists in the root of the ZIP file."
            )
        })?;
        log::debug!("Read {} customer(s)", customers.len());
        Ok(customers)
    }

    /// List articles with their content
    ///
    /// An article whose text file is missing is returned with placeholder
    /// content.
    pub async fn list_articles(&self) -> Result<Vec<ExternalMapleKb>> {
        let archive = match &self.backend {
            Backend::Fixture(fixture) => return Ok(fixture.articles().to_vec()),
            Backend::Archive(archive) => archive,
        };

        let reader = archive.reader().await?;
        let metadata = reader.article_metadata()?.ok_or_else(|| {
            eyre!(
                "articles.json not found in ZIP file. Please ensure maple_kb/articles.json exists in the ZIP file."
            )
        })?;

        let articles = metadata
            .into_iter()
            .map(|meta| {
                let text = reader.article_text(&meta.content_file);
                ExternalMapleKb::from_metadata(meta, text)
            })
            .collect::<Vec<_>>();
        log::debug!("Read {} article(s)", articles.len());
        Ok(articles)
    }

    // Outbound writes are not supported by Maple yet.

    pub async fn create_customer(&self, customer: &ExternalCustomer) -> LoadingResponse {
        log::debug!("create_customer({})", customer.id);
        LoadingResponse::failure("Could not create customer in external system.")
    }

    pub async fn update_customer(&self, customer: &ExternalCustomer) -> LoadingResponse {
        log::debug!("update_customer({})", customer.id);
        LoadingResponse::failure("Could not update customer in external system.")
    }

    pub async fn create_article(&self, article: &ExternalMapleKb) -> LoadingResponse {
        log::debug!("create_article({})", article.id);
        LoadingResponse::failure("Could not create Maple KB article in external system.")
    }

    pub async fn update_article(&self, article: &ExternalMapleKb) -> LoadingResponse {
        log::debug!("update_article({})", article.id);
        LoadingResponse::failure("Could not update Maple KB article in external system.")
    }
}

impl ArchiveBackend {
    async fn reader(&self) -> Result<ArchiveReader> {
        let outcome = self
            .workspace
            .get_or_init(|| async {
                self.initialize().await.map_err(|e| {
                    log::error!("Error initializing ZIP file: {:#}", e);
                    format!("{:#}", e)
                })
            })
            .await;

        match outcome {
            Ok(workspace) => Ok(ArchiveReader::new(workspace.path())),
            Err(message) => Err(eyre!("Failed to initialize ZIP file: {}", message)),
        }
    }

    async fn initialize(&self) -> Result<ArchiveWorkspace> {
        let store: Arc<dyn ArtifactStore> = match &self.store {
            Some(store) => store.clone(),
            None => Arc::new(PlatformClient::from_event(&self.event)?),
        };

        let artifact_id = match &self.reference {
            ArchiveReference::Artifact(id) => id.clone(),
            ArchiveReference::Keyring { external_system } => {
                log::info!(
                    "Attempting to fetch keyring for external system: {}",
                    external_system.cyan()
                );
                match store.lookup_archive_reference(external_system).await {
                    Ok(Some(id)) => id,
                    Ok(None) => return Err(missing_reference_error(&self.event, true)),
                    Err(e) => {
                        log::error!("Error fetching keyring from API: {:#}", e);
                        return Err(missing_reference_error(&self.event, true));
                    }
                }
            }
        };

        let bytes = store.fetch_artifact(&artifact_id).await?;
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || {
            let workspace = ArchiveWorkspace::extract(&bytes, &options)?;
            validate_layout(workspace.path())?;
            Ok::<_, eyre::Report>(workspace)
        })
        .await?
    }
}

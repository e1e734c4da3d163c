use async_trait::async_trait;
use eyre::Result;

/// Source of archive bytes and of archive references stored in keyrings
///
/// The Maple client depends only on this trait; [`PlatformClient`](super::PlatformClient)
/// implements it against the platform API.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Fetch the contents of an uploaded artifact
    async fn fetch_artifact(&self, id: &str) -> Result<Vec<u8>>;

    /// Find an archive reference in the keyring of an external system
    ///
    /// Returns `None` when no keyring exists or it holds no reference.
    async fn lookup_archive_reference(&self, external_system: &str) -> Result<Option<String>>;
}

//! Scoped working directory for an extracted archive

use super::extract_archive;

use eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static WORKSPACE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where archives are extracted and whether they outlive the invocation
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    /// Parent directory for workspaces (defaults to the OS temp directory)
    pub base_dir: Option<PathBuf>,
    /// Keep the extracted files after the workspace is dropped
    pub keep: bool,
}

impl WorkspaceOptions {
    pub fn new(base_dir: Option<PathBuf>, keep: bool) -> Self {
        Self { base_dir, keep }
    }
}

/// A uniquely named `maple-data-*` directory holding one extracted archive
///
/// The directory is removed when the workspace is dropped unless
/// [`WorkspaceOptions::keep`] was set.
#[derive(Debug)]
pub struct ArchiveWorkspace {
    path: PathBuf,
    keep: bool,
}

impl ArchiveWorkspace {
    /// Extract `bytes` into a fresh workspace
    pub fn extract(bytes: &[u8], options: &WorkspaceOptions) -> Result<Self> {
        let base = options
            .base_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let workspace = Self {
            path: base.join(unique_name()),
            keep: options.keep,
        };

        // Constructed before extracting so a partial extraction is cleaned up too
        extract_archive(bytes, &workspace.path)?;
        log::info!("ZIP file extracted to: {}", workspace.path.display());

        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArchiveWorkspace {
    fn drop(&mut self) {
        if self.keep {
            log::info!("Keeping extracted archive at {}", self.path.display());
            return;
        }
        if self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                log::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

fn unique_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = WORKSPACE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("maple-data-{}-{}-{}", millis, std::process::id(), seq)
}

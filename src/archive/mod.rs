//! Maple export archives
//!
//! Extracts a ZIP archive into a scoped working directory and exposes typed
//! readers for the customer list, the article metadata list, and per-article
//! text content.

mod extract;
mod reader;
mod workspace;

pub use extract::extract_archive;
pub use reader::{ARTICLES_FILE, ArchiveReader, CUSTOMERS_FILE, KB_DIR};
pub use workspace::{ArchiveWorkspace, WorkspaceOptions};

use eyre::Result;
use std::path::Path;

/// Check that an extracted archive at `path` has the expected layout
pub fn validate_layout(path: impl AsRef<Path>) -> Result<()> {
    ArchiveReader::new(path).validate()
}

/// Build an in-memory ZIP archive from `(path, contents)` pairs
#[cfg(test)]
pub(crate) fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, contents) in entries {
        zip.start_file(*path, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

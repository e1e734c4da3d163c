//! ZIP extraction to a working directory

use eyre::{Context, Result};
use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

/// Extract every entry of a ZIP archive into `dest`.
///
/// The destination is created if absent and existing files are overwritten.
/// Entries whose names would escape `dest` and macOS resource-fork entries
/// are skipped.
///
/// # Errors
/// Returns an error if the bytes are not a valid ZIP archive or a file
/// cannot be written.
pub fn extract_archive(bytes: &[u8], dest: impl AsRef<Path>) -> Result<PathBuf> {
    let dest = dest.as_ref();
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create extraction directory: {}", dest.display()))?;

    let mut archive = ZipArchive::new(Cursor::new(bytes)).context("Failed to read ZIP archive")?;
    let mut written = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read archive entry #{}", i))?;

        let Some(rel_path) = entry.enclosed_name() else {
            log::warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        if is_resource_fork(&rel_path) {
            continue;
        }

        let out_path = dest.join(&rel_path);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create directory: {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut outfile = fs::File::create(&out_path)
            .with_context(|| format!("Failed to create file: {}", out_path.display()))?;
        std::io::copy(&mut entry, &mut outfile)
            .with_context(|| format!("Failed to write file: {}", out_path.display()))?;
        written += 1;
    }

    log::debug!("Extracted {} file(s) to {}", written, dest.display());
    Ok(dest.to_path_buf())
}

fn is_resource_fork(path: &Path) -> bool {
    matches!(
        path.components().next(),
        Some(Component::Normal(head)) if head == "__MACOSX"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::build_archive;
    use tempfile::TempDir;

    #[test]
    fn test_extract_nested_files() {
        let temp = TempDir::new().unwrap();
        let bytes = build_archive(&[
            ("customers.json", "[]"),
            ("maple_kb/articles.json", "[]"),
            ("maple_kb/intro.md", "# Intro"),
        ]);

        let root = extract_archive(&bytes, temp.path().join("out")).unwrap();

        assert_eq!(root, temp.path().join("out"));
        assert!(root.join("customers.json").exists());
        assert_eq!(
            fs::read_to_string(root.join("maple_kb/intro.md")).unwrap(),
            "# Intro"
        );
    }

    #[test]
    fn test_extract_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("customers.json"), "stale").unwrap();

        let bytes = build_archive(&[("customers.json", "[]")]);
        extract_archive(&bytes, temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("customers.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_skips_resource_forks() {
        let temp = TempDir::new().unwrap();
        let bytes = build_archive(&[
            ("customers.json", "[]"),
            ("__MACOSX/._customers.json", "junk"),
        ]);

        extract_archive(&bytes, temp.path()).unwrap();
        assert!(!temp.path().join("__MACOSX").exists());
    }

    #[test]
    fn test_invalid_archive() {
        let temp = TempDir::new().unwrap();
        let result = extract_archive(b"definitely not a zip", temp.path());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read ZIP archive")
        );
    }
}

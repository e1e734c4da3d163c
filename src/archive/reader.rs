//! Typed readers over an extracted Maple archive
//!
//! Layout:
//! ```text
//! customers.json
//! maple_kb/
//!   articles.json
//!   <content files referenced by articles.json>
//! ```

use crate::maple::{ArticleMetadata, ExternalCustomer};

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Component, Path, PathBuf};

pub const CUSTOMERS_FILE: &str = "customers.json";
pub const KB_DIR: &str = "maple_kb";
pub const ARTICLES_FILE: &str = "articles.json";

/// Reads the three logical resources of an extracted archive
///
/// Missing `customers.json` or `articles.json` is reported as `None` so the
/// caller can decide how to fail; a missing article text file degrades to an
/// empty string.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    root: PathBuf,
}

impl ArchiveReader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn customers_path(&self) -> PathBuf {
        self.root.join(CUSTOMERS_FILE)
    }

    pub fn kb_dir(&self) -> PathBuf {
        self.root.join(KB_DIR)
    }

    pub fn articles_path(&self) -> PathBuf {
        self.kb_dir().join(ARTICLES_FILE)
    }

    /// Read `customers.json`
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read or parsed.
    pub fn customers(&self) -> Result<Option<Vec<ExternalCustomer>>> {
        read_json_list(&self.customers_path())
    }

    /// Read `maple_kb/articles.json`
    ///
    /// # Errors
    /// Returns an error only if the file exists but cannot be read or parsed.
    pub fn article_metadata(&self) -> Result<Option<Vec<ArticleMetadata>>> {
        read_json_list(&self.articles_path())
    }

    /// Read an article's text file from `maple_kb/`.
    ///
    /// Returns an empty string when the file is absent, unreadable, or the
    /// reference points outside `maple_kb/`.
    pub fn article_text(&self, filename: &str) -> String {
        let relative = Path::new(filename);
        if filename.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            log::warn!("Ignoring article content reference outside {}: {}", KB_DIR, filename);
            return String::new();
        }

        let path = self.kb_dir().join(relative);
        if !path.is_file() {
            return String::new();
        }

        match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error reading markdown file {}: {}", filename, e);
                String::new()
            }
        }
    }

    /// Check that the required resources are present, failing on the first
    /// one missing.
    pub fn validate(&self) -> Result<()> {
        let customers = self.customers_path().is_file();
        let kb_dir = self.kb_dir().is_dir();
        let articles = self.articles_path().is_file();

        log::debug!("{} exists: {}", CUSTOMERS_FILE, customers);
        log::debug!("{} directory exists: {}", KB_DIR, kb_dir);
        log::debug!("{}/{} exists: {}", KB_DIR, ARTICLES_FILE, articles);

        if !customers {
            eyre::bail!("{} not found in ZIP file root", CUSTOMERS_FILE);
        }
        if !kb_dir {
            eyre::bail!("{} directory not found in ZIP file", KB_DIR);
        }
        if !articles {
            eyre::bail!("{}/{} not found in ZIP file", KB_DIR, ARTICLES_FILE);
        }
        Ok(())
    }
}

fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let items = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    Ok(Some(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_layout(root: &Path) {
        fs::create_dir_all(root.join(KB_DIR)).unwrap();
        fs::write(
            root.join(CUSTOMERS_FILE),
            r#"[{"id":"c-1","created_date":"2024-01-01","modified_date":"2024-01-02","name":"Ada","email":"ada@example.com","company":"Analytical"}]"#,
        )
        .unwrap();
        fs::write(
            root.join(KB_DIR).join(ARTICLES_FILE),
            r#"[{"id":"kb-1","created_date":"2024-01-01","modified_date":"2024-01-02","title":"Intro","content_file":"intro.md"}]"#,
        )
        .unwrap();
        fs::write(root.join(KB_DIR).join("intro.md"), "# Intro").unwrap();
    }

    #[test]
    fn test_read_resources() {
        let temp = TempDir::new().unwrap();
        write_layout(temp.path());
        let reader = ArchiveReader::new(temp.path());

        let customers = reader.customers().unwrap().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].company.as_deref(), Some("Analytical"));

        let articles = reader.article_metadata().unwrap().unwrap();
        assert_eq!(articles[0].content_file, "intro.md");
        assert_eq!(reader.article_text("intro.md"), "# Intro");
        assert!(reader.validate().is_ok());
    }

    #[test]
    fn test_missing_files_are_none() {
        let temp = TempDir::new().unwrap();
        let reader = ArchiveReader::new(temp.path());

        assert!(reader.customers().unwrap().is_none());
        assert!(reader.article_metadata().unwrap().is_none());
        assert_eq!(reader.article_text("intro.md"), "");
    }

    #[test]
    fn test_malformed_customers_is_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CUSTOMERS_FILE), "{ not json").unwrap();

        let result = ArchiveReader::new(temp.path()).customers();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_text_outside_kb_dir_is_ignored() {
        let temp = TempDir::new().unwrap();
        write_layout(temp.path());
        let reader = ArchiveReader::new(temp.path());

        assert_eq!(reader.article_text("../customers.json"), "");
        assert_eq!(reader.article_text("/etc/passwd"), "");
        assert_eq!(reader.article_text(""), "");
    }

    #[test]
    fn test_validate_reports_first_missing_resource() {
        let temp = TempDir::new().unwrap();
        let reader = ArchiveReader::new(temp.path());
        let err = reader.validate().unwrap_err().to_string();
        assert!(err.contains("customers.json"));

        fs::write(temp.path().join(CUSTOMERS_FILE), "[]").unwrap();
        let err = reader.validate().unwrap_err().to_string();
        assert!(err.contains("maple_kb directory"));

        fs::create_dir_all(temp.path().join(KB_DIR)).unwrap();
        let err = reader.validate().unwrap_err().to_string();
        assert!(err.contains("maple_kb/articles.json"));
    }
}

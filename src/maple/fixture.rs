//! Static Maple data loaded into memory

use super::{ArticleMetadata, ExternalCustomer, ExternalMapleKb};
use crate::archive::{ARTICLES_FILE, ArchiveReader, CUSTOMERS_FILE, KB_DIR};

use eyre::{Context, Result, eyre};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_CUSTOMERS: &str = include_str!("../../fixtures/maple/customers.json");
const BUNDLED_ARTICLES: &str = include_str!("../../fixtures/maple/maple_kb/articles.json");
const BUNDLED_TEXTS: [(&str, &str); 3] = [
    (
        "getting-started.md",
        include_str!("../../fixtures/maple/maple_kb/getting-started.md"),
    ),
    (
        "billing-faq.md",
        include_str!("../../fixtures/maple/maple_kb/billing-faq.md"),
    ),
    (
        "troubleshooting.md",
        include_str!("../../fixtures/maple/maple_kb/troubleshooting.md"),
    ),
];

/// Customers and articles held in memory
///
/// Articles are joined with their text when the fixture is built, so a
/// missing text file shows up as placeholder content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapleFixture {
    customers: Vec<ExternalCustomer>,
    articles: Vec<ExternalMapleKb>,
}

impl MapleFixture {
    pub fn new(customers: Vec<ExternalCustomer>, articles: Vec<ExternalMapleKb>) -> Self {
        Self {
            customers,
            articles,
        }
    }

    /// The fixture compiled into the binary
    pub fn bundled() -> Result<Self> {
        let customers: Vec<ExternalCustomer> =
            serde_json::from_str(BUNDLED_CUSTOMERS).context("Failed to parse bundled customers")?;
        let metadata: Vec<ArticleMetadata> =
            serde_json::from_str(BUNDLED_ARTICLES).context("Failed to parse bundled articles")?;
        let texts: HashMap<&str, &str> = BUNDLED_TEXTS.into_iter().collect();

        let articles = metadata
            .into_iter()
            .map(|meta| {
                let text = texts
                    .get(meta.content_file.as_str())
                    .map(|t| t.to_string())
                    .unwrap_or_default();
                ExternalMapleKb::from_metadata(meta, text)
            })
            .collect();

        Ok(Self::new(customers, articles))
    }

    /// Load a fixture from a directory laid out like an extracted archive
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let reader = ArchiveReader::new(path.as_ref());
        log::debug!("Loading fixture from {}", reader.root().display());

        let customers = reader
            .customers()?
            .ok_or_else(|| eyre!("{} not found in {}", CUSTOMERS_FILE, reader.root().display()))?;
        let metadata = reader.article_metadata()?.ok_or_else(|| {
            eyre!(
                "{}/{} not found in {}",
                KB_DIR,
                ARTICLES_FILE,
                reader.root().display()
            )
        })?;

        let articles = metadata
            .into_iter()
            .map(|meta| {
                let text = reader.article_text(&meta.content_file);
                ExternalMapleKb::from_metadata(meta, text)
            })
            .collect();

        Ok(Self::new(customers, articles))
    }

    pub fn customers(&self) -> &[ExternalCustomer] {
        &self.customers
    }

    pub fn articles(&self) -> &[ExternalMapleKb] {
        &self.articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_fixture() {
        let fixture = MapleFixture::bundled().unwrap();

        assert_eq!(fixture.customers().len(), 3);
        assert_eq!(fixture.articles().len(), 3);
        assert!(
            fixture
                .articles()
                .iter()
                .all(|a| !a.content.starts_with("Content not found"))
        );
    }

    #[test]
    fn test_from_dir_with_missing_text() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("customers.json"), "[]").unwrap();
        fs::create_dir(temp.path().join("maple_kb")).unwrap();
        fs::write(
            temp.path().join("maple_kb/articles.json"),
            r#"[{"id":"kb-1","created_date":"a","modified_date":"b","title":"T","content_file":"gone.md"}]"#,
        )
        .unwrap();

        let fixture = MapleFixture::from_dir(temp.path()).unwrap();
        assert!(fixture.customers().is_empty());
        assert_eq!(fixture.articles()[0].content, "Content not found: gone.md");
    }

    #[test]
    fn test_from_dir_requires_customers() {
        let temp = TempDir::new().unwrap();
        let err = MapleFixture::from_dir(temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("customers.json"));
    }
}

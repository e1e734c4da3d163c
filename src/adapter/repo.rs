//! Output repositories for extracted items

use super::NormalizedItem;
use crate::etl::Loader;
use crate::storage::NdjsonWriter;

use eyre::Result;
use serde::Serialize;
use serde_json::Value;

/// A named repository collecting the items pushed for one item type
///
/// With a sink attached, items are appended to an NDJSON file as they are
/// pushed; without one they are counted and discarded.
#[derive(Debug, Clone)]
pub struct Repo {
    item_type: String,
    sink: Option<NdjsonWriter>,
}

impl Repo {
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            sink: None,
        }
    }

    pub fn with_sink(item_type: impl Into<String>, sink: NdjsonWriter) -> Self {
        Self {
            item_type: item_type.into(),
            sink: Some(sink),
        }
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Push items, returning how many were added
    pub fn push<T: Serialize>(&self, items: &[T]) -> Result<usize> {
        if let Some(sink) = &self.sink {
            sink.append(items)?;
        }

        log::debug!("Pushed {} item(s) to repo '{}'", items.len(), self.item_type);
        Ok(items.len())
    }

    /// Drop everything pushed by earlier invocations
    pub fn truncate(&self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.write::<Value>(&[])?;
            log::debug!("Truncated {}", sink.path().display());
        }
        Ok(())
    }
}

impl Loader for Repo {
    type Item = NormalizedItem;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.push(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NdjsonReader;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_push_without_sink_counts() {
        let repo = Repo::new("customers");

        assert_eq!(repo.push(&[json!({"id": "1"}), json!({"id": "2"})]).unwrap(), 2);
        assert_eq!(repo.item_type(), "customers");
        assert!(repo.truncate().is_ok());
    }

    #[tokio::test]
    async fn test_load_appends_to_sink() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maple_kb.ndjson");
        let repo = Repo::with_sink("maple_kb", NdjsonWriter::new(&path));

        let item = |id: &str| NormalizedItem {
            id: id.to_string(),
            created_date: "2024-01-01".to_string(),
            modified_date: "2024-01-02".to_string(),
            data: json!({"title": "Intro"}),
        };
        assert_eq!(repo.load(vec![item("kb-1")]).await.unwrap(), 1);
        assert_eq!(repo.load(vec![item("kb-2")]).await.unwrap(), 1);

        let written = NdjsonReader::new(&path).read_as::<NormalizedItem>().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1].id, "kb-2");
    }

    #[test]
    fn test_truncate_clears_sink() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("customers.ndjson");
        let repo = Repo::with_sink("customers", NdjsonWriter::new(&path));

        repo.push(&[json!({"id": "1"})]).unwrap();
        repo.truncate().unwrap();

        assert!(NdjsonReader::new(&path).read().unwrap().is_empty());
    }
}

//! NDJSON (Newline Delimited JSON) item files
//!
//! Repositories are written as one JSON document per line, and loader input
//! is read back the same way.

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read items from an NDJSON file
#[derive(Debug, Clone)]
pub struct NdjsonReader {
    path: PathBuf,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all non-blank lines as JSON values
    pub fn read(&self) -> Result<Vec<Value>> {
        self.read_as()
    }

    /// Read all non-blank lines as `T`
    pub fn read_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read NDJSON file: {}", self.path.display()))?;

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!("Failed to parse line {} of {}", n + 1, self.path.display())
                })
            })
            .collect()
    }
}

/// Write items to an NDJSON file
#[derive(Debug, Clone)]
pub struct NdjsonWriter {
    path: PathBuf,
}

impl NdjsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file with `items`
    pub fn write<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let mut content = String::new();
        for item in items {
            content.push_str(&serde_json::to_string(item)?);
            content.push('\n');
        }

        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write NDJSON file: {}", self.path.display()))
    }

    /// Append `items`, creating the file if needed
    pub fn append<T: Serialize>(&self, items: &[T]) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open NDJSON file: {}", self.path.display()))?;

        for item in items {
            writeln!(file, "{}", serde_json::to_string(item)?)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_append_creates_and_extends() {
        let temp = TempDir::new().unwrap();
        let writer = NdjsonWriter::new(temp.path().join("customers.ndjson"));

        writer.append(&[json!({"id": "1"})]).unwrap();
        writer.append(&[json!({"id": "2"}), json!({"id": "3"})]).unwrap();

        let items = NdjsonReader::new(writer.path()).read().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["id"], "3");
    }

    #[test]
    fn test_write_replaces() {
        let temp = TempDir::new().unwrap();
        let writer = NdjsonWriter::new(temp.path().join("items.ndjson"));

        writer.append(&[json!({"id": "old"})]).unwrap();
        writer.write(&[json!({"id": "new"})]).unwrap();

        let items = NdjsonReader::new(writer.path()).read().unwrap();
        assert_eq!(items, vec![json!({"id": "new"})]);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.ndjson");
        std::fs::write(&path, "{\"id\":\"1\"}\n\n{oops\n").unwrap();

        let err = NdjsonReader::new(&path).read().unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}

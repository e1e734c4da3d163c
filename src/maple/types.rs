//! Record shapes exported by Maple
//!
//! These mirror the JSON found in a Maple export archive. Articles are split
//! across two sources in the archive: a metadata list and one text file per
//! article, joined by [`ExternalMapleKb::from_metadata`].

use serde::{Deserialize, Serialize};

/// A customer record as listed in `customers.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCustomer {
    pub id: String,
    pub created_date: String,
    pub modified_date: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// An entry of `maple_kb/articles.json`
///
/// `content_file` is relative to the `maple_kb/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub id: String,
    pub created_date: String,
    pub modified_date: String,
    pub title: String,
    pub content_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A knowledge-base article with its text content resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMapleKb {
    pub id: String,
    pub created_date: String,
    pub modified_date: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ExternalMapleKb {
    /// Join article metadata with the text read from its content file.
    ///
    /// Empty text means the file was missing or empty; the article is kept and
    /// its content replaced by a placeholder naming the missing reference.
    pub fn from_metadata(metadata: ArticleMetadata, text: String) -> Self {
        let content = if text.is_empty() {
            log::warn!(
                "Markdown file {} not found in archive or is empty",
                metadata.content_file
            );
            missing_content_placeholder(&metadata.content_file)
        } else {
            text
        };

        Self {
            id: metadata.id,
            created_date: metadata.created_date,
            modified_date: metadata.modified_date,
            title: metadata.title,
            content,
            category: metadata.category,
        }
    }
}

/// Placeholder content for an article whose text file could not be read
pub fn missing_content_placeholder(content_file: &str) -> String {
    format!("Content not found: {}", content_file)
}

/// The two kinds of records this connector extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Customers,
    MapleKb,
}

impl ItemType {
    /// Extraction order
    pub const ALL: [ItemType; 2] = [ItemType::Customers, ItemType::MapleKb];

    /// Item type name used for repositories, reports, and record types
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::MapleKb => "maple_kb",
        }
    }

    /// Identifier of the sync unit advertising this item type
    pub fn sync_unit_id(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::MapleKb => "maple-kb",
        }
    }

    /// Path segment of the public item URL
    pub fn url_segment(&self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::MapleKb => "kb",
        }
    }

    pub fn from_sync_unit_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.sync_unit_id() == id)
    }

    pub fn from_item_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

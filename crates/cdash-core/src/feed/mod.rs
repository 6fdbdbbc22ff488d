//! Feed items and reconciliation.

pub mod reconcile;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use reconcile::merge;

/// A unit of aggregated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFeedItem")]
pub struct FeedItem {
    /// Source-assigned identifier; the only dedup key.
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub link: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Deserialize)]
struct RawFeedItem {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    preview: Option<String>,
}

impl From<RawFeedItem> for FeedItem {
    fn from(raw: RawFeedItem) -> Self {
        Self {
            id: document_id(raw.object_id, raw.id),
            title: raw.title.unwrap_or_default(),
            link: raw.link.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
            preview: raw.preview.filter(|p| !p.trim().is_empty()),
        }
    }
}

/// Picks a document's id. Stored documents carry `_id` and may also carry a
/// virtual `id`; `_id` wins and `id` is only a fallback.
pub(crate) fn document_id(object_id: Option<String>, id: Option<String>) -> String {
    object_id
        .filter(|v| !v.is_empty())
        .or(id)
        .unwrap_or_default()
}

/// Aggregation sources the API can pull from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Reddit,
    Linkedin,
}

impl FeedSource {
    /// Path segment used by `/feed/aggregate/{source}`.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedSource::Reddit => "reddit",
            FeedSource::Linkedin => "linkedin",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FeedSource::Reddit => "Reddit",
            FeedSource::Linkedin => "LinkedIn",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_feed_item_reads_mongo_id() {
        let item: FeedItem = serde_json::from_value(json!({
            "_id": "f1",
            "title": "Post",
            "link": "https://reddit.com/r/rust/1",
            "source": "Reddit",
            "createdAt": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(item.id, "f1");
        assert_eq!(item.preview, None);
    }

    #[test]
    fn test_feed_item_accepts_plain_id_and_missing_fields() {
        let item: FeedItem = serde_json::from_value(json!({ "id": "f2" })).unwrap();
        assert_eq!(item.id, "f2");
        assert!(item.title.is_empty());

        let no_id: FeedItem = serde_json::from_value(json!({ "title": "t" })).unwrap();
        assert!(no_id.id.is_empty());
    }

    #[test]
    fn test_feed_item_with_both_id_forms() {
        let item: FeedItem =
            serde_json::from_value(json!({ "_id": "f1", "id": "f1", "title": "t" })).unwrap();
        assert_eq!(item.id, "f1");
        assert_eq!(item.title, "t");

        let item: FeedItem =
            serde_json::from_value(json!({ "_id": "f1", "id": "virtual" })).unwrap();
        assert_eq!(item.id, "f1");
    }

    #[test]
    fn test_feed_item_tolerates_nulls() {
        let item: FeedItem =
            serde_json::from_value(json!({ "_id": "f3", "title": null, "preview": "" })).unwrap();
        assert!(item.title.is_empty());
        assert_eq!(item.preview, None);
    }

    #[test]
    fn test_feed_source_names() {
        assert_eq!(FeedSource::Linkedin.as_str(), "linkedin");
        assert_eq!(FeedSource::Linkedin.display_name(), "LinkedIn");
    }
}

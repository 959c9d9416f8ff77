use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One indexed title extracted from a catalog page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,

    /// Driver that produced this entry
    pub driver_id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,

    /// Absolute cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    /// Absolute URL of the entry's own page; never empty
    pub source_url: String,

    pub metadata: EntryMetadata,

    #[serde(default)]
    pub sub_entries: Vec<SubEntry>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Extraction provenance plus free-form extras
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub extracted_at: DateTime<Utc>,
    pub driver_version: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EntryMetadata {
    pub fn new(extracted_at: DateTime<Utc>, driver_version: impl Into<String>) -> Self {
        Self {
            extracted_at,
            driver_version: driver_version.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// One episode (or other unit) of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubEntry {
    pub id: String,

    /// Order within the entry; unique per entry, gaps allowed
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute URL of the sub-entry page; never empty
    pub source_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub watched: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

impl SubEntry {
    pub fn mark_watched(&mut self, at: DateTime<Utc>) {
        self.watched = true;
        self.watched_at = Some(at);
    }

    pub fn mark_unwatched(&mut self) {
        self.watched = false;
        self.watched_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_entry() -> SubEntry {
        SubEntry {
            id: "s1".to_string(),
            number: 3,
            title: None,
            source_url: "https://site.test/ep/3".to_string(),
            thumbnail_url: None,
            watched: false,
            watched_at: None,
        }
    }

    #[test]
    fn test_watched_toggle() {
        let mut ep = sub_entry();
        let at = Utc::now();
        ep.mark_watched(at);
        assert!(ep.watched);
        assert_eq!(ep.watched_at, Some(at));

        ep.mark_unwatched();
        assert!(!ep.watched);
        assert_eq!(ep.watched_at, None);
    }

    #[test]
    fn test_entry_json_shape() {
        let at = Utc::now();
        let mut metadata = EntryMetadata::new(at, "1.0.0");
        metadata
            .extra
            .insert("rating".to_string(), serde_json::json!("PG"));

        let entry = CatalogEntry {
            id: "e1".to_string(),
            driver_id: "d1".to_string(),
            title: "Show".to_string(),
            synopsis: None,
            cover_url: None,
            source_url: "https://site.test/show".to_string(),
            metadata,
            sub_entries: vec![sub_entry()],
            created_at: at,
            updated_at: at,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["sourceUrl"], "https://site.test/show");
        assert_eq!(value["driverId"], "d1");
        assert_eq!(value["metadata"]["driverVersion"], "1.0.0");
        assert_eq!(value["metadata"]["rating"], "PG");
        assert_eq!(value["subEntries"][0]["number"], 3);
        assert!(value.get("synopsis").is_none());

        let back: CatalogEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }
}

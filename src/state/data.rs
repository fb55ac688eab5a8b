/// Shared data structures for the story collection
///
/// `Story` is the record that flows between the store, the viewer and
/// local storage. `StoryArchive` is the versioned envelope written under
/// the storage key.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoryError};

/// Current on-disk archive version
pub const ARCHIVE_VERSION: u32 = 1;

/// A single uploaded image
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Creation timestamp in epoch ms, unique within the collection
    pub id: String,
    /// Self-contained `data:image/jpeg;base64,...` payload
    pub image_data: String,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Set the first time the viewer shows this story, never cleared
    #[serde(default)]
    pub seen: bool,
}

impl Story {
    pub fn new(id: impl Into<String>, image_data: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            image_data: image_data.into(),
            created_at,
            seen: false,
        }
    }

    /// Numeric form of the id, if it was minted from a timestamp
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

/// Versioned envelope around the persisted collection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoryArchive {
    pub version: u32,
    pub stories: Vec<Story>,
}

/// Either layout that may be found under the storage key
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned(StoryArchive),
    /// Bare array written before the archive carried a version
    Legacy(Vec<Story>),
}

impl StoryArchive {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            version: ARCHIVE_VERSION,
            stories,
        }
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON string, accepting the legacy bare array
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: StoredLayout = serde_json::from_str(json)
            .map_err(|e| StoryError::Corrupt(e.to_string()))?;

        match layout {
            StoredLayout::Legacy(stories) => Ok(Self { version: 0, stories }),
            StoredLayout::Versioned(archive) if archive.version > ARCHIVE_VERSION => {
                Err(StoryError::Corrupt(format!(
                    "unsupported archive version {}",
                    archive.version
                )))
            }
            StoredLayout::Versioned(archive) => Ok(archive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let story = Story::new("1", "data:image/jpeg;base64,AAAA", 42);
        let json = serde_json::to_value(&story).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["imageData"], "data:image/jpeg;base64,AAAA");
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["seen"], false);
    }

    #[test]
    fn test_archive_serialization() {
        let mut story = Story::new("1", "data:image/jpeg;base64,AAAA", 1_000);
        story.seen = true;
        let archive = StoryArchive::new(vec![story]);

        let json = archive.to_json().unwrap();
        let restored = StoryArchive::from_json(&json).unwrap();

        assert_eq!(archive, restored);
        assert_eq!(restored.version, ARCHIVE_VERSION);
    }

    #[test]
    fn test_legacy_array_without_seen() {
        let json = r#"[{"id":"7","imageData":"data:,","createdAt":7}]"#;
        let archive = StoryArchive::from_json(json).unwrap();

        assert_eq!(archive.version, 0);
        assert_eq!(archive.stories.len(), 1);
        assert!(!archive.stories[0].seen);
    }

    #[test]
    fn test_future_version_is_corrupt() {
        let json = r#"{"version":99,"stories":[]}"#;
        assert!(matches!(
            StoryArchive::from_json(json),
            Err(StoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        assert!(matches!(
            StoryArchive::from_json("{not json"),
            Err(StoryError::Corrupt(_))
        ));
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(Story::new("1700000000000", "", 0).numeric_id(), Some(1_700_000_000_000));
        assert_eq!(Story::new("abc", "", 0).numeric_id(), None);
    }
}

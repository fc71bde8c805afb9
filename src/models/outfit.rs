//! Outfit records.
//!
//! The serialized shape is the one written under the `closely_outfits` key:
//! camelCase fields with the embedded image stored as `imageBase64`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-created outfit: an embedded image with a title, tags and notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub title: String,
    /// Self-contained image payload, usually a `data:` URL.
    #[serde(rename = "imageBase64")]
    pub image: String,
    /// Ordered, duplicates allowed.
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating an outfit. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewOutfit {
    pub title: String,
    #[serde(rename = "imageBase64")]
    pub image: String,
    pub tags: Vec<String>,
    pub notes: String,
}

impl NewOutfit {
    pub fn new(title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub(crate) fn into_outfit(self, id: String, created_at: DateTime<Utc>) -> Outfit {
        Outfit {
            id,
            title: self.title,
            image: self.image,
            tags: self.tags,
            notes: self.notes,
            created_at,
        }
    }
}

impl Outfit {
    /// Case-insensitive substring match against the title or any tag.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

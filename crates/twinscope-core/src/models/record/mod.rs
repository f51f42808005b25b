mod creator;
mod metadata;
mod organization;

pub use creator::*;
pub use metadata::*;
pub use organization::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ITEM_TYPE: &str = "document";

/// A bibliographic entry in the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordCard {
    pub id: Uuid,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default = "default_item_type")]
    pub item_type: String,

    pub metadata: RecordMetadata,

    #[serde(default)]
    pub creators: Vec<Creator>,

    #[serde(default)]
    pub organization: RecordOrganization,
}

fn default_item_type() -> String {
    DEFAULT_ITEM_TYPE.to_string()
}

impl RecordCard {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            version: 1,
            created_at: now,
            updated_at: now,
            item_type: default_item_type(),
            metadata: RecordMetadata::new(title),
            creators: Vec::new(),
            organization: RecordOrganization::default(),
        }
    }

    /// Read a named field. `itemType` reads the record's item type.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "itemType" => Some(self.item_type.as_str()),
            other => self.metadata.get(other),
        }
    }

    /// Write a named field. `itemType` cannot be cleared.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "itemType" if !value.trim().is_empty() => self.item_type = value.trim().to_string(),
            "itemType" => {}
            other => self.metadata.set(other, value),
        }
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Display name of the first creator.
    pub fn first_author(&self) -> Option<String> {
        self.creators.first().and_then(Creator::display_name)
    }

    pub fn is_trashed(&self) -> bool {
        self.organization.is_trashed()
    }

    /// Record a modification.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Compact view used by listings and JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummaryView {
    pub id: Uuid,
    pub item_type: String,
    pub title: String,
    pub creators: Vec<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub collections: Vec<String>,
    pub trashed: bool,
}

impl From<&RecordCard> for RecordSummaryView {
    fn from(card: &RecordCard) -> Self {
        Self {
            id: card.id,
            item_type: card.item_type.clone(),
            title: card.metadata.title.clone(),
            creators: card.creators.iter().filter_map(Creator::display_name).collect(),
            date: card.metadata.date.clone(),
            tags: card.organization.tags.clone(),
            collections: card.organization.collections.clone(),
            trashed: card.is_trashed(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordOrganization {
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub collections: Vec<String>,

    /// Set when the record sits in the trash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed_at: Option<DateTime<Utc>>,
}

impl RecordOrganization {
    /// Add a tag unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn in_collection(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn is_trashed(&self) -> bool {
        self.trashed_at.is_some()
    }
}

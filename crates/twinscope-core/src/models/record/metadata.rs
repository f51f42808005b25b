use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bibliographic fields of a record, addressed by their external names
/// (`title`, `shortTitle`, `DOI`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_title: Option<String>,

    #[serde(default, rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, rename = "ISBN", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    /// Any other named field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl RecordMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Read a field by external name. `journal` is an alias of
    /// `publicationTitle`.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(self.title.as_str()).filter(|t| !t.is_empty()),
            "shortTitle" => self.short_title.as_deref(),
            "date" => self.date.as_deref(),
            "publisher" => self.publisher.as_deref(),
            "place" => self.place.as_deref(),
            "publicationTitle" | "journal" => self.publication_title.as_deref(),
            "DOI" => self.doi.as_deref(),
            "ISBN" => self.isbn.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Write a field by external name. An empty value clears it.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = Some(value.to_string()).filter(|v| !v.is_empty());
        match name {
            "title" => self.title = value.unwrap_or_default(),
            "shortTitle" => self.short_title = value,
            "date" => self.date = value,
            "publisher" => self.publisher = value,
            "place" => self.place = value,
            "publicationTitle" | "journal" => self.publication_title = value,
            "DOI" => self.doi = value,
            "ISBN" => self.isbn = value,
            other => match value {
                Some(v) => {
                    self.extra.insert(other.to_string(), v);
                }
                None => {
                    self.extra.remove(other);
                }
            },
        }
    }
}

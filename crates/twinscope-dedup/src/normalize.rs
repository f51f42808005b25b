use std::collections::BTreeMap;

use twinscope_core::{Creator, RecordCard};
use unicode_normalization::UnicodeNormalization;

use crate::fields::{NamePart, ScoredField, WeightKey};

/// Characters removed from every compared field.
const STRIPPED: &[char] = &[
    '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`',
    '~', '(', ')',
];

/// Strip punctuation, lowercase and trim. A missing value is empty.
pub fn normalize_field(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Join every creator as "first last" (or the combined name), lowercased.
/// Punctuation is kept.
pub fn normalize_creators(creators: &[Creator]) -> String {
    creators
        .iter()
        .map(Creator::full_name)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_item_type(item_type: &str) -> String {
    item_type.to_lowercase().trim().to_string()
}

/// Name-mode normalization: trim, NFC compose, lowercase.
pub fn normalize_name_part(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().to_lowercase()
}

/// The comparable form of one record, built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    values: BTreeMap<ScoredField, String>,
}

impl NormalizedRecord {
    pub fn from_record(record: &RecordCard) -> Self {
        let values = ScoredField::ALL
            .iter()
            .map(|&field| {
                let value = match field {
                    ScoredField::Creators => normalize_creators(&record.creators),
                    ScoredField::ItemType => normalize_item_type(&record.item_type),
                    other => normalize_field(record.field(other.name())),
                };
                (field, value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, field: ScoredField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }
}

/// The comparable form of one creator in name mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub first: String,
    pub last: String,
    pub full: String,
}

impl NormalizedName {
    pub fn from_creator(creator: &Creator) -> Self {
        let first = normalize_name_part(creator.first_name());
        let last = normalize_name_part(creator.last_name());
        let full = format!("{first} {last}").trim().to_string();
        Self { first, last, full }
    }

    pub fn get(&self, part: NamePart) -> &str {
        match part {
            NamePart::FirstName => &self.first,
            NamePart::LastName => &self.last,
            NamePart::FullName => &self.full,
        }
    }
}

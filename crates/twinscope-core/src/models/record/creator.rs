use serde::{Deserialize, Serialize};

/// How a creator's name is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CreatorName {
    /// Separate given and family name.
    Personal { first: String, last: String },
    /// One combined name, typically an organization.
    Single { name: String },
}

/// A person or organization attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default = "default_creator_type")]
    pub creator_type: String,

    #[serde(flatten)]
    pub name: CreatorName,
}

fn default_creator_type() -> String {
    "author".to_string()
}

impl Creator {
    pub fn personal(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            creator_type: default_creator_type(),
            name: CreatorName::Personal {
                first: first.into(),
                last: last.into(),
            },
        }
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self {
            creator_type: default_creator_type(),
            name: CreatorName::Single { name: name.into() },
        }
    }

    /// Parse "First Middle Last" into a personal creator; the last
    /// whitespace-separated token is the family name.
    pub fn parse_personal(full: &str) -> Self {
        let (first, last) = split_full_name(full);
        Self::personal(first, last)
    }

    /// Given name; empty for single-field creators.
    pub fn first_name(&self) -> &str {
        match &self.name {
            CreatorName::Personal { first, .. } => first,
            CreatorName::Single { .. } => "",
        }
    }

    /// Family name, or the combined name for single-field creators.
    pub fn last_name(&self) -> &str {
        match &self.name {
            CreatorName::Personal { last, .. } => last,
            CreatorName::Single { name } => name,
        }
    }

    /// Case-folded, space-joined concatenation of the available name parts.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
            .to_lowercase()
            .trim()
            .to_string()
    }

    /// Human-readable name, or `None` when every part is blank.
    pub fn display_name(&self) -> Option<String> {
        match &self.name {
            CreatorName::Single { name } => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
            CreatorName::Personal { first, last } => {
                match (first.trim().is_empty(), last.trim().is_empty()) {
                    (false, false) => Some(format!("{} {}", first.trim(), last.trim())),
                    (_, false) => Some(last.trim().to_string()),
                    _ => None,
                }
            }
        }
    }

    /// Replace the name, keeping the creator's storage mode. Single-field
    /// creators receive the space-joined name.
    pub fn rename(&mut self, first: &str, last: &str) {
        match &mut self.name {
            CreatorName::Personal {
                first: f,
                last: l,
            } => {
                *f = first.to_string();
                *l = last.to_string();
            }
            CreatorName::Single { name } => {
                *name = format!("{first} {last}").trim().to_string();
            }
        }
    }
}

/// Split a full name on whitespace: everything but the last token is the
/// given name.
pub fn split_full_name(full: &str) -> (String, String) {
    let parts: Vec<&str> = full.split_whitespace().collect();
    match parts.split_last() {
        Some((last, rest)) => (rest.join(" "), (*last).to_string()),
        None => (String::new(), String::new()),
    }
}

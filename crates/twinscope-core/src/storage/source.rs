use std::fmt;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Creator, RecordCard};

/// Which records a run operates over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelector {
    /// Explicitly selected records.
    Selection(Vec<Uuid>),
    /// Every record in a named collection.
    Collection(String),
    /// Every record matching a saved filter.
    SavedFilter(String),
}

impl ScopeSelector {
    /// Map a scope menu answer ('1' selection, '2' collection, '3' saved
    /// filter) to a selector, given the name or ids to attach to it.
    pub fn from_menu_choice(choice: &str, selection: Vec<Uuid>, name: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Selection(selection)),
            "2" => Some(Self::Collection(name.to_string())),
            "3" => Some(Self::SavedFilter(name.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection(ids) => write!(f, "selection of {} item(s)", ids.len()),
            Self::Collection(name) => write!(f, "collection '{name}'"),
            Self::SavedFilter(name) => write!(f, "saved filter '{name}'"),
        }
    }
}

/// Supplies the working set of records for a run.
pub trait ItemSource {
    /// Resolve a scope to its non-trashed records, in stable order.
    /// Fails with `CoreError::NoItemsFound` when the scope is empty.
    fn working_set(&self, scope: &ScopeSelector) -> Result<Vec<RecordCard>>;
}

/// Persists record changes. Every call is durable once it returns `Ok`.
pub trait MutationSink {
    fn add_marker(&mut self, record: &RecordCard, label: &str) -> Result<()>;

    /// Move a record to the trash. Reversible.
    fn move_to_trash(&mut self, record: &RecordCard) -> Result<()>;

    fn set_field(&mut self, record: &RecordCard, field: &str, value: &str) -> Result<()>;

    fn set_creators(&mut self, record: &RecordCard, creators: &[Creator]) -> Result<()>;
}

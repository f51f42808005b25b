#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};

use twinscope_core::{
    CoreError, Creator, ItemSource, MutationSink, RecordCard, Result as CoreResult, ScopeSelector,
};
use twinscope_dedup::{Interaction, Result};
use uuid::Uuid;

/// A mutation the sink received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddMarker(Uuid, String),
    MoveToTrash(Uuid),
    SetField(Uuid, String, String),
    SetCreators(Uuid, Vec<Creator>),
}

/// In-memory source and sink that records every mutation.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    pub records: Vec<RecordCard>,
    pub calls: Vec<Call>,
    /// Mutations on these records fail.
    pub failing: HashSet<Uuid>,
}

impl MemoryLibrary {
    pub fn new(records: Vec<RecordCard>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// A read-only copy to pass as the item source while `self` is the sink.
    pub fn clone_source(&self) -> Self {
        Self::new(self.records.clone())
    }

    pub fn id(&self, index: usize) -> Uuid {
        self.records[index].id
    }

    pub fn markers(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::AddMarker(..)))
            .collect()
    }

    pub fn trashes(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::MoveToTrash(_)))
            .collect()
    }

    fn check(&self, record: &RecordCard) -> CoreResult<()> {
        if self.failing.contains(&record.id) {
            return Err(CoreError::RecordNotFound(record.id.to_string()));
        }
        Ok(())
    }
}

impl ItemSource for MemoryLibrary {
    fn working_set(&self, scope: &ScopeSelector) -> CoreResult<Vec<RecordCard>> {
        let records: Vec<RecordCard> = match scope {
            ScopeSelector::Selection(ids) if ids.is_empty() => self.records.clone(),
            ScopeSelector::Selection(ids) => self
                .records
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect(),
            ScopeSelector::Collection(name) => self
                .records
                .iter()
                .filter(|r| r.organization.in_collection(name))
                .cloned()
                .collect(),
            ScopeSelector::SavedFilter(name) => {
                return Err(CoreError::FilterNotFound(name.clone()));
            }
        };
        if records.is_empty() {
            return Err(CoreError::NoItemsFound(scope.to_string()));
        }
        Ok(records)
    }
}

impl MutationSink for MemoryLibrary {
    fn add_marker(&mut self, record: &RecordCard, label: &str) -> CoreResult<()> {
        self.check(record)?;
        self.calls.push(Call::AddMarker(record.id, label.to_string()));
        Ok(())
    }

    fn move_to_trash(&mut self, record: &RecordCard) -> CoreResult<()> {
        self.check(record)?;
        self.calls.push(Call::MoveToTrash(record.id));
        Ok(())
    }

    fn set_field(&mut self, record: &RecordCard, field: &str, value: &str) -> CoreResult<()> {
        self.check(record)?;
        self.calls
            .push(Call::SetField(record.id, field.to_string(), value.to_string()));
        Ok(())
    }

    fn set_creators(&mut self, record: &RecordCard, creators: &[Creator]) -> CoreResult<()> {
        self.check(record)?;
        self.calls.push(Call::SetCreators(record.id, creators.to_vec()));
        Ok(())
    }
}

/// Answers prompts from a fixed script. An exhausted script cancels.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    answers: VecDeque<Option<String>>,
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedInteraction {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| Some(a.to_string())).collect(),
            ..Default::default()
        }
    }

    /// Queue a cancelled prompt.
    pub fn then_cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn then(mut self, answer: &str) -> Self {
        self.answers.push_back(Some(answer.to_string()));
        self
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Prompts that previewed a record candidate.
    pub fn previews(&self) -> Vec<&String> {
        self.prompts
            .iter()
            .filter(|p| p.starts_with("Potential duplicate"))
            .collect()
    }

    fn next(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().flatten()
    }
}

impl Interaction for ScriptedInteraction {
    fn prompt_text(&mut self, message: &str, _default: Option<&str>) -> Result<Option<String>> {
        Ok(self.next(message))
    }

    fn prompt_choice(&mut self, message: &str) -> Result<Option<String>> {
        Ok(self.next(message))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

pub fn record(title: &str, authors: &[&str]) -> RecordCard {
    let mut card = RecordCard::new(title);
    card.creators = authors.iter().map(|a| Creator::parse_personal(a)).collect();
    card
}

pub fn everything() -> ScopeSelector {
    ScopeSelector::Selection(Vec::new())
}

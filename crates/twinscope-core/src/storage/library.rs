use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use super::json_cards::{list_cards, load_card_by_id, save_card};
use super::source::{ItemSource, MutationSink, ScopeSelector};
use crate::config::AppConfig;
use crate::error::{CoreError, Result};
use crate::models::{Creator, RecordCard};
use crate::search_dsl::SearchQuery;

/// A directory of JSON record cards plus the saved filters that scope it.
#[derive(Debug, Clone)]
pub struct CardLibrary {
    cards_dir: PathBuf,
    filters: BTreeMap<String, String>,
}

impl CardLibrary {
    pub fn new(cards_dir: impl Into<PathBuf>) -> Self {
        Self {
            cards_dir: cards_dir.into(),
            filters: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cards_dir: config.cards_dir(),
            filters: config.filters.clone(),
        }
    }

    pub fn with_filter(mut self, name: impl Into<String>, query: impl Into<String>) -> Self {
        self.filters.insert(name.into(), query.into());
        self
    }

    pub fn cards_dir(&self) -> &Path {
        &self.cards_dir
    }

    /// All records, optionally including the trashed ones.
    pub fn list(&self, include_trashed: bool) -> Result<Vec<RecordCard>> {
        let mut cards = list_cards(&self.cards_dir)?;
        if !include_trashed {
            cards.retain(|c| !c.is_trashed());
        }
        Ok(cards)
    }

    pub fn get(&self, id: &Uuid) -> Result<RecordCard> {
        load_card_by_id(&self.cards_dir, id)
    }

    pub fn insert(&self, card: &RecordCard) -> Result<()> {
        save_card(&self.cards_dir, card)?;
        Ok(())
    }

    /// Take a record out of the trash.
    pub fn restore(&self, id: &Uuid) -> Result<RecordCard> {
        self.update(id, |card| {
            card.organization.trashed_at = None;
        })
    }

    /// Load the current on-disk state, apply `change`, bump the version and
    /// persist.
    fn update(&self, id: &Uuid, change: impl FnOnce(&mut RecordCard)) -> Result<RecordCard> {
        let mut card = self.get(id)?;
        change(&mut card);
        card.touch();
        save_card(&self.cards_dir, &card)?;
        Ok(card)
    }

    fn resolve(&self, scope: &ScopeSelector) -> Result<Vec<RecordCard>> {
        match scope {
            ScopeSelector::Selection(ids) => {
                let mut cards = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.get(id) {
                        Ok(card) if !card.is_trashed() => {
                            if !cards.iter().any(|c: &RecordCard| c.id == card.id) {
                                cards.push(card);
                            }
                        }
                        Ok(_) => tracing::debug!("skipping trashed record {id}"),
                        Err(CoreError::RecordNotFound(_)) => {
                            tracing::warn!("selected record {id} not found");
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(cards)
            }
            ScopeSelector::Collection(name) => {
                let all = self.list(true)?;
                if !all.iter().any(|c| c.organization.in_collection(name)) {
                    return Err(CoreError::CollectionNotFound(name.clone()));
                }
                Ok(all
                    .into_iter()
                    .filter(|c| !c.is_trashed() && c.organization.in_collection(name))
                    .collect())
            }
            ScopeSelector::SavedFilter(name) => {
                let query = self
                    .filters
                    .get(name)
                    .map(|q| SearchQuery::parse(q))
                    .ok_or_else(|| CoreError::FilterNotFound(name.clone()))?;
                Ok(self
                    .list(false)?
                    .into_iter()
                    .filter(|c| query.matches(c))
                    .collect())
            }
        }
    }
}

impl ItemSource for CardLibrary {
    fn working_set(&self, scope: &ScopeSelector) -> Result<Vec<RecordCard>> {
        let cards = self.resolve(scope)?;
        if cards.is_empty() {
            return Err(CoreError::NoItemsFound(scope.to_string()));
        }
        tracing::info!("resolved {scope} to {} record(s)", cards.len());
        Ok(cards)
    }
}

impl MutationSink for CardLibrary {
    fn add_marker(&mut self, record: &RecordCard, label: &str) -> Result<()> {
        self.update(&record.id, |card| {
            card.organization.add_tag(label);
        })?;
        Ok(())
    }

    fn move_to_trash(&mut self, record: &RecordCard) -> Result<()> {
        self.update(&record.id, |card| {
            if card.organization.trashed_at.is_none() {
                card.organization.trashed_at = Some(Utc::now());
            }
        })?;
        Ok(())
    }

    fn set_field(&mut self, record: &RecordCard, field: &str, value: &str) -> Result<()> {
        if field.trim().is_empty() {
            return Err(CoreError::InvalidField(field.to_string()));
        }
        self.update(&record.id, |card| card.set_field(field, value))?;
        Ok(())
    }

    fn set_creators(&mut self, record: &RecordCard, creators: &[Creator]) -> Result<()> {
        self.update(&record.id, |card| card.creators = creators.to_vec())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded() -> (TempDir, CardLibrary, Vec<RecordCard>) {
        let dir = TempDir::new().unwrap();
        let library = CardLibrary::new(dir.path().join("cards")).with_filter("ml", "#ml");

        let mut a = RecordCard::new("Deep Learning");
        a.organization.collections = vec!["Thesis".to_string()];
        a.organization.tags = vec!["ml".to_string()];
        let mut b = RecordCard::new("Deep learning!");
        b.organization.collections = vec!["Thesis".to_string()];
        let c = RecordCard::new("Pattern Recognition");

        for card in [&a, &b, &c] {
            library.insert(card).unwrap();
        }
        (dir, library, vec![a, b, c])
    }

    #[test]
    fn test_working_set_by_collection() {
        let (_dir, library, cards) = seeded();
        let set = library
            .working_set(&ScopeSelector::Collection("thesis".to_string()))
            .unwrap();
        let ids: Vec<Uuid> = set.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![cards[0].id, cards[1].id]);
    }

    #[test]
    fn test_working_set_by_selection_keeps_order_and_dedups() {
        let (_dir, library, cards) = seeded();
        let scope = ScopeSelector::Selection(vec![cards[2].id, cards[0].id, cards[2].id]);
        let ids: Vec<Uuid> = library.working_set(&scope).unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![cards[2].id, cards[0].id]);
    }

    #[test]
    fn test_working_set_by_saved_filter() {
        let (_dir, library, cards) = seeded();
        let set = library
            .working_set(&ScopeSelector::SavedFilter("ml".to_string()))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id, cards[0].id);
    }

    #[test]
    fn test_unknown_filter_and_collection() {
        let (_dir, library, _) = seeded();
        assert!(matches!(
            library.working_set(&ScopeSelector::SavedFilter("nope".into())),
            Err(CoreError::FilterNotFound(_))
        ));
        assert!(matches!(
            library.working_set(&ScopeSelector::Collection("nope".into())),
            Err(CoreError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_empty_scope_is_no_items_found() {
        let (_dir, library, _) = seeded();
        let err = library
            .working_set(&ScopeSelector::Selection(vec![Uuid::now_v7()]))
            .unwrap_err();
        assert!(matches!(err, CoreError::NoItemsFound(_)));
    }

    #[test]
    fn test_trash_excludes_from_working_set_and_restore_brings_back() {
        let (_dir, mut library, cards) = seeded();
        library.move_to_trash(&cards[1]).unwrap();

        let set = library
            .working_set(&ScopeSelector::Collection("Thesis".into()))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(library.get(&cards[1].id).unwrap().is_trashed());

        library.restore(&cards[1].id).unwrap();
        let set = library
            .working_set(&ScopeSelector::Collection("Thesis".into()))
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_mutations_persist_and_bump_version() {
        let (_dir, mut library, cards) = seeded();
        library.add_marker(&cards[0], "duplicate-pair-1").unwrap();
        library.set_field(&cards[0], "publisher", "MIT Press").unwrap();
        library
            .set_creators(&cards[0], &[Creator::personal("Ian", "Goodfellow")])
            .unwrap();

        let stored = library.get(&cards[0].id).unwrap();
        assert!(stored.organization.tags.contains(&"duplicate-pair-1".to_string()));
        assert_eq!(stored.field("publisher"), Some("MIT Press"));
        assert_eq!(stored.creators.len(), 1);
        assert_eq!(stored.version, 4);
    }

    #[test]
    fn test_mutating_missing_record_fails() {
        let (_dir, mut library, _) = seeded();
        let ghost = RecordCard::new("Ghost");
        assert!(matches!(
            library.move_to_trash(&ghost),
            Err(CoreError::RecordNotFound(_))
        ));
        assert!(matches!(
            library.set_field(&ghost, " ", "x"),
            Err(CoreError::InvalidField(_))
        ));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::models::RecordCard;

/// Save a RecordCard as a JSON file: `{cards_dir}/{id}.json`.
pub fn save_card(cards_dir: &Path, card: &RecordCard) -> Result<PathBuf> {
    fs::create_dir_all(cards_dir)?;
    let path = cards_dir.join(format!("{}.json", card.id));
    let json = serde_json::to_string_pretty(card)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Load a single RecordCard from a JSON file.
pub fn load_card(path: &Path) -> Result<RecordCard> {
    let contents = fs::read_to_string(path)?;
    let card: RecordCard = serde_json::from_str(&contents)?;
    Ok(card)
}

/// Load a RecordCard by ID from the cards directory.
pub fn load_card_by_id(cards_dir: &Path, id: &uuid::Uuid) -> Result<RecordCard> {
    let path = cards_dir.join(format!("{id}.json"));
    if !path.exists() {
        return Err(CoreError::RecordNotFound(id.to_string()));
    }
    load_card(&path)
}

/// List all RecordCards in the cards directory, oldest first.
pub fn list_cards(cards_dir: &Path) -> Result<Vec<RecordCard>> {
    if !cards_dir.exists() {
        return Ok(Vec::new());
    }

    let mut cards = Vec::new();
    for entry in fs::read_dir(cards_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            match load_card(&path) {
                Ok(card) => cards.push(card),
                Err(e) => {
                    tracing::warn!("skipping invalid card {}: {e}", path.display());
                }
            }
        }
    }
    // read_dir order is platform-defined; v7 ids sort by creation time
    cards.sort_by_key(|card| (card.created_at, card.id));
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_card() {
        let dir = TempDir::new().unwrap();
        let cards_dir = dir.path().join("cards");

        let card = RecordCard::new("Test Record");
        let id = card.id;

        save_card(&cards_dir, &card).unwrap();

        let loaded = load_card_by_id(&cards_dir, &id).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.title(), "Test Record");
    }

    #[test]
    fn test_list_cards_in_creation_order() {
        let dir = TempDir::new().unwrap();
        let cards_dir = dir.path().join("cards");

        let card1 = RecordCard::new("Record One");
        let card2 = RecordCard::new("Record Two");
        save_card(&cards_dir, &card2).unwrap();
        save_card(&cards_dir, &card1).unwrap();

        let cards = list_cards(&cards_dir).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, card1.id);
        assert_eq!(cards[1].id, card2.id);
    }

    #[test]
    fn test_list_cards_skips_invalid_json() {
        let dir = TempDir::new().unwrap();
        save_card(dir.path(), &RecordCard::new("Valid")).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let cards = list_cards(dir.path()).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_load_missing_card_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_card_by_id(dir.path(), &uuid::Uuid::now_v7()).unwrap_err();
        assert!(matches!(err, CoreError::RecordNotFound(_)));
    }

    #[test]
    fn test_list_cards_nonexistent_dir() {
        let cards = list_cards(Path::new("/tmp/nonexistent_twinscope_dir")).unwrap();
        assert!(cards.is_empty());
    }
}

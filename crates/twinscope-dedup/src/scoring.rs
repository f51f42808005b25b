use std::fmt;
use std::hash::Hash;

use twinscope_core::RecordCard;
use uuid::Uuid;

use crate::fields::{NamePart, ScoredField};
use crate::metrics::{jaccard, levenshtein_similarity};
use crate::normalize::{NormalizedName, NormalizedRecord};
use crate::weights::WeightVector;

/// Pairs a normalized entry type with the metric used to compare entries.
pub trait PairScorer {
    type Entry;
    /// Identity used to remember which pairs were already compared.
    type Key: Clone + Ord + Hash + fmt::Debug;

    fn key(&self, entry: &Self::Entry) -> Self::Key;

    /// Combined weighted similarity in `[0, 1]`.
    fn score(&self, a: &Self::Entry, b: &Self::Entry) -> f64;
}

#[derive(Debug, Clone)]
pub struct RecordEntry {
    pub record_id: Uuid,
    pub normalized: NormalizedRecord,
}

impl RecordEntry {
    pub fn from_record(record: &RecordCard) -> Self {
        Self {
            record_id: record.id,
            normalized: NormalizedRecord::from_record(record),
        }
    }
}

/// Token-set similarity across the weighted record fields.
#[derive(Debug, Clone)]
pub struct RecordScorer {
    weights: WeightVector<ScoredField>,
}

impl RecordScorer {
    pub fn new(weights: WeightVector<ScoredField>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightVector<ScoredField> {
        &self.weights
    }

    pub fn entries(&self, records: &[RecordCard]) -> Vec<RecordEntry> {
        records.iter().map(RecordEntry::from_record).collect()
    }
}

impl PairScorer for RecordScorer {
    type Entry = RecordEntry;
    type Key = Uuid;

    fn key(&self, entry: &RecordEntry) -> Uuid {
        entry.record_id
    }

    // Fields blank on both sides carry no evidence and are left out of the
    // weighted average entirely.
    fn score(&self, a: &RecordEntry, b: &RecordEntry) -> f64 {
        let mut combined = 0.0;
        let mut applied = 0.0;
        for (field, weight) in self.weights.iter() {
            let left = a.normalized.get(field);
            let right = b.normalized.get(field);
            if left.is_empty() && right.is_empty() {
                continue;
            }
            combined += jaccard(left, right) * weight;
            applied += weight;
        }
        if applied > 0.0 { combined / applied } else { 0.0 }
    }
}

/// One creator of one record in the working set.
#[derive(Debug, Clone)]
pub struct NameEntry {
    /// Position of the owning record in the working set.
    pub record_index: usize,
    pub record_id: Uuid,
    pub creator_index: usize,
    pub name: NormalizedName,
}

/// Edit-distance similarity across the weighted name parts.
#[derive(Debug, Clone)]
pub struct NameScorer {
    weights: WeightVector<NamePart>,
}

impl NameScorer {
    pub fn new(weights: WeightVector<NamePart>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightVector<NamePart> {
        &self.weights
    }

    /// Flatten the working set into one entry per creator.
    pub fn entries(&self, records: &[RecordCard]) -> Vec<NameEntry> {
        records
            .iter()
            .enumerate()
            .flat_map(|(record_index, record)| {
                record
                    .creators
                    .iter()
                    .enumerate()
                    .map(move |(creator_index, creator)| NameEntry {
                        record_index,
                        record_id: record.id,
                        creator_index,
                        name: NormalizedName::from_creator(creator),
                    })
            })
            .collect()
    }
}

impl PairScorer for NameScorer {
    type Entry = NameEntry;
    type Key = (Uuid, usize);

    fn key(&self, entry: &NameEntry) -> (Uuid, usize) {
        (entry.record_id, entry.creator_index)
    }

    fn score(&self, a: &NameEntry, b: &NameEntry) -> f64 {
        let mut combined = 0.0;
        let mut applied = 0.0;
        for (part, weight) in self.weights.iter() {
            combined += levenshtein_similarity(a.name.get(part), b.name.get(part)) * weight;
            applied += weight;
        }
        if applied > 0.0 { combined / applied } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{NAME_WEIGHTS, RECORD_WEIGHTS};
    use twinscope_core::Creator;

    fn record_scorer() -> RecordScorer {
        RecordScorer::new(WeightVector::new(RECORD_WEIGHTS).normalized().unwrap())
    }

    fn name_scorer() -> NameScorer {
        NameScorer::new(WeightVector::new(NAME_WEIGHTS).normalized().unwrap())
    }

    #[test]
    fn identical_titles_and_creators_score_one() {
        let mut a = RecordCard::new("Deep Learning");
        a.creators = vec![Creator::personal("Ian", "Goodfellow")];
        let mut b = RecordCard::new("Deep learning!");
        b.creators = vec![Creator::personal("Ian", "Goodfellow")];

        let scorer = record_scorer();
        let score = scorer.score(&RecordEntry::from_record(&a), &RecordEntry::from_record(&b));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blank_fields_do_not_dilute_the_score() {
        let a = RecordCard::new("Deep Learning");
        let b = RecordCard::new("Deep Learning Book");
        let scorer = record_scorer();
        let score = scorer.score(&RecordEntry::from_record(&a), &RecordEntry::from_record(&b));
        // title 2/3 at weight 0.4, item type 1.0 at weight 0.05
        let expected = (0.4 * (2.0 / 3.0) + 0.05) / 0.45;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn all_blank_records_score_zero() {
        let mut a = RecordCard::new("");
        a.item_type = String::new();
        let mut b = RecordCard::new("");
        b.item_type = String::new();
        let scorer = record_scorer();
        assert_eq!(
            scorer.score(&RecordEntry::from_record(&a), &RecordEntry::from_record(&b)),
            0.0
        );
    }

    #[test]
    fn record_score_is_symmetric() {
        let mut a = RecordCard::new("Pattern Recognition and Machine Learning");
        a.metadata.publisher = Some("Springer".to_string());
        let mut b = RecordCard::new("Machine Learning");
        b.metadata.date = Some("2006".to_string());
        let (ea, eb) = (RecordEntry::from_record(&a), RecordEntry::from_record(&b));
        let scorer = record_scorer();
        assert_eq!(scorer.score(&ea, &eb), scorer.score(&eb, &ea));
    }

    #[test]
    fn name_entries_flatten_creators() {
        let mut a = RecordCard::new("A");
        a.creators = vec![Creator::personal("John", "Smith"), Creator::single("ACME")];
        let mut b = RecordCard::new("B");
        b.creators = vec![Creator::personal("Jon", "Smith")];

        let entries = name_scorer().entries(&[a.clone(), b.clone()]);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].record_id, a.id);
        assert_eq!(entries[1].creator_index, 1);
        assert_eq!(entries[2].record_index, 1);
        assert_eq!(entries[2].name.full, "jon smith");
    }

    #[test]
    fn similar_names_score_high() {
        let mut a = RecordCard::new("A");
        a.creators = vec![Creator::personal("John", "Smith")];
        let mut b = RecordCard::new("B");
        b.creators = vec![Creator::personal("Jon", "Smith")];

        let scorer = name_scorer();
        let entries = scorer.entries(&[a, b]);
        let score = scorer.score(&entries[0], &entries[1]);
        // last 1.0, first 3/4, full 9/10
        let expected = 0.4 + 0.4 * 0.75 + 0.2 * 0.9;
        assert!((score - expected).abs() < 1e-9);
    }
}

use std::fmt;

use twinscope_core::DedupConfig;

use crate::error::Result;
use crate::fields::{NamePart, ScoredField};
use crate::scoring::{NameScorer, RecordScorer};
use crate::weights::WeightVector;

/// Default record-mode weights, title first.
pub const RECORD_WEIGHTS: &[(ScoredField, f64)] = &[
    (ScoredField::Title, 0.4),
    (ScoredField::ShortTitle, 0.05),
    (ScoredField::Creators, 0.2),
    (ScoredField::Date, 0.05),
    (ScoredField::Publisher, 0.05),
    (ScoredField::Place, 0.05),
    (ScoredField::Journal, 0.05),
    (ScoredField::Doi, 0.05),
    (ScoredField::Isbn, 0.05),
    (ScoredField::ItemType, 0.05),
];

pub const NAME_WEIGHTS: &[(NamePart, f64)] = &[
    (NamePart::LastName, 0.4),
    (NamePart::FirstName, 0.4),
    (NamePart::FullName, 0.2),
];

/// What a run compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole records, by token overlap across bibliographic fields.
    #[default]
    Records,
    /// Creator names across records, by edit distance.
    Names,
}

impl MatchMode {
    pub fn record_scorer(config: &DedupConfig) -> Result<RecordScorer> {
        let weights = WeightVector::new(RECORD_WEIGHTS)
            .with_overrides(&config.record_weights)?
            .normalized()?;
        Ok(RecordScorer::new(weights))
    }

    pub fn name_scorer(config: &DedupConfig) -> Result<NameScorer> {
        let weights = WeightVector::new(NAME_WEIGHTS)
            .with_overrides(&config.name_weights)?
            .normalized()?;
        Ok(NameScorer::new(weights))
    }

    /// What the threshold prompt says it is detecting.
    pub fn subject(self) -> &'static str {
        match self {
            Self::Records => "duplicates",
            Self::Names => "similar names",
        }
    }

    pub fn completion_message(self) -> &'static str {
        match self {
            Self::Records => "Duplicate detection process completed.",
            Self::Names => "Name similarity detection process completed.",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records => write!(f, "records"),
            Self::Names => write!(f, "names"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DedupError;

    #[test]
    fn test_scorers_from_default_config() {
        let config = DedupConfig::default();
        let records = MatchMode::record_scorer(&config).unwrap();
        // defaults sum to 0.95 before normalization
        assert!((records.weights().get(ScoredField::Title) - 0.4 / 0.95).abs() < 1e-9);
        let names = MatchMode::name_scorer(&config).unwrap();
        assert!((names.weights().get(NamePart::FullName) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_name_overrides_do_not_leak_into_record_mode() {
        let mut config = DedupConfig::default();
        config.name_weights.insert("title".to_string(), 1.0);
        assert!(MatchMode::record_scorer(&config).is_ok());
        assert!(matches!(
            MatchMode::name_scorer(&config),
            Err(DedupError::UnknownField(_))
        ));
    }
}

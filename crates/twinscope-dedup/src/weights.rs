use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::error::{DedupError, Result};
use crate::fields::WeightKey;

/// One non-negative weight per compared dimension. After [`normalized`]
/// the weights sum to 1.
///
/// [`normalized`]: WeightVector::normalized
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector<K: WeightKey> {
    entries: Vec<(K, f64)>,
}

impl<K: WeightKey> WeightVector<K> {
    pub fn new(defaults: &[(K, f64)]) -> Self {
        Self {
            entries: defaults.to_vec(),
        }
    }

    /// Replace individual weights by key name.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, f64>) -> Result<Self> {
        for (name, &weight) in overrides {
            let key = K::from_name(name).ok_or_else(|| DedupError::UnknownField(name.clone()))?;
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = weight,
                None => self.entries.push((key, weight)),
            }
        }
        Ok(self)
    }

    /// Divide every weight by the total.
    pub fn normalized(mut self) -> Result<Self> {
        if let Some((key, weight)) = self
            .entries
            .iter()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(DedupError::InvalidWeights(format!(
                "{} has weight {weight}",
                key.name()
            )));
        }

        let total = self.sum();
        if total <= 0.0 {
            return Err(DedupError::InvalidWeights(
                "at least one weight must be positive".to_string(),
            ));
        }

        for (_, weight) in &mut self.entries {
            *weight /= total;
        }
        Ok(self)
    }

    pub fn get(&self, key: K) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// One "Label: 0.40" line per weight.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (key, weight) in &self.entries {
            let _ = writeln!(out, "{}: {weight:.2}", key.label());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{NamePart, ScoredField};
    use crate::mode::{NAME_WEIGHTS, RECORD_WEIGHTS};

    #[test]
    fn test_default_vectors_normalize_to_one() {
        let records = WeightVector::new(RECORD_WEIGHTS).normalized().unwrap();
        assert!((records.sum() - 1.0).abs() < 1e-9);
        let names = WeightVector::new(NAME_WEIGHTS).normalized().unwrap();
        assert!((names.sum() - 1.0).abs() < 1e-9);
        assert!((names.get(NamePart::LastName) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_arbitrary_positive_vectors_normalize_to_one() {
        let samples: &[&[f64]] = &[&[1.0, 2.0, 3.0], &[0.0, 0.0, 7.5], &[1e-6, 1e6, 42.0]];
        for sample in samples {
            let defaults: Vec<(NamePart, f64)> =
                NamePart::ALL.iter().copied().zip(sample.iter().copied()).collect();
            let vector = WeightVector::new(&defaults).normalized().unwrap();
            assert!((vector.sum() - 1.0).abs() < 1e-9, "{sample:?}");
        }
    }

    #[test]
    fn test_overrides_replace_by_name() {
        let mut overrides = BTreeMap::new();
        overrides.insert("title".to_string(), 0.0);
        overrides.insert("DOI".to_string(), 0.55);
        let vector = WeightVector::new(RECORD_WEIGHTS)
            .with_overrides(&overrides)
            .unwrap()
            .normalized()
            .unwrap();
        assert_eq!(vector.get(ScoredField::Title), 0.0);
        assert!(vector.get(ScoredField::Doi) > vector.get(ScoredField::Creators));
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert("abstract".to_string(), 0.3);
        let err = WeightVector::new(RECORD_WEIGHTS)
            .with_overrides(&overrides)
            .unwrap_err();
        assert!(matches!(err, DedupError::UnknownField(name) if name == "abstract"));
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let negative = WeightVector::new(&[(NamePart::LastName, -1.0), (NamePart::FirstName, 2.0)]);
        assert!(matches!(negative.normalized(), Err(DedupError::InvalidWeights(_))));

        let zero = WeightVector::new(&[(NamePart::LastName, 0.0)]);
        assert!(matches!(zero.normalized(), Err(DedupError::InvalidWeights(_))));

        let nan = WeightVector::new(&[(NamePart::LastName, f64::NAN)]);
        assert!(matches!(nan.normalized(), Err(DedupError::InvalidWeights(_))));
    }

    #[test]
    fn test_display() {
        let vector = WeightVector::new(NAME_WEIGHTS).normalized().unwrap();
        assert_eq!(
            vector.display(),
            "Last Name: 0.40\nFirst Name: 0.40\nFull Name: 0.20\n"
        );
    }
}

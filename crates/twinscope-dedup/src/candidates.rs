use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::error::{DedupError, Result};
use crate::scoring::PairScorer;

/// Minimum similarity a pair must strictly exceed to become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DedupError::InvalidThreshold(value.to_string()))
        }
    }

    /// Parse user input such as `" 0.75 "`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        trimmed
            .parse::<f64>()
            .map_err(|_| DedupError::InvalidThreshold(trimmed.to_string()))
            .and_then(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_exceeded_by(self, similarity: f64) -> bool {
        similarity > self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unordered pairs already scored in this run.
#[derive(Debug, Clone)]
pub struct ProcessedPairSet<K> {
    seen: HashSet<(K, K)>,
}

impl<K: Clone + Ord + Hash> Default for ProcessedPairSet<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

impl<K: Clone + Ord + Hash> ProcessedPairSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair_key(a: &K, b: &K) -> (K, K) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    /// Mark a pair processed. Returns false if it already was.
    pub fn insert(&mut self, a: &K, b: &K) -> bool {
        self.seen.insert(Self::pair_key(a, b))
    }

    pub fn contains(&self, a: &K, b: &K) -> bool {
        self.seen.contains(&Self::pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Two entries, by position in the generator input, whose similarity
/// exceeded the threshold. `first < second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair {
    pub first: usize,
    pub second: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub candidates: Vec<CandidatePair>,
    /// Number of similarity computations performed.
    pub comparisons: usize,
}

/// Score every unordered pair of distinct entries once, in `i < j` order,
/// keeping those strictly above `threshold`.
pub fn generate<S: PairScorer>(
    scorer: &S,
    entries: &[S::Entry],
    threshold: Threshold,
    batch_size: usize,
) -> Generation {
    let keys: Vec<S::Key> = entries.iter().map(|e| scorer.key(e)).collect();
    let mut processed = ProcessedPairSet::new();
    let mut candidates = Vec::new();
    let batch_size = batch_size.max(1);

    for batch_start in (0..entries.len()).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(entries.len());
        for i in batch_start..batch_end {
            for j in (i + 1)..entries.len() {
                if keys[i] == keys[j] || !processed.insert(&keys[i], &keys[j]) {
                    continue;
                }
                let similarity = scorer.score(&entries[i], &entries[j]);
                if threshold.is_exceeded_by(similarity) {
                    tracing::debug!(
                        "potential match {:?} / {:?}: {similarity:.4}",
                        keys[i],
                        keys[j]
                    );
                    candidates.push(CandidatePair {
                        first: i,
                        second: j,
                        similarity,
                    });
                }
            }
        }
        tracing::debug!(
            "processed {batch_end}/{} entries, {} candidate(s) so far",
            entries.len(),
            candidates.len()
        );
    }

    Generation {
        candidates,
        comparisons: processed.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scores by a lookup and counts calls.
    struct CountingScorer {
        calls: Cell<usize>,
        matching: Vec<(u32, u32)>,
    }

    impl PairScorer for CountingScorer {
        type Entry = u32;
        type Key = u32;

        fn key(&self, entry: &u32) -> u32 {
            *entry
        }

        fn score(&self, a: &u32, b: &u32) -> f64 {
            self.calls.set(self.calls.get() + 1);
            let pair = if a < b { (*a, *b) } else { (*b, *a) };
            if self.matching.contains(&pair) { 0.9 } else { 0.1 }
        }
    }

    fn scorer(matching: Vec<(u32, u32)>) -> CountingScorer {
        CountingScorer {
            calls: Cell::new(0),
            matching,
        }
    }

    #[test]
    fn threshold_parsing() {
        assert_eq!(Threshold::parse(" 0.75 ").unwrap().value(), 0.75);
        assert_eq!(Threshold::parse("1").unwrap().value(), 1.0);
        assert_eq!(Threshold::parse("0").unwrap().value(), 0.0);
        for bad in ["", "abc", "1.5", "-0.1", "NaN", "inf"] {
            assert!(
                matches!(Threshold::parse(bad), Err(DedupError::InvalidThreshold(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn threshold_is_strict() {
        let t = Threshold::new(0.6).unwrap();
        assert!(!t.is_exceeded_by(0.6));
        assert!(t.is_exceeded_by(0.6000001));
    }

    #[test]
    fn processed_pair_set_is_order_independent() {
        let mut set = ProcessedPairSet::new();
        assert!(set.insert(&"b", &"a"));
        assert!(set.contains(&"a", &"b"));
        assert!(!set.insert(&"a", &"b"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn no_matches_compares_every_pair_once() {
        for n in [0u32, 1, 2, 5, 13] {
            let entries: Vec<u32> = (0..n).collect();
            let s = scorer(vec![]);
            let generation = generate(&s, &entries, Threshold::new(0.5).unwrap(), 4);
            let expected = (n * n.saturating_sub(1) / 2) as usize;
            assert!(generation.candidates.is_empty());
            assert_eq!(generation.comparisons, expected);
            assert_eq!(s.calls.get(), expected);
        }
    }

    #[test]
    fn candidates_follow_input_order() {
        let entries = vec![10, 20, 30, 40];
        let s = scorer(vec![(30, 40), (10, 30), (20, 40)]);
        let generation = generate(&s, &entries, Threshold::new(0.5).unwrap(), 100);
        let pairs: Vec<(usize, usize)> = generation
            .candidates
            .iter()
            .map(|c| (c.first, c.second))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn repeated_entries_are_compared_once() {
        let entries = vec![1, 2, 1, 2];
        let s = scorer(vec![(1, 2)]);
        let generation = generate(&s, &entries, Threshold::new(0.5).unwrap(), 1);
        assert_eq!(generation.comparisons, 1);
        assert_eq!(generation.candidates.len(), 1);
        assert_eq!(s.calls.get(), 1);
    }

    #[test]
    fn batch_size_does_not_change_result() {
        let entries: Vec<u32> = (0..9).collect();
        let matching = vec![(0, 8), (3, 4), (5, 7)];
        let baseline = generate(&scorer(matching.clone()), &entries, Threshold::new(0.5).unwrap(), 100);
        for batch in [0, 1, 2, 3, 8] {
            let other = generate(&scorer(matching.clone()), &entries, Threshold::new(0.5).unwrap(), batch);
            assert_eq!(other, baseline);
        }
    }
}

pub mod candidates;
pub mod error;
pub mod fields;
pub mod interaction;
pub mod metrics;
pub mod mode;
pub mod normalize;
pub mod resolution;
pub mod run;
pub mod scoring;
pub mod weights;

pub use candidates::{CandidatePair, Generation, ProcessedPairSet, Threshold, generate};
pub use error::{DedupError, Result};
pub use fields::{NamePart, ScoredField, WeightKey};
pub use interaction::Interaction;
pub use mode::MatchMode;
pub use run::{DedupRun, RunOutcome, RunSummary};
pub use scoring::{NameScorer, PairScorer, RecordScorer};
pub use weights::WeightVector;

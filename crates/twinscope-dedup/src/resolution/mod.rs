//! Human-in-the-loop resolution of candidate pairs.
//!
//! The resolvers here are the only part of the crate that talks to an
//! [`Interaction`](crate::interaction::Interaction). Every mutation is
//! applied and observed before the next candidate is shown.

mod names;
mod records;

pub use names::{NameAction, NameResolution, NameResolver};
pub use records::{RecordAction, RecordResolver, marker_label, record_preview};

/// What one resolution pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub tagged: usize,
    pub trashed: usize,
    pub ignored: usize,
    /// Candidates passed over because a record was trashed earlier in the pass.
    pub skipped: usize,
    /// Creator entries rewritten.
    pub renamed: usize,
    /// Mutations the sink rejected.
    pub failures: usize,
    /// The user chose Stop before the list was exhausted.
    pub stopped: bool,
}

use std::collections::HashSet;

use twinscope_core::{DedupConfig, MarkerStyle, MutationSink, RecordCard};
use uuid::Uuid;

use super::PassReport;
use crate::candidates::CandidatePair;
use crate::error::Result;
use crate::interaction::Interaction;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAction {
    TagBoth,
    TrashSecond,
    Ignore,
    Stop,
}

impl RecordAction {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::TagBoth),
            "2" => Some(Self::TrashSecond),
            "3" => Some(Self::Ignore),
            "4" => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Label applied to both records of a tagged pair. `position` is the
/// 1-based candidate index and only shows up in the per-pair style.
pub fn marker_label(prefix: &str, millis: i64, style: MarkerStyle, position: usize) -> String {
    match style {
        MarkerStyle::Shared => format!("{prefix}-{millis}"),
        MarkerStyle::PerPair => format!("{prefix}-{millis}-{position}"),
    }
}

fn field_or_na(record: &RecordCard, name: &str) -> String {
    record
        .field(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn describe(index: usize, record: &RecordCard) -> String {
    format!(
        "Item {index}:\n  Title: {}\n  Short Title: {}\n  First Author: {}\n  Publisher: {}\n  Date: {}\n",
        field_or_na(record, "title"),
        field_or_na(record, "shortTitle"),
        record.first_author().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        field_or_na(record, "publisher"),
        field_or_na(record, "date"),
    )
}

/// Prompt text shown for one candidate pair.
pub fn record_preview(
    similarity: f64,
    first: &RecordCard,
    second: &RecordCard,
    label: &str,
) -> String {
    format!(
        "Potential duplicate found with similarity {similarity:.2}:\n\n{}\n{}\n\
         Choose an action:\n\
         1. Add a tag to both items ({label})\n\
         2. Move item 2 to trash\n\
         3. Ignore\n\
         4. Stop processing",
        describe(1, first),
        describe(2, second),
    )
}

/// Walks record-mode candidates one at a time.
#[derive(Debug, Clone)]
pub struct RecordResolver<'a> {
    config: &'a DedupConfig,
    pass_millis: i64,
}

impl<'a> RecordResolver<'a> {
    pub fn new(config: &'a DedupConfig) -> Self {
        Self::with_timestamp(config, chrono::Utc::now().timestamp_millis())
    }

    /// Use a fixed pass timestamp for marker labels.
    pub fn with_timestamp(config: &'a DedupConfig, pass_millis: i64) -> Self {
        Self {
            config,
            pass_millis,
        }
    }

    pub fn resolve(
        &self,
        records: &[RecordCard],
        candidates: &[CandidatePair],
        ui: &mut dyn Interaction,
        sink: &mut dyn MutationSink,
    ) -> Result<PassReport> {
        let mut report = PassReport::default();
        let mut trashed: HashSet<Uuid> = HashSet::new();

        for (position, pair) in candidates.iter().enumerate() {
            let first = &records[pair.first];
            let second = &records[pair.second];

            if self.config.skip_trashed_in_pass
                && (trashed.contains(&first.id) || trashed.contains(&second.id))
            {
                tracing::info!(
                    "skipping {} / {}: a record was trashed earlier in this pass",
                    first.id,
                    second.id
                );
                report.skipped += 1;
                continue;
            }

            let label = marker_label(
                &self.config.marker_prefix,
                self.pass_millis,
                self.config.marker_style,
                position + 1,
            );
            let preview = record_preview(pair.similarity, first, second, &label);

            let action = match ui.prompt_choice(&preview)? {
                None => {
                    tracing::warn!("prompt cancelled, ignoring {} / {}", first.id, second.id);
                    RecordAction::Ignore
                }
                Some(input) => RecordAction::parse(&input).unwrap_or_else(|| {
                    tracing::warn!("invalid choice {input:?}, ignoring {} / {}", first.id, second.id);
                    RecordAction::Ignore
                }),
            };

            match action {
                RecordAction::TagBoth => {
                    let mut ok = true;
                    for record in [first, second] {
                        if let Err(e) = sink.add_marker(record, &label) {
                            ok = false;
                            report.failures += 1;
                            tracing::warn!("failed to tag {}: {e}", record.id);
                            ui.notify(&format!("Failed to tag record {}: {e}", record.id));
                        }
                    }
                    if ok {
                        tracing::info!("tagged {} and {} as {label}", first.id, second.id);
                        report.tagged += 1;
                    }
                }
                RecordAction::TrashSecond => match sink.move_to_trash(second) {
                    Ok(()) => {
                        tracing::info!("moved {} to trash", second.id);
                        trashed.insert(second.id);
                        report.trashed += 1;
                    }
                    Err(e) => {
                        report.failures += 1;
                        tracing::warn!("failed to trash {}: {e}", second.id);
                        ui.notify(&format!("Failed to move record {} to trash: {e}", second.id));
                    }
                },
                RecordAction::Ignore => {
                    tracing::info!(
                        "ignored potential duplicate: {:?} / {:?}",
                        first.title(),
                        second.title()
                    );
                    report.ignored += 1;
                }
                RecordAction::Stop => {
                    tracing::info!(
                        "processing stopped by the user, {} candidate(s) left",
                        candidates.len() - position
                    );
                    report.stopped = true;
                    break;
                }
            }
        }

        Ok(report)
    }
}

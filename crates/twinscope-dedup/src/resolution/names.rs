use std::collections::{BTreeMap, BTreeSet};

use twinscope_core::{MutationSink, RecordCard, split_full_name};

use super::PassReport;
use crate::candidates::CandidatePair;
use crate::error::Result;
use crate::interaction::Interaction;
use crate::normalize::NormalizedName;
use crate::scoring::NameEntry;

const SAMPLE_NAMES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameAction {
    ReplaceAll,
    IgnoreAll,
    ShowAll,
    AdjustThreshold,
}

impl NameAction {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ReplaceAll),
            "2" => Some(Self::IgnoreAll),
            "3" => Some(Self::ShowAll),
            "4" => Some(Self::AdjustThreshold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameResolution {
    pub report: PassReport,
    /// The user asked to pick a new threshold and detect again.
    pub adjust_threshold: bool,
}

/// Resolves all name-mode candidates with one menu decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl NameResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        records: &[RecordCard],
        entries: &[NameEntry],
        candidates: &[CandidatePair],
        ui: &mut dyn Interaction,
        sink: &mut dyn MutationSink,
    ) -> Result<NameResolution> {
        let mut resolution = NameResolution::default();
        if candidates.is_empty() {
            return Ok(resolution);
        }

        let similar = similar_names(entries, candidates);
        let menu = format!(
            "Detected {} similar name pairs. Here are some examples:\n{}\n\
             Choose an action for all:\n\
             1. Replace names with a new name\n\
             2. Ignore all\n\
             3. Show all similar names\n\
             4. Adjust similarity threshold",
            candidates.len(),
            similar.iter().take(SAMPLE_NAMES).cloned().collect::<Vec<_>>().join("\n"),
        );

        loop {
            let Some(input) = ui.prompt_choice(&menu)? else {
                tracing::info!("menu cancelled, ignoring all similar names");
                resolution.report.ignored = candidates.len();
                return Ok(resolution);
            };

            match NameAction::parse(&input) {
                Some(NameAction::ReplaceAll) => {
                    resolution.report =
                        self.replace_all(records, entries, candidates, ui, sink)?;
                    return Ok(resolution);
                }
                Some(NameAction::IgnoreAll) => {
                    tracing::info!("ignored all detected similar names");
                    resolution.report.ignored = candidates.len();
                    return Ok(resolution);
                }
                Some(NameAction::ShowAll) => {
                    ui.notify(&format!("All similar names:\n{}", similar.join("\n")));
                }
                Some(NameAction::AdjustThreshold) => {
                    resolution.adjust_threshold = true;
                    return Ok(resolution);
                }
                None => {
                    tracing::warn!("invalid choice {input:?}");
                    ui.notify(&format!("Invalid choice '{}'. Enter 1, 2, 3 or 4.", input.trim()));
                }
            }
        }
    }

    fn replace_all(
        &self,
        records: &[RecordCard],
        entries: &[NameEntry],
        candidates: &[CandidatePair],
        ui: &mut dyn Interaction,
        sink: &mut dyn MutationSink,
    ) -> Result<PassReport> {
        let mut report = PassReport::default();
        let new_name = ui
            .prompt_text(
                "Enter the new name to replace all similar names. \
                 The last word becomes the last name, the rest the first name:",
                None,
            )?
            .filter(|name| !name.trim().is_empty());

        let Some(new_name) = new_name else {
            tracing::info!("no replacement name given, ignoring all similar names");
            report.ignored = candidates.len();
            return Ok(report);
        };
        let (first, last) = split_full_name(&new_name);

        // record index -> normalized full names to rewrite in that record
        let mut targets: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
        for pair in candidates {
            for entry in [&entries[pair.first], &entries[pair.second]] {
                targets
                    .entry(entry.record_index)
                    .or_default()
                    .insert(entry.name.full.as_str());
            }
        }

        for (record_index, names) in targets {
            let record = &records[record_index];
            let mut creators = record.creators.clone();
            let mut changed = 0;
            for creator in &mut creators {
                if names.contains(NormalizedName::from_creator(creator).full.as_str()) {
                    creator.rename(&first, &last);
                    changed += 1;
                }
            }
            if changed == 0 {
                continue;
            }

            match sink.set_creators(record, &creators) {
                Ok(()) => {
                    tracing::info!("renamed {changed} creator(s) of {} to {new_name:?}", record.id);
                    report.renamed += changed;
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::warn!("failed to update creators for {}: {e}", record.id);
                    ui.notify(&format!("Failed to update creators for record {}: {e}", record.id));
                }
            }
        }

        Ok(report)
    }
}

/// Distinct normalized full names across all candidates, in first-seen order.
fn similar_names(entries: &[NameEntry], candidates: &[CandidatePair]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for pair in candidates {
        for entry in [&entries[pair.first], &entries[pair.second]] {
            if seen.insert(entry.name.full.as_str()) {
                names.push(entry.name.full.clone());
            }
        }
    }
    names
}

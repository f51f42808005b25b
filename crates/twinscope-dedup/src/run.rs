use std::time::Instant;

use twinscope_core::{CoreError, DedupConfig, ItemSource, MutationSink, RecordCard, ScopeSelector};

use crate::candidates::{Generation, Threshold, generate};
use crate::error::Result;
use crate::fields::WeightKey;
use crate::interaction::Interaction;
use crate::mode::MatchMode;
use crate::resolution::{NameResolver, PassReport, RecordResolver};
use crate::scoring::PairScorer;
use crate::weights::WeightVector;

/// How a run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every pass ran to the end of its candidate list.
    #[default]
    Completed,
    /// The user chose Stop and declined to adjust the threshold, or
    /// cancelled the threshold prompt of a later pass.
    Stopped,
    /// The user cancelled the first threshold prompt.
    Cancelled,
    /// The scope resolved to no records.
    NoItems,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub working_set: usize,
    /// Candidates found, summed over passes.
    pub candidates: usize,
    pub tagged: usize,
    pub trashed: usize,
    pub ignored: usize,
    pub skipped: usize,
    pub renamed: usize,
    pub failures: usize,
    pub passes: usize,
    pub outcome: RunOutcome,
}

impl RunSummary {
    fn absorb(&mut self, report: PassReport) {
        self.tagged += report.tagged;
        self.trashed += report.trashed;
        self.ignored += report.ignored;
        self.skipped += report.skipped;
        self.renamed += report.renamed;
        self.failures += report.failures;
    }
}

/// One detection run over a scope: threshold prompt, candidate generation,
/// resolution, repeated while the user keeps adjusting the threshold.
///
/// A run holds no global state; callers that need to keep two runs from
/// overlapping hold a [`twinscope_core::LibraryLock`] around it.
#[derive(Debug, Clone)]
pub struct DedupRun<'a> {
    config: &'a DedupConfig,
    mode: MatchMode,
    default_threshold: Option<f64>,
    pass_millis: Option<i64>,
}

impl<'a> DedupRun<'a> {
    pub fn new(config: &'a DedupConfig, mode: MatchMode) -> Self {
        Self {
            config,
            mode,
            default_threshold: None,
            pass_millis: None,
        }
    }

    /// Offer `value` instead of the configured default at the threshold prompt.
    pub fn with_default_threshold(mut self, value: f64) -> Self {
        self.default_threshold = Some(value);
        self
    }

    /// Pin the marker timestamp instead of reading the clock.
    pub fn with_marker_timestamp(mut self, millis: i64) -> Self {
        self.pass_millis = Some(millis);
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn execute(
        &self,
        source: &dyn ItemSource,
        scope: &ScopeSelector,
        sink: &mut dyn MutationSink,
        ui: &mut dyn Interaction,
    ) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        let records = match source.working_set(scope) {
            Ok(records) => records,
            Err(CoreError::NoItemsFound(what)) => {
                ui.notify(&format!("No items found in {what}."));
                summary.outcome = RunOutcome::NoItems;
                return Ok(summary);
            }
            Err(e) => {
                ui.notify(&format!("Could not load items: {e}"));
                return Err(e.into());
            }
        };
        summary.working_set = records.len();
        tracing::info!("running {} detection over {} record(s)", self.mode, records.len());

        let result = match self.mode {
            MatchMode::Records => self.run_records(&records, sink, ui, started, &mut summary),
            MatchMode::Names => self.run_names(&records, sink, ui, started, &mut summary),
        };
        tracing::info!("total time: {:.2} seconds", started.elapsed().as_secs_f64());
        result?;

        if summary.outcome != RunOutcome::Cancelled {
            ui.notify(self.mode.completion_message());
        }
        Ok(summary)
    }

    fn run_records(
        &self,
        records: &[RecordCard],
        sink: &mut dyn MutationSink,
        ui: &mut dyn Interaction,
        started: Instant,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let scorer = MatchMode::record_scorer(self.config)?;
        let resolver = match self.pass_millis {
            Some(millis) => RecordResolver::with_timestamp(self.config, millis),
            None => RecordResolver::new(self.config),
        };
        let entries = scorer.entries(records);

        loop {
            let Some(generation) =
                self.detect(&scorer, scorer.weights(), &entries, ui, started, summary)?
            else {
                return Ok(());
            };
            ui.notify(&format!(
                "Found {} potential duplicate(s).",
                generation.candidates.len()
            ));

            let report = resolver.resolve(records, &generation.candidates, ui, sink)?;
            summary.absorb(report);

            if !report.stopped {
                summary.outcome = RunOutcome::Completed;
                return Ok(());
            }
            if !self.confirm_adjust(ui)? {
                summary.outcome = RunOutcome::Stopped;
                return Ok(());
            }
        }
    }

    fn run_names(
        &self,
        records: &[RecordCard],
        sink: &mut dyn MutationSink,
        ui: &mut dyn Interaction,
        started: Instant,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let scorer = MatchMode::name_scorer(self.config)?;
        let resolver = NameResolver::new();
        let entries = scorer.entries(records);
        tracing::info!("{} creator name(s) to compare", entries.len());

        loop {
            let Some(generation) =
                self.detect(&scorer, scorer.weights(), &entries, ui, started, summary)?
            else {
                return Ok(());
            };
            ui.notify(&format!(
                "Found {} similar name pair(s).",
                generation.candidates.len()
            ));

            let resolution =
                resolver.resolve(records, &entries, &generation.candidates, ui, sink)?;
            summary.absorb(resolution.report);

            if !resolution.adjust_threshold {
                summary.outcome = RunOutcome::Completed;
                return Ok(());
            }
        }
    }

    /// One detection pass: threshold prompt, then candidate generation.
    ///
    /// `None` when the user cancels the prompt. Cancelling before any pass
    /// ran cancels the run; cancelling a later pass keeps the earlier
    /// passes' changes and ends the run as stopped.
    fn detect<S, K>(
        &self,
        scorer: &S,
        weights: &WeightVector<K>,
        entries: &[S::Entry],
        ui: &mut dyn Interaction,
        started: Instant,
        summary: &mut RunSummary,
    ) -> Result<Option<Generation>>
    where
        S: PairScorer,
        K: WeightKey,
    {
        let Some(threshold) = self.prompt_threshold(weights, ui)? else {
            summary.outcome = if summary.passes == 0 {
                RunOutcome::Cancelled
            } else {
                RunOutcome::Stopped
            };
            return Ok(None);
        };
        if summary.passes == 0 {
            tracing::info!(
                "time to confirm weights: {:.2} seconds",
                started.elapsed().as_secs_f64()
            );
        }

        let detect_started = Instant::now();
        let generation = generate(scorer, entries, threshold, self.config.batch_size);
        tracing::info!(
            "time to detect duplicates: {:.2} seconds ({} comparisons)",
            detect_started.elapsed().as_secs_f64(),
            generation.comparisons
        );
        summary.candidates += generation.candidates.len();
        summary.passes += 1;
        Ok(Some(generation))
    }

    /// Show the normalized weights and ask for a threshold until the input
    /// is valid. `None` when the user cancels.
    fn prompt_threshold<K: WeightKey>(
        &self,
        weights: &WeightVector<K>,
        ui: &mut dyn Interaction,
    ) -> Result<Option<Threshold>> {
        let default = self
            .default_threshold
            .unwrap_or(self.config.default_threshold)
            .to_string();
        let message = format!(
            "Weights used in the similarity calculation:\n{}\n\
             Enter the similarity threshold for detecting {} \
             (a number between 0 and 1, e.g., 0.6 for 60% similarity):",
            weights.display(),
            self.mode.subject(),
        );

        loop {
            let Some(input) = ui.prompt_text(&message, Some(&default))? else {
                tracing::info!("threshold prompt cancelled");
                return Ok(None);
            };
            match Threshold::parse(&input) {
                Ok(threshold) => {
                    tracing::info!("using similarity threshold {threshold}");
                    return Ok(Some(threshold));
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    ui.notify(&format!(
                        "Invalid threshold value '{}'. Please enter a number between 0 and 1.",
                        input.trim()
                    ));
                }
            }
        }
    }

    fn confirm_adjust(&self, ui: &mut dyn Interaction) -> Result<bool> {
        let answer = ui.prompt_text(
            "Processing stopped. Do you want to adjust the similarity threshold? (y/n)",
            Some("n"),
        )?;
        Ok(matches!(
            answer.as_deref().map(|a| a.trim().to_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }
}

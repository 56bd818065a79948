use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::breakdown::{Breakdown, Tally};
use super::label::{Label, LabelMap};
use super::splitter::split;
use super::Classifier;
use crate::error::{PipelineError, Result};
use crate::pipelines::stats::PipelineStats;

/// Per-clause limit used unless [`Aggregator::with_timeout`] says otherwise.
pub const DEFAULT_CLAUSE_TIMEOUT: Duration = Duration::from_secs(30);

/// What happened to one clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseOutcome {
    /// The trimmed clause text.
    pub text: String,
    /// Bucket the clause was counted under.
    pub label: Label,
    /// Lower-cased label the classifier returned, if it returned one.
    pub raw_label: Option<String>,
    /// Why the clause was counted as neutral instead of classified.
    pub error: Option<String>,
}

impl ClauseOutcome {
    /// Whether the classifier failed (or timed out) on this clause.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of aggregating one statement.
#[derive(Debug, Clone)]
pub struct Report {
    /// Percentages and overall label.
    pub breakdown: Breakdown,
    /// One entry per clause, in statement order.
    pub clauses: Vec<ClauseOutcome>,
    /// Wall time and clause count.
    pub stats: PipelineStats,
}

impl Report {
    /// Number of clauses substituted with neutral after a classifier failure.
    pub fn failures(&self) -> usize {
        self.clauses.iter().filter(|c| c.failed()).count()
    }
}

/// Splits statements into clauses, classifies each, and tallies the labels.
///
/// Holds the long-lived classifier; build one at startup and share it.
/// Each clause runs on the blocking thread pool, bounded by the clause timeout.
pub struct Aggregator<C: ?Sized> {
    classifier: Arc<C>,
    labels: LabelMap,
    timeout: Option<Duration>,
}

impl<C: Classifier + ?Sized> Aggregator<C> {
    /// Aggregator with the default label map and [`DEFAULT_CLAUSE_TIMEOUT`].
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            labels: LabelMap::new(),
            timeout: Some(DEFAULT_CLAUSE_TIMEOUT),
        }
    }

    /// Use `labels` to interpret classifier output.
    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        self.labels = labels;
        self
    }

    /// Give up on a clause after `timeout` and count it as neutral.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait on the classifier for as long as it takes.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Break `statement` down by sentiment.
    ///
    /// A clause the classifier fails on, or does not answer in time, counts as
    /// neutral. A statement without clauses yields [`Breakdown::empty`].
    ///
    /// # Errors
    ///
    /// Only when the pipeline itself collapses, e.g. the classifier panics.
    /// No partial report is returned in that case.
    pub async fn aggregate(&self, statement: &str) -> Result<Report> {
        let stats = PipelineStats::start();
        let mut tally = Tally::new();
        let mut clauses = Vec::new();

        for clause in split(statement) {
            let outcome = match self.classify_clause(clause).await? {
                Ok(raw) => {
                    let label = self.labels.resolve(&raw);
                    if label == Label::Other {
                        tracing::warn!(raw_label = %raw, "classifier returned an unknown label");
                    }
                    tracing::debug!(clause, %label, "clause classified");
                    ClauseOutcome {
                        text: clause.to_string(),
                        label,
                        raw_label: Some(raw.trim().to_lowercase()),
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(clause, error = %e, "classification failed, counting clause as neutral");
                    ClauseOutcome {
                        text: clause.to_string(),
                        label: Label::Neutral,
                        raw_label: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            tally.record(outcome.label);
            clauses.push(outcome);
        }

        let breakdown = Breakdown::from_tally(&tally);
        let stats = stats.finish(tally.total());
        tracing::debug!(
            clauses = stats.items_processed,
            elapsed_ms = stats.total_time.as_millis() as u64,
            overall = %breakdown.overall,
            "statement aggregated"
        );

        Ok(Report {
            breakdown,
            clauses,
            stats,
        })
    }

    /// Outer error: the pipeline broke. Inner error: this clause failed.
    async fn classify_clause(&self, clause: &str) -> Result<Result<String>> {
        let classifier = Arc::clone(&self.classifier);
        let owned = clause.to_string();
        let task = tokio::task::spawn_blocking(move || classifier.classify(&owned));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => return Ok(Err(PipelineError::Timeout(limit))),
            },
            None => task.await,
        };

        joined.map_err(|e| {
            tracing::error!(error = %e, "classifier task did not complete");
            PipelineError::Unexpected(format!("Classifier stopped unexpectedly: {e}"))
        })
    }
}

impl<C: ?Sized> Clone for Aggregator<C> {
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
            labels: self.labels.clone(),
            timeout: self.timeout,
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Aggregator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("labels", &self.labels)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

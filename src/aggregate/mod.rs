//! Sentence-level sentiment breakdown.
//!
//! Splits a statement on `.`, classifies each clause and reports what share of the
//! clauses landed in each [`Label`], plus the most frequent one.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sentiment_breakdown::aggregate::Aggregator;
//! use sentiment_breakdown::sentiment::{ModernBertSize, SentimentAnalysisPipelineBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> sentiment_breakdown::error::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//! let aggregator = Aggregator::new(Arc::new(pipeline));
//!
//! let report = aggregator.aggregate("The food was great. The service was slow.").await?;
//! let b = &report.breakdown;
//! println!("{:.2}% positive, overall {}", b.positive, b.overall.display_name());
//! # Ok(())
//! # }
//! ```
//!
//! Anything implementing [`Classifier`] works, which keeps tests free of model downloads.

mod aggregator;
mod breakdown;
mod label;
mod splitter;

pub use aggregator::{Aggregator, ClauseOutcome, Report, DEFAULT_CLAUSE_TIMEOUT};
pub use breakdown::{Breakdown, Tally};
pub use label::{Label, LabelMap};
pub use splitter::{split, Clauses};

use crate::error::Result;

/// Anything that can put a sentiment label on a single clause.
///
/// Implementations are shared across requests, so they must be safe for concurrent
/// read-only use. The returned text may use any casing; the aggregator normalizes it.
pub trait Classifier: Send + Sync + 'static {
    /// Label one clause, or fail for this clause only.
    fn classify(&self, clause: &str) -> Result<String>;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Result<String> + Send + Sync + 'static,
{
    fn classify(&self, clause: &str) -> Result<String> {
        self(clause)
    }
}

//! Sentiment analysis pipeline.
//!
//! Classify text as `positive`, `negative`, or `neutral`.
//! Returns both the predicted label and a confidence score.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentiment_breakdown::sentiment::{SentimentAnalysisPipelineBuilder, ModernBertSize};
//!
//! # fn main() -> sentiment_breakdown::error::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
//!
//! let output = pipeline.run("I absolutely love this product!")?;
//! println!("sentiment: {} (confidence: {:.2})", output.prediction.label, output.prediction.score);
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline implements [`Classifier`](crate::aggregate::Classifier), so it plugs
//! straight into an [`Aggregator`](crate::aggregate::Aggregator).
//!
//! # Supported Models
//!
//! | Model | Sizes | Builder Method |
//! |-------|-------|----------------|
//! | ModernBERT | `Base`, `Large` | [`SentimentAnalysisPipelineBuilder::modernbert`] |
//! | ModernBERT fine-tune from the hub | any | [`SentimentAnalysisPipelineBuilder::checkpoint`] |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::{ModernBertSize, SentimentCheckpoint};
pub use crate::pipelines::stats::PipelineStats;
pub use crate::pipelines::utils::DeviceRequest;
pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::SentimentAnalysisModel;
pub use pipeline::{Output, Prediction, SentimentAnalysisPipeline};

/// Only for generic annotations. Use [`SentimentAnalysisPipelineBuilder::modernbert`].
pub type SentimentModernBert = crate::models::SentimentModernBertModel;

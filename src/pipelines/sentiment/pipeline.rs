use super::model::SentimentAnalysisModel;
use crate::aggregate::Classifier;
use crate::error::{PipelineError, Result};
use crate::pipelines::stats::PipelineStats;
use std::sync::Arc;
use tokenizers::Tokenizer;

// ============ Output types ============

/// A sentiment prediction with label and confidence score.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// The predicted sentiment as the model names it (e.g. "positive", "Negative").
    pub label: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f32,
}

/// Single-text output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Sentiment prediction.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Pipeline ============

/// Pipeline for sentiment analysis.
///
/// Use [`SentimentAnalysisPipelineBuilder`](super::SentimentAnalysisPipelineBuilder) to construct.
/// Cheap to clone: the weights are shared.
#[derive(Clone)]
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Analyze text sentiment.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use sentiment_breakdown::sentiment::{SentimentAnalysisPipelineBuilder, ModernBertSize};
    /// # fn main() -> sentiment_breakdown::error::Result<()> {
    /// # let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base).build()?;
    /// let output = pipeline.run("I love this!")?;
    /// println!("{}", output.prediction.label);
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();
        let prediction = self.model.predict_with_score(&self.tokenizer, text)?;
        Ok(Output {
            prediction,
            stats: stats_builder.finish(1),
        })
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M> Classifier for SentimentAnalysisPipeline<M>
where
    M: SentimentAnalysisModel + Send + Sync + 'static,
{
    fn classify(&self, clause: &str) -> Result<String> {
        match self.run(clause) {
            Ok(output) => {
                tracing::trace!(
                    label = %output.prediction.label,
                    score = output.prediction.score,
                    "classified clause"
                );
                Ok(output.prediction.label)
            }
            Err(e @ PipelineError::Classification(_)) => Err(e),
            Err(e) => Err(PipelineError::Classification(e.to_string())),
        }
    }
}

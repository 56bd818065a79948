use super::pipeline::Prediction;
use crate::error::Result;
use tokenizers::Tokenizer;

/// A sequence classifier that can back a [`SentimentAnalysisPipeline`](super::SentimentAnalysisPipeline).
pub trait SentimentAnalysisModel {
    /// Options identifying which weights to load.
    type Options: std::fmt::Debug + Clone;

    /// Load weights onto `device`.
    fn new(options: Self::Options, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Predict the label for one text, with its softmax probability.
    fn predict_with_score(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction>;

    /// Load the tokenizer matching `options`.
    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Device the weights live on.
    fn device(&self) -> &candle_core::Device;
}

use super::model::SentimentAnalysisModel;
use super::pipeline::SentimentAnalysisPipeline;
use crate::error::Result;
use crate::models::SentimentCheckpoint;
use crate::pipelines::cache::ModelOptions;
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, StandardPipelineBuilder};
use std::sync::Arc;

crate::pipelines::utils::impl_device_methods!(delegated: SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel>);

/// Builder for creating [`SentimentAnalysisPipeline`] instances.
///
/// Use [`Self::modernbert`] or [`Self::checkpoint`] as the entry point.
///
/// # Examples
///
/// ```rust,no_run
/// # use sentiment_breakdown::sentiment::{SentimentAnalysisPipelineBuilder, ModernBertSize};
/// # fn main() -> sentiment_breakdown::error::Result<()> {
/// let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
///     .cuda(0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel>(
    StandardPipelineBuilder<M::Options>,
);

impl<M: SentimentAnalysisModel> SentimentAnalysisPipelineBuilder<M> {
    pub(crate) fn new(options: M::Options) -> Self {
        Self(StandardPipelineBuilder::new(options))
    }

    /// Builds the pipeline with configured settings.
    ///
    /// Downloads weights and tokenizer on first use, so this blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if model loading or device initialization fails.
    pub fn build(self) -> Result<SentimentAnalysisPipeline<M>>
    where
        M: Send + Sync + 'static,
        M::Options: ModelOptions,
    {
        BasePipelineBuilder::build(self)
    }
}

impl<M: SentimentAnalysisModel> BasePipelineBuilder<M> for SentimentAnalysisPipelineBuilder<M>
where
    M: Send + Sync + 'static,
    M::Options: ModelOptions,
{
    type Pipeline = SentimentAnalysisPipeline<M>;
    type Options = M::Options;

    fn options(&self) -> &Self::Options {
        &self.0.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.0.device_request
    }

    fn create_model(options: Self::Options, device: candle_core::Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<tokenizers::Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(
        model: Arc<M>,
        tokenizer: tokenizers::Tokenizer,
    ) -> Result<Self::Pipeline> {
        Ok(SentimentAnalysisPipeline { model, tokenizer })
    }
}

impl SentimentAnalysisPipelineBuilder<super::SentimentModernBert> {
    /// Creates a builder for a stock ModernBERT sentiment model.
    pub fn modernbert(size: crate::models::ModernBertSize) -> Self {
        Self::new(size.into())
    }

    /// Creates a builder for any ModernBERT sentiment checkpoint, including hub repos.
    pub fn checkpoint(checkpoint: SentimentCheckpoint) -> Self {
        Self::new(checkpoint)
    }
}

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{ops::softmax, VarBuilder};
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config,
    ModernBertForSequenceClassification as CandleModernBertForSequenceClassification,
};
use std::collections::HashMap;
use std::str::FromStr;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};
use crate::loaders::{ClassifierLabels, ClassifierLoader, TokenizerLoader};
use crate::pipelines::sentiment::pipeline::Prediction;

/// Available ModernBERT model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModernBertSize {
    /// Base model (~150M parameters).
    Base,
    /// Large model (~400M parameters).
    Large,
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

/// Which sentiment checkpoint to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentCheckpoint {
    /// One of the stock multilingual sentiment fine-tunes.
    ModernBert(ModernBertSize),
    /// Any ModernBERT sequence-classification repo on the hub, e.g. `org/name`.
    Repo(String),
}

impl SentimentCheckpoint {
    /// HuggingFace repo id holding weights, config and tokenizer.
    pub fn repo_id(&self) -> &str {
        match self {
            SentimentCheckpoint::ModernBert(ModernBertSize::Base) => {
                "clapAI/modernBERT-base-multilingual-sentiment"
            }
            SentimentCheckpoint::ModernBert(ModernBertSize::Large) => {
                "clapAI/modernBERT-large-multilingual-sentiment"
            }
            SentimentCheckpoint::Repo(repo) => repo,
        }
    }
}

impl std::fmt::Display for SentimentCheckpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentCheckpoint::ModernBert(size) => write!(f, "{size}"),
            SentimentCheckpoint::Repo(repo) => write!(f, "{repo}"),
        }
    }
}

impl From<ModernBertSize> for SentimentCheckpoint {
    fn from(size: ModernBertSize) -> Self {
        SentimentCheckpoint::ModernBert(size)
    }
}

impl FromStr for SentimentCheckpoint {
    type Err = PipelineError;

    /// Accepts `base`, `large`, or a hub repo id containing a `/`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" | "modernbert-base" => Ok(ModernBertSize::Base.into()),
            "large" | "modernbert-large" => Ok(ModernBertSize::Large.into()),
            _ if s.contains('/') => Ok(SentimentCheckpoint::Repo(s.trim().to_string())),
            _ => Err(PipelineError::Config(format!(
                "Unknown model '{s}'. Expected 'base', 'large' or a hub repo id like 'org/name'"
            ))),
        }
    }
}

impl crate::pipelines::cache::ModelOptions for SentimentCheckpoint {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

/// ModernBERT with a sequence-classification head and its `id2label` table.
#[derive(Clone)]
pub struct SentimentModernBertModel {
    model: CandleModernBertForSequenceClassification,
    device: Device,
    id2label: HashMap<String, String>,
    max_len: usize,
}

impl SentimentModernBertModel {
    /// Download (or reuse cached) weights for `checkpoint` and load them onto `device`.
    pub fn new(checkpoint: SentimentCheckpoint, device: Device) -> Result<Self> {
        let repo_id = checkpoint.repo_id();
        tracing::info!(repo = repo_id, device = ?device.location(), "loading sentiment model");

        let (config, vb, id2label) = load_classifier_model_with_id2label(repo_id, &device)?;
        if id2label.is_empty() {
            return Err(PipelineError::Unexpected(format!(
                "'{repo_id}' has no id2label table in config.json; it is not a sequence classifier"
            )));
        }
        let model = CandleModernBertForSequenceClassification::load(vb, &config)?;

        Ok(Self {
            model,
            device,
            id2label,
            max_len: config.max_position_embeddings,
        })
    }

    /// Device the weights live on.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Tokenizer published alongside `checkpoint`.
    pub fn get_tokenizer(checkpoint: SentimentCheckpoint) -> Result<Tokenizer> {
        TokenizerLoader::new(checkpoint.repo_id()).load()
    }

    fn label_for(&self, pred_id: u32) -> Result<String> {
        self.id2label
            .get(&pred_id.to_string())
            .cloned()
            .ok_or_else(|| {
                let available: Vec<&str> = self.id2label.values().map(String::as_str).collect();
                PipelineError::Classification(format!(
                    "Predicted label ID {} not in id2label. Available: {}",
                    pred_id,
                    available.join(", ")
                ))
            })
    }
}

impl crate::pipelines::sentiment::model::SentimentAnalysisModel for SentimentModernBertModel {
    type Options = SentimentCheckpoint;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        SentimentModernBertModel::new(options, device)
    }

    fn predict_with_score(&self, tokenizer: &Tokenizer, text: &str) -> Result<Prediction> {
        let tokens = tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        if tokens.len() > self.max_len {
            return Err(PipelineError::Classification(format!(
                "Clause is {} tokens long, model accepts at most {}",
                tokens.len(),
                self.max_len
            )));
        }

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;

        let probs = softmax(&logits, D::Minus1)?;
        let probs_vec = probs.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs_vec.get(pred_id as usize).copied().unwrap_or(0.0);

        let label = self.label_for(pred_id)?;

        Ok(Prediction { label, score })
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        Self::get_tokenizer(options)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

fn patch_config_num_labels(config: &mut Config, labels: &ClassifierLabels) {
    let num_labels = labels.num_labels();

    if config.classifier_config.is_none()
        || config
            .classifier_config
            .as_ref()
            .map(|c| c.id2label.len())
            .unwrap_or(0)
            != num_labels
    {
        let id2label: HashMap<String, String> = (0..num_labels)
            .map(|i| {
                let name = labels
                    .id2label
                    .get(&i.to_string())
                    .cloned()
                    .unwrap_or_else(|| format!("label_{i}"));
                (i.to_string(), name)
            })
            .collect();
        let label2id: HashMap<String, String> = id2label
            .iter()
            .map(|(k, v)| (v.clone(), k.clone()))
            .collect();

        config.classifier_config = Some(ClassifierConfig {
            id2label,
            label2id,
            classifier_pooling: ClassifierPooling::default(),
        });
    }
}

fn load_classifier_model_with_id2label(
    repo_id: &str,
    device: &Device,
) -> Result<(Config, VarBuilder<'static>, HashMap<String, String>)> {
    let (config_str, weights_path) = ClassifierLoader::new(repo_id).load()?;

    let mut config: Config = serde_json::from_str(&config_str)?;
    let class_cfg: ClassifierLabels = serde_json::from_str(&config_str)?;

    patch_config_num_labels(&mut config, &class_cfg);

    let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
        unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
    } else {
        VarBuilder::from_pth(&weights_path, DType::F32, device)?
    };

    Ok((config, vb, class_cfg.id2label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_checkpoint_names() {
        assert_eq!(
            "base".parse::<SentimentCheckpoint>().unwrap(),
            SentimentCheckpoint::ModernBert(ModernBertSize::Base)
        );
        assert_eq!(
            " Large ".parse::<SentimentCheckpoint>().unwrap(),
            SentimentCheckpoint::ModernBert(ModernBertSize::Large)
        );
        assert_eq!(
            "org/my-sentiment".parse::<SentimentCheckpoint>().unwrap(),
            SentimentCheckpoint::Repo("org/my-sentiment".into())
        );
        assert!(matches!(
            "huge".parse::<SentimentCheckpoint>(),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn stock_checkpoints_point_at_sentiment_repos() {
        let base = SentimentCheckpoint::from(ModernBertSize::Base);
        assert_eq!(base.repo_id(), "clapAI/modernBERT-base-multilingual-sentiment");
        assert_eq!(base.to_string(), "modernbert-base");

        let custom = SentimentCheckpoint::Repo("org/name".into());
        assert_eq!(custom.repo_id(), "org/name");
    }
}

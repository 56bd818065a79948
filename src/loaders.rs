use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> Result<PathBuf> {
        let hf_api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| {
                PipelineError::Download(format!("Failed to initialize HuggingFace API: {e}"))
            })?;
        let hf_api = hf_api.model(self.repo.clone());

        let mut attempts = 0u32;

        for attempt in 0..MAX_RETRIES {
            match hf_api.get(self.filename.as_str()) {
                Ok(path) => {
                    tracing::debug!(repo = %self.repo, file = %self.filename, "resolved hub file");
                    return Ok(path);
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    attempts = attempt + 1;
                    // Another process is filling the same cache entry.
                    if error_msg.contains("Lock acquisition failed") && attempt < MAX_RETRIES - 1 {
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        tracing::debug!(?wait_time, "hub cache locked, retrying");
                        std::thread::sleep(wait_time);
                        continue;
                    }
                    return Err(PipelineError::Download(format!(
                        "Failed to download '{}' from '{}': {}",
                        self.filename, self.repo, error_msg
                    )));
                }
            }
        }

        Err(PipelineError::Download(format!(
            "Download timed out for '{}' from '{}' after {} attempt(s)",
            self.filename, self.repo, attempts
        )))
    }

    /// Like [`Self::load`] but tries `fallback` when `filename` is missing from the repo.
    pub fn load_or(&self, fallback: &str) -> Result<PathBuf> {
        self.load()
            .or_else(|_| HfLoader::new(&self.repo, fallback).load())
    }
}

#[derive(Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, "tokenizer.json"),
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;
        let path_str = tokenizer_file_path.display().to_string();

        let tokenizer = Tokenizer::from_file(&tokenizer_file_path).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Failed to load tokenizer from '{}': {}",
                path_str, e
            ))
        })?;

        Ok(tokenizer)
    }
}

/// Label metadata from a classifier's `config.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierLabels {
    #[serde(default)]
    pub id2label: std::collections::HashMap<String, String>,
    #[serde(default)]
    pub label2id: std::collections::HashMap<String, u32>,
}

impl ClassifierLabels {
    pub fn num_labels(&self) -> usize {
        self.label2id.len().max(self.id2label.len())
    }
}

/// Fetches `config.json` plus the weight file for a sequence classifier.
#[derive(Clone)]
pub struct ClassifierLoader {
    pub repo: String,
}

impl ClassifierLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Returns the raw config text and the path of the weights.
    pub fn load(&self) -> Result<(String, PathBuf)> {
        let config_path = HfLoader::new(&self.repo, "config.json").load()?;
        let weights_path =
            HfLoader::new(&self.repo, "model.safetensors").load_or("pytorch_model.bin")?;

        let config_str = std::fs::read_to_string(&config_path)?;
        Ok((config_str, weights_path))
    }
}

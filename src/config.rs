//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! then [`Overrides`] collected from environment variables and CLI flags.
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! model = "large"              # "base", "large" or a hub repo id
//! device = "cuda:0"            # "cpu", "cuda" or "cuda:N"
//! clause_timeout_secs = 10     # 0 disables the limit
//!
//! [labels]                     # optional raw-label aliases
//! LABEL_0 = "negative"
//! LABEL_1 = "neutral"
//! LABEL_2 = "positive"
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::aggregate::{LabelMap, DEFAULT_CLAUSE_TIMEOUT};
use crate::error::{PipelineError, Result};
use crate::sentiment::{DeviceRequest, SentimentCheckpoint};

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Address the web form listens on.
    pub bind: SocketAddr,
    /// `base`, `large` or a hub repo id.
    pub model: String,
    /// `cpu`, `cuda` or `cuda:N`.
    pub device: String,
    /// Per-clause classification limit in seconds. 0 disables it.
    pub clause_timeout_secs: u64,
    /// Raw classifier label -> `positive` | `negative` | `neutral`.
    pub labels: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            model: "base".to_string(),
            device: "cpu".to_string(),
            clause_timeout_secs: DEFAULT_CLAUSE_TIMEOUT.as_secs(),
            labels: BTreeMap::new(),
        }
    }
}

/// Values from the environment or command line that beat the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces [`Settings::bind`].
    pub bind: Option<SocketAddr>,
    /// Replaces [`Settings::model`].
    pub model: Option<String>,
    /// Replaces [`Settings::device`].
    pub device: Option<String>,
    /// Replaces [`Settings::clause_timeout_secs`].
    pub clause_timeout_secs: Option<u64>,
}

impl Settings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Cannot read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply `overrides` on top of these settings.
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(device) = overrides.device {
            self.device = device;
        }
        if let Some(secs) = overrides.clause_timeout_secs {
            self.clause_timeout_secs = secs;
        }
        self
    }

    /// Check every value that can be wrong before any model is loaded.
    pub fn validate(&self) -> Result<()> {
        self.checkpoint()?;
        self.device_request()?;
        self.label_map()?;
        Ok(())
    }

    /// Parsed [`Settings::model`].
    pub fn checkpoint(&self) -> Result<SentimentCheckpoint> {
        self.model.parse()
    }

    /// Parsed [`Settings::device`].
    pub fn device_request(&self) -> Result<DeviceRequest> {
        self.device.parse()
    }

    /// Parsed [`Settings::labels`].
    pub fn label_map(&self) -> Result<LabelMap> {
        LabelMap::from_aliases(
            self.labels
                .iter()
                .map(|(raw, name)| (raw.as_str(), name.as_str())),
        )
    }

    /// Per-clause limit, `None` when disabled.
    pub fn clause_timeout(&self) -> Option<Duration> {
        (self.clause_timeout_secs > 0).then(|| Duration::from_secs(self.clause_timeout_secs))
    }
}

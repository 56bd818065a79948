use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Sentiment category of a clause.
///
/// `Other` collects whatever the classifier returns outside the three known
/// names, so the four percentages of a breakdown always add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Positive sentiment.
    Positive,
    /// Negative sentiment.
    Negative,
    /// Neutral sentiment, also the stand-in for clauses that failed to classify.
    Neutral,
    /// Any label outside the known set.
    Other,
}

impl Label {
    /// Every bucket, in reporting order.
    pub const ALL: [Label; 4] = [Label::Positive, Label::Negative, Label::Neutral, Label::Other];

    /// The three labels the classifier is expected to produce.
    pub const KNOWN: [Label; 3] = [Label::Positive, Label::Negative, Label::Neutral];

    pub(crate) fn index(self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Negative => 1,
            Label::Neutral => 2,
            Label::Other => 3,
        }
    }

    /// Lower-case name, as counted.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
            Label::Other => "other",
        }
    }

    /// Capitalized name, as displayed.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
            Label::Neutral => "Neutral",
            Label::Other => "Other",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = PipelineError;

    /// Parses one of the known names, case-insensitively. `other` is not accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Label::Positive),
            "negative" => Ok(Label::Negative),
            "neutral" => Ok(Label::Neutral),
            _ => Err(PipelineError::Config(format!(
                "Unknown sentiment label '{s}'. Expected positive, negative or neutral"
            ))),
        }
    }
}

/// Maps raw classifier output onto [`Label`]s.
///
/// Known names match case-insensitively. Extra aliases cover checkpoints whose
/// config only names classes `LABEL_0`, `LABEL_1`, ... or uses other wording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    aliases: HashMap<String, Label>,
}

impl LabelMap {
    /// Map with no aliases: only `positive`, `negative` and `neutral` are recognized.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `raw` (any casing) as `label`.
    pub fn with_alias(mut self, raw: &str, label: Label) -> Self {
        self.aliases.insert(raw.trim().to_lowercase(), label);
        self
    }

    /// Build from `raw -> label name` pairs, e.g. a `[labels]` table in the settings file.
    pub fn from_aliases<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |map, (raw, name)| {
                Ok(map.with_alias(raw, name.parse()?))
            })
    }

    /// Resolve raw classifier output. Anything unrecognized becomes [`Label::Other`].
    pub fn resolve(&self, raw: &str) -> Label {
        let normalized = raw.trim().to_lowercase();
        if let Some(label) = self.aliases.get(&normalized) {
            return *label;
        }
        normalized.parse().unwrap_or(Label::Other)
    }
}

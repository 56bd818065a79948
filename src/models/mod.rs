pub mod modernbert;

pub use modernbert::{ModernBertSize, SentimentCheckpoint, SentimentModernBertModel};

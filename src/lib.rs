//! Sentence-level sentiment breakdown for free text.
//!
//! A statement is split on `.`, each clause is labelled by a local
//! [Candle](https://github.com/huggingface/candle) text-classification pipeline, and the
//! labels are tallied into positive / negative / neutral percentages plus an overall
//! sentiment. A small web form sits on top.
//!
//! - [`sentiment`]: the model pipeline (ModernBERT sequence classification).
//! - [`aggregate`]: clause splitting, tallying and the [`Aggregator`](aggregate::Aggregator).
//! - [`web`]: axum routes for the form and a JSON endpoint.
//! - [`config`]: layered settings.

#![warn(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod aggregate;
pub mod config;
pub mod error;
pub mod web;

pub use pipelines::sentiment;

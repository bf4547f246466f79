//! CommentLens Core
//!
//! Core types and error handling shared across CommentLens components.
//!
//! This crate provides:
//! - The comment input type and the per-axis analysis results
//! - The fused `AnalysisResult` record that is persisted per comment
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AnalysisResult, Comment, EmotionDistribution, LexicalScores, PatternScores, SentimentDetails,
    SentimentLabel, SentimentResult, TagResult,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AnalysisResult, Comment, SentimentLabel, SentimentResult, TagResult};
}

//! CommentLens Classifiers
//!
//! Rule-based scorers for comment analysis and the orchestrator that fuses
//! them into one record per comment.
//!
//! Axes:
//! - Sentiment: two lexical estimators blended into a label, score and emotion mix
//! - Toxicity: severity-tiered patterns, optionally blended with an external service
//! - Themes: keyword taxonomy ranking with content fallbacks, plus keyword extraction
//! - Tags: ordered regex taxonomy with escalation rules
//!
//! Local scorers are synchronous and never suspend; only the external
//! toxicity service does network I/O.

pub mod config;
pub mod estimators;
pub mod fusion;
pub mod perspective;
pub mod sentiment;
pub mod tagger;
pub mod themes;
pub mod toxicity;

pub use config::PerspectiveConfig;
pub use fusion::FusionOrchestrator;
pub use perspective::{AttributeScores, PerspectiveClient, ToxicityService};
pub use sentiment::SentimentScorer;
pub use tagger::TagClassifier;
pub use themes::{Keyword, ThemeRanker};
pub use toxicity::{Severity, ToxicCategory, ToxicElement, ToxicityReport, ToxicityScorer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::fusion::FusionOrchestrator;
    pub use crate::perspective::{PerspectiveClient, ToxicityService};
    pub use crate::sentiment::SentimentScorer;
    pub use crate::tagger::TagClassifier;
    pub use crate::themes::ThemeRanker;
    pub use crate::toxicity::ToxicityScorer;
}

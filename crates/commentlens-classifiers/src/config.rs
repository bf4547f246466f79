//! Scoring constants and scorer configuration
//!
//! All fusion weights are fixed, hand-chosen heuristics. They are plain
//! constants rather than loaded parameters; nothing adjusts them at runtime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Weight of the valence estimator's compound score in the sentiment blend
pub const SENTIMENT_LEXICAL_WEIGHT: f32 = 0.7;

/// Weight of the pattern estimator's polarity in the sentiment blend
pub const SENTIMENT_PATTERN_WEIGHT: f32 = 0.3;

/// Combined scores at or above this are positive, at or below its negation negative
pub const SENTIMENT_LABEL_THRESHOLD: f32 = 0.05;

/// Emotion weights applied to the lexical proportions
pub mod emotion {
    pub const JOY_FROM_POSITIVE: f32 = 1.0;
    pub const ANGER_FROM_NEGATIVE: f32 = 0.8;
    pub const SADNESS_FROM_NEGATIVE: f32 = 0.6;
    pub const FEAR_FROM_NEGATIVE: f32 = 0.4;
    pub const DISGUST_FROM_NEGATIVE: f32 = 0.7;
    pub const SURPRISE_FROM_COMPOUND: f32 = 0.3;
}

/// Weight of the local pattern score in the toxicity blend
pub const TOXICITY_LOCAL_WEIGHT: f32 = 0.7;

/// Weight of the external service score in the toxicity blend
pub const TOXICITY_EXTERNAL_WEIGHT: f32 = 0.3;

/// Heuristic bumps added to the local toxicity score
pub mod toxicity_bumps {
    /// Text longer than `SHOUTING_MIN_CHARS` with no lowercase letters
    pub const SHOUTING: f32 = 0.1;
    pub const SHOUTING_MIN_CHARS: usize = 10;
    /// More than `EXCLAMATION_MIN_COUNT` exclamation marks
    pub const EXCLAMATIONS: f32 = 0.05;
    pub const EXCLAMATION_MIN_COUNT: usize = 3;
    /// Any character repeated `REPEAT_RUN` times in a row
    pub const REPEATED_CHARACTER: f32 = 0.05;
    pub const REPEAT_RUN: usize = 5;
}

/// Weights of the external service's attributes
pub mod attribute_weights {
    pub const TOXICITY: f32 = 0.4;
    pub const SEVERE_TOXICITY: f32 = 0.3;
    pub const IDENTITY_ATTACK: f32 = 0.1;
    pub const INSULT: f32 = 0.1;
    pub const PROFANITY: f32 = 0.05;
    pub const THREAT: f32 = 0.05;
}

/// Default number of themes returned per comment
pub const DEFAULT_MAX_THEMES: usize = 5;

/// Default number of keywords returned by keyword extraction
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Upper bound on fallback themes
pub const MAX_FALLBACK_THEMES: usize = 3;

/// External toxicity service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerspectiveConfig {
    /// API key; without one the service is treated as unavailable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Analyze endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Hard upper bound on a single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PerspectiveConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

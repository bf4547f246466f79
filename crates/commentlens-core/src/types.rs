//! Core types for CommentLens

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single user comment submitted for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Opaque comment identifier
    pub id: String,

    /// Comment body
    pub text: String,

    /// Optional reference to the content the comment was left on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl Comment {
    /// Create a new comment with no source reference
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_ref: None,
        }
    }

    /// Attach a source reference
    pub fn with_source(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

/// Overall polarity of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Six-way emotion breakdown derived from lexical sentiment proportions.
///
/// Serializes as a flat `{"joy": .., "anger": .., ...}` map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub joy: f32,
    pub anger: f32,
    pub sadness: f32,
    pub fear: f32,
    pub surprise: f32,
    pub disgust: f32,
}

impl EmotionDistribution {
    /// Emotion names in a fixed order
    pub const NAMES: [&'static str; 6] = ["joy", "anger", "sadness", "fear", "surprise", "disgust"];

    /// Iterate `(name, value)` pairs in `NAMES` order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        let values = [
            self.joy,
            self.anger,
            self.sadness,
            self.fear,
            self.surprise,
            self.disgust,
        ];
        Self::NAMES.into_iter().zip(values)
    }

    /// Sum of all components
    pub fn total(&self) -> f32 {
        self.iter().map(|(_, v)| v).sum()
    }

    /// Whether every component is zero
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }

    /// Scale every component so the distribution sums to 1.
    ///
    /// An all-zero distribution is returned unchanged.
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return self;
        }
        Self {
            joy: self.joy / total,
            anger: self.anger / total,
            sadness: self.sadness / total,
            fear: self.fear / total,
            surprise: self.surprise / total,
            disgust: self.disgust / total,
        }
    }
}

/// Proportions and compound polarity from the valence-lexicon estimator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LexicalScores {
    /// Share of positive valence, 0.0-1.0
    pub positive: f32,
    /// Share of negative valence, 0.0-1.0
    pub negative: f32,
    /// Share of neutral tokens, 0.0-1.0
    pub neutral: f32,
    /// Normalized overall polarity, -1.0-1.0
    pub compound: f32,
}

/// Output of the adjective-pattern estimator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternScores {
    /// -1.0-1.0
    pub polarity: f32,
    /// 0.0-1.0
    pub subjectivity: f32,
}

/// Raw estimator sub-scores behind a sentiment decision
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentDetails {
    pub lexical: LexicalScores,
    pub pattern: PatternScores,
}

/// Result of the sentiment axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,

    /// Combined polarity, -1.0-1.0
    pub score: f32,

    /// Always `score.abs()`
    pub confidence: f32,

    pub emotion_distribution: EmotionDistribution,

    pub details: SentimentDetails,

    /// Set when scoring failed and the neutral default was substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    /// Neutral, zero-valued result carrying an error marker
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Whether this result is a degraded default
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of the tag axis
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagResult {
    /// Unique tag names in first-seen order, escalations included
    pub tags: Vec<String>,

    pub tag_count: usize,

    /// First tag, if any
    pub primary_tag: Option<String>,
}

impl TagResult {
    /// Build a result from an ordered, de-duplicated tag list
    pub fn from_tags(tags: Vec<String>) -> Self {
        let primary_tag = tags.first().cloned();
        Self {
            tag_count: tags.len(),
            primary_tag,
            tags,
        }
    }

    /// Whether the given tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Fused analysis record, built once per comment per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub comment_id: String,

    #[serde(rename = "sentiment")]
    pub sentiment_label: SentimentLabel,

    pub sentiment_score: f32,

    /// Combined local and external toxicity, 0.0-1.0
    pub toxicity_score: f32,

    /// Most salient first
    pub themes: Vec<String>,

    pub emotions: EmotionDistribution,

    pub tags: Vec<String>,

    pub primary_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distribution_stays_zero() {
        let normalized = EmotionDistribution::default().normalized();
        assert!(normalized.is_empty());
        assert_eq!(normalized.total(), 0.0);
    }

    #[test]
    fn test_distribution_normalizes_to_one() {
        let dist = EmotionDistribution {
            joy: 0.5,
            anger: 0.4,
            sadness: 0.3,
            fear: 0.2,
            surprise: 0.1,
            disgust: 0.35,
        }
        .normalized();

        assert!((dist.total() - 1.0).abs() < 1e-5);
        assert!(dist.iter().all(|(_, v)| v >= 0.0));
    }

    #[test]
    fn test_tag_result_primary_tag() {
        let result = TagResult::from_tags(vec!["Spam".to_string(), "Callout".to_string()]);
        assert_eq!(result.tag_count, 2);
        assert_eq!(result.primary_tag.as_deref(), Some("Spam"));

        let empty = TagResult::from_tags(Vec::new());
        assert_eq!(empty.primary_tag, None);
        assert_eq!(empty.tag_count, 0);
    }

    #[test]
    fn test_analysis_result_wire_shape() {
        let result = AnalysisResult {
            comment_id: "c1".to_string(),
            sentiment_label: SentimentLabel::Positive,
            sentiment_score: 0.6,
            toxicity_score: 0.0,
            themes: vec!["appreciation".to_string()],
            emotions: EmotionDistribution::default(),
            tags: vec!["Product Praise".to_string()],
            primary_tag: Some("Product Praise".to_string()),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sentiment"], "positive");
        assert_eq!(json["emotions"]["joy"], 0.0);
        assert_eq!(json["themes"][0], "appreciation");
    }

    #[test]
    fn test_degraded_sentiment_is_neutral() {
        let result = SentimentResult::degraded("boom");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert!(result.is_degraded());
    }
}

//! Sentiment scorer
//!
//! Blends the two lexical estimators into one polarity label and score and
//! derives a six-way emotion distribution from the valence proportions.
//! Scoring is best-effort: failures produce a neutral result with an error
//! marker instead of an error.

use crate::config::{
    emotion, SENTIMENT_LABEL_THRESHOLD, SENTIMENT_LEXICAL_WEIGHT, SENTIMENT_PATTERN_WEIGHT,
};
use crate::estimators::{PatternEstimator, ValenceEstimator};
use commentlens_core::{
    EmotionDistribution, Error, LexicalScores, PatternScores, Result, SentimentDetails,
    SentimentLabel, SentimentResult,
};
use tracing::{info, warn};

pub struct SentimentScorer {
    valence: ValenceEstimator,
    pattern: PatternEstimator,
}

impl SentimentScorer {
    pub fn new() -> Self {
        let scorer = Self {
            valence: ValenceEstimator::new(),
            pattern: PatternEstimator::new(),
        };
        info!("SentimentScorer initialized");
        scorer
    }

    /// Score `text`, degrading to a neutral result on failure
    pub fn analyze(&self, text: &str) -> SentimentResult {
        let lexical = self.valence.polarity_scores(text);
        let pattern = self.pattern.sentiment(text);
        or_degraded(blend(lexical, pattern))
    }

    /// Emotion distribution for `text`, all zeros on failure
    pub fn analyze_emotions(&self, text: &str) -> EmotionDistribution {
        let lexical = self.valence.polarity_scores(text);
        match checked_emotions(&lexical) {
            Ok(emotions) => emotions,
            Err(e) => {
                warn!("Emotion analysis error: {}", e);
                EmotionDistribution::default()
            }
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a combined score onto a label
pub fn label_for(score: f32) -> SentimentLabel {
    if score >= SENTIMENT_LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if score <= -SENTIMENT_LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Derive the emotion distribution from lexical proportions.
///
/// Each emotion is floored at zero before normalization; an all-zero
/// distribution stays all-zero.
pub fn emotions_from(lexical: &LexicalScores) -> EmotionDistribution {
    EmotionDistribution {
        joy: (lexical.positive * emotion::JOY_FROM_POSITIVE).max(0.0),
        anger: (lexical.negative * emotion::ANGER_FROM_NEGATIVE).max(0.0),
        sadness: (lexical.negative * emotion::SADNESS_FROM_NEGATIVE).max(0.0),
        fear: (lexical.negative * emotion::FEAR_FROM_NEGATIVE).max(0.0),
        surprise: (lexical.compound.abs() * emotion::SURPRISE_FROM_COMPOUND).max(0.0),
        disgust: (lexical.negative * emotion::DISGUST_FROM_NEGATIVE).max(0.0),
    }
    .normalized()
}

/// Combine both estimators' scores into one result
fn blend(lexical: LexicalScores, pattern: PatternScores) -> Result<SentimentResult> {
    let score =
        lexical.compound * SENTIMENT_LEXICAL_WEIGHT + pattern.polarity * SENTIMENT_PATTERN_WEIGHT;
    if !score.is_finite() {
        return Err(Error::classifier(format!(
            "non-finite sentiment score (compound {}, polarity {})",
            lexical.compound, pattern.polarity
        )));
    }

    Ok(SentimentResult {
        label: label_for(score),
        score,
        confidence: score.abs(),
        emotion_distribution: checked_emotions(&lexical)?,
        details: SentimentDetails { lexical, pattern },
        error: None,
    })
}

fn or_degraded(outcome: Result<SentimentResult>) -> SentimentResult {
    outcome.unwrap_or_else(|e| {
        warn!("Sentiment analysis error: {}", e);
        SentimentResult::degraded(e.to_string())
    })
}

fn checked_emotions(lexical: &LexicalScores) -> Result<EmotionDistribution> {
    let emotions = emotions_from(lexical);
    if emotions.iter().any(|(_, v)| !v.is_finite()) {
        return Err(Error::classifier("non-finite emotion weight"));
    }
    Ok(emotions)
}

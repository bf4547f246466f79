//! Local toxicity scorer
//!
//! Pattern-based estimate: the highest severity among matched categories,
//! plus small bumps for shouting, exclamation runs and stretched characters.
//! The local estimate is blended with the external service's score by
//! [`ToxicityScorer::combine`].

use crate::config::{toxicity_bumps, TOXICITY_EXTERNAL_WEIGHT, TOXICITY_LOCAL_WEIGHT};
use commentlens_core::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Severity tier of a toxic pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn weight(&self) -> f32 {
        match self {
            Self::Mild => 0.3,
            Self::Moderate => 0.6,
            Self::Severe => 0.9,
        }
    }
}

/// What a toxic pattern is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicCategory {
    OffensiveLanguage,
    SelfHarm,
    Profanity,
    Discrimination,
    Violence,
}

/// Ordered pattern table: (pattern, severity, category)
const TOXIC_PATTERNS: &[(&str, Severity, ToxicCategory)] = &[
    (
        r"\b(hate|stupid|idiot|dumb|moron)\b",
        Severity::Moderate,
        ToxicCategory::OffensiveLanguage,
    ),
    (
        r"\b(kill\s+yourself|kys)\b",
        Severity::Severe,
        ToxicCategory::SelfHarm,
    ),
    (
        r"\b(f[*u]ck|sh[*i]t|damn)\b",
        Severity::Mild,
        ToxicCategory::Profanity,
    ),
    (
        r"\b(racist|sexist|homophobic)\b",
        Severity::Severe,
        ToxicCategory::Discrimination,
    ),
    (
        r"\b(die|death|suicide)\b",
        Severity::Severe,
        ToxicCategory::Violence,
    ),
];

struct ToxicPattern {
    regex: Regex,
    severity: Severity,
    category: ToxicCategory,
}

/// A single toxic match inside a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicElement {
    /// Matched text as written
    pub matched_text: String,
    /// Byte offsets into the original text
    pub span: (usize, usize),
    pub severity: Severity,
    pub category: ToxicCategory,
}

/// Breakdown of a combined toxicity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityReport {
    pub local: f32,
    pub external: f32,
    pub combined: f32,
    pub elements: Vec<ToxicElement>,
}

pub struct ToxicityScorer {
    patterns: Vec<ToxicPattern>,
}

impl ToxicityScorer {
    /// Compile the toxic pattern table
    pub fn new() -> Result<Self> {
        let patterns = TOXIC_PATTERNS
            .iter()
            .map(|(pattern, severity, category)| -> Result<ToxicPattern> {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        Error::classifier(format!("Failed to compile toxic pattern {pattern}: {e}"))
                    })?;
                Ok(ToxicPattern {
                    regex,
                    severity: *severity,
                    category: *category,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!("ToxicityScorer initialized with {} patterns", patterns.len());
        Ok(Self { patterns })
    }

    /// Local toxicity estimate in `[0, 1]`
    pub fn analyze(&self, text: &str) -> f32 {
        let mut score = self
            .patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.severity.weight())
            .fold(0.0_f32, f32::max);

        if text.chars().count() > toxicity_bumps::SHOUTING_MIN_CHARS && is_all_caps(text) {
            score += toxicity_bumps::SHOUTING;
        }

        if text.matches('!').count() > toxicity_bumps::EXCLAMATION_MIN_COUNT {
            score += toxicity_bumps::EXCLAMATIONS;
        }

        if has_repeated_run(text, toxicity_bumps::REPEAT_RUN) {
            score += toxicity_bumps::REPEATED_CHARACTER;
        }

        score.clamp(0.0, 1.0)
    }

    /// Every toxic match in `text`, in pattern-table order
    pub fn get_elements(&self, text: &str) -> Vec<ToxicElement> {
        self.patterns
            .iter()
            .flat_map(|p| {
                p.regex.find_iter(text).map(move |m| ToxicElement {
                    matched_text: m.as_str().to_string(),
                    span: (m.start(), m.end()),
                    severity: p.severity,
                    category: p.category,
                })
            })
            .collect()
    }

    /// Blend a local score with the external service score
    pub fn combine(local: f32, external: f32) -> f32 {
        (local * TOXICITY_LOCAL_WEIGHT + external * TOXICITY_EXTERNAL_WEIGHT).clamp(0.0, 1.0)
    }

    /// Local score, elements and the blend with an already-fetched external score
    pub fn report(&self, text: &str, external: f32) -> ToxicityReport {
        let local = self.analyze(text);
        ToxicityReport {
            local,
            external,
            combined: Self::combine(local, external),
            elements: self.get_elements(text),
        }
    }
}

/// At least one cased character and no lowercase ones
fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Whether any character other than a newline repeats `run` times in a row
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut length = 0;

    for c in text.chars() {
        if c == '\n' {
            previous = None;
            length = 0;
            continue;
        }
        if Some(c) == previous {
            length += 1;
        } else {
            previous = Some(c);
            length = 1;
        }
        if length >= run {
            return true;
        }
    }
    false
}

//! Lexical sentiment estimators
//!
//! Two independent rule-based estimators feed the sentiment scorer:
//! - [`ValenceEstimator`] sums per-word valences with booster, negation,
//!   contrast and emphasis rules, then squashes the sum into a compound
//!   polarity and positive/negative/neutral proportions.
//! - [`PatternEstimator`] averages polarity and subjectivity over known
//!   opinion words, flipping or scaling them by preceding modifiers.
//!
//! Both are deterministic and allocation-light; their lexicons are built
//! once at construction and only read afterwards.

use commentlens_core::{LexicalScores, PatternScores};
use std::collections::{HashMap, HashSet};

/// Normalization constant for the compound score
const COMPOUND_ALPHA: f32 = 15.0;

/// Added to a word's valence magnitude per preceding booster
const BOOSTER_INCREMENT: f32 = 0.293;

/// Added to a word's valence magnitude when it is shouted in mixed-case text
const CAPS_INCREMENT: f32 = 0.733;

/// Multiplier applied to a negated valence
const NEGATION_SCALAR: f32 = -0.74;

/// Per-mark emphasis for `!`, counted up to 4 marks
const EXCLAMATION_INCREMENT: f32 = 0.292;

/// Per-mark emphasis for `?` when more than one is present
const QUESTION_INCREMENT: f32 = 0.18;

/// Word valences on a -4.0..4.0 scale
const VALENCE_LEXICON: &[(&str, f32)] = &[
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("lovely", 2.8),
    ("like", 2.0),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("great", 3.1),
    ("good", 1.9),
    ("nice", 1.8),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("excellent", 2.7),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("beautiful", 2.9),
    ("cool", 1.3),
    ("fun", 2.3),
    ("funny", 1.9),
    ("happy", 2.7),
    ("glad", 2.0),
    ("excited", 1.4),
    ("helpful", 1.8),
    ("useful", 1.9),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("grateful", 2.0),
    ("appreciate", 1.7),
    ("incredible", 2.2),
    ("outstanding", 3.0),
    ("superb", 3.1),
    ("favorite", 2.0),
    ("impressive", 2.3),
    ("interesting", 1.7),
    ("win", 2.8),
    ("yes", 1.7),
    ("lol", 1.8),
    ("haha", 2.0),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("hate", -2.7),
    ("hated", -3.2),
    ("stupid", -2.4),
    ("idiot", -2.3),
    ("dumb", -2.3),
    ("moron", -2.2),
    ("trash", -1.9),
    ("garbage", -1.9),
    ("sucks", -1.5),
    ("suck", -1.9),
    ("boring", -1.3),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("sad", -2.1),
    ("angry", -2.3),
    ("mad", -2.2),
    ("upset", -1.6),
    ("annoying", -1.7),
    ("annoyed", -1.6),
    ("afraid", -2.2),
    ("scared", -1.9),
    ("worried", -1.2),
    ("fear", -2.2),
    ("kill", -3.7),
    ("die", -2.9),
    ("death", -2.9),
    ("wrong", -2.1),
    ("fail", -2.5),
    ("failed", -2.3),
    ("problem", -1.7),
    ("useless", -1.8),
    ("pathetic", -2.2),
    ("worthless", -1.9),
    ("ugly", -2.3),
    ("disgusting", -2.4),
    ("gross", -2.1),
    ("no", -1.2),
    ("racist", -3.1),
];

/// Words that intensify (+) or dampen (-) the next opinion word
const BOOSTERS: &[(&str, f32)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("completely", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("most", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("hardly", -BOOSTER_INCREMENT),
    ("kinda", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor", "cannot", "without",
    "aint", "dont", "doesnt", "didnt", "isnt", "wasnt", "wont", "cant", "couldnt", "shouldnt",
];

/// Opinion words as (polarity, subjectivity)
const PATTERN_LEXICON: &[(&str, f32, f32)] = &[
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("great", 0.8, 0.75),
    ("good", 0.7, 0.6),
    ("nice", 0.6, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("wonderful", 1.0, 1.0),
    ("excellent", 1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("beautiful", 0.85, 1.0),
    ("cool", 0.35, 0.65),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("happy", 0.8, 1.0),
    ("helpful", 0.5, 0.5),
    ("useful", 0.3, 0.0),
    ("interesting", 0.5, 0.5),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("favorite", 0.5, 1.0),
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("stupid", -0.8, 1.0),
    ("dumb", -0.375, 0.5),
    ("boring", -1.0, 1.0),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("mad", -0.625, 1.0),
    ("annoying", -0.8, 0.9),
    ("wrong", -0.5, 0.9),
    ("useless", -0.5, 0.2),
    ("pathetic", -1.0, 1.0),
    ("worthless", -0.8, 0.9),
    ("ugly", -0.7, 1.0),
    ("disgusting", -1.0, 1.0),
    ("gross", -0.8, 0.9),
];

/// Multipliers applied to the next opinion word
const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("absolutely", 1.4),
    ("too", 1.2),
    ("quite", 1.1),
    ("pretty", 1.1),
];

/// Split text into tokens, trimming surrounding punctuation but keeping
/// inner apostrophes and hyphens.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|token| token.trim_matches('\''))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Whether a token reads as a negation (`not`, `never`, `don't`, ...)
fn is_negation(lower: &str, negations: &HashSet<&'static str>) -> bool {
    if lower.ends_with("n't") {
        return true;
    }
    let squashed: String = lower.chars().filter(|c| *c != '\'').collect();
    negations.contains(squashed.as_str())
}

fn is_shouted(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// Valence-sum estimator producing a compound score and proportions
pub struct ValenceEstimator {
    lexicon: HashMap<&'static str, f32>,
    boosters: HashMap<&'static str, f32>,
    negations: HashSet<&'static str>,
}

impl ValenceEstimator {
    pub fn new() -> Self {
        Self {
            lexicon: VALENCE_LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Score `text`, returning all-zero proportions for text without tokens
    pub fn polarity_scores(&self, text: &str) -> LexicalScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return LexicalScores::default();
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mixed_case = tokens.iter().any(|t| is_shouted(t)) && !tokens.iter().all(|t| is_shouted(t));

        let mut valences = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            // Modifiers contribute nothing themselves
            if self.boosters.contains_key(word.as_str()) {
                valences.push(0.0);
                continue;
            }
            let Some(&base) = self.lexicon.get(word.as_str()) else {
                valences.push(0.0);
                continue;
            };

            let mut valence = base;
            if mixed_case && is_shouted(tokens[i]) {
                valence += CAPS_INCREMENT * base.signum();
            }

            for distance in 1..=3 {
                let Some(prev) = i.checked_sub(distance) else {
                    break;
                };
                let prev = lowered[prev].as_str();
                if let Some(&boost) = self.boosters.get(prev) {
                    let decay = 1.0 - 0.05 * (distance - 1) as f32;
                    valence += boost * decay * base.signum();
                }
                if is_negation(prev, &self.negations) {
                    valence *= NEGATION_SCALAR;
                }
            }

            valences.push(valence);
        }

        // Contrast: "x but y" weights the clause after "but" more heavily
        if let Some(pivot) = lowered.iter().position(|w| w == "but") {
            for (i, valence) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *valence *= 0.5;
                } else if i > pivot {
                    *valence *= 1.5;
                }
            }
        }

        let sum: f32 = valences.iter().sum();
        let emphasis = punctuation_emphasis(text);

        let compound = if sum == 0.0 {
            0.0
        } else {
            let boosted = sum + emphasis * sum.signum();
            (boosted / (boosted * boosted + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
        };

        let mut pos_sum: f32 = valences.iter().filter(|v| **v > 0.0).map(|v| v + 1.0).sum();
        let mut neg_sum: f32 = valences.iter().filter(|v| **v < 0.0).map(|v| v - 1.0).sum();
        let neu_count = valences.iter().filter(|v| **v == 0.0).count() as f32;

        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        if total == 0.0 {
            return LexicalScores {
                compound,
                ..LexicalScores::default()
            };
        }

        LexicalScores {
            positive: (pos_sum / total).abs(),
            negative: (neg_sum / total).abs(),
            neutral: (neu_count / total).abs(),
            compound,
        }
    }
}

impl Default for ValenceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn punctuation_emphasis(text: &str) -> f32 {
    let exclamations = text.matches('!').count().min(4) as f32;
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f32 * QUESTION_INCREMENT,
        _ => 0.96,
    };

    exclamations * EXCLAMATION_INCREMENT + question_emphasis
}

/// Averaging estimator over opinion words
pub struct PatternEstimator {
    lexicon: HashMap<&'static str, (f32, f32)>,
    intensifiers: HashMap<&'static str, f32>,
    negations: HashSet<&'static str>,
}

impl PatternEstimator {
    pub fn new() -> Self {
        Self {
            lexicon: PATTERN_LEXICON
                .iter()
                .map(|(word, polarity, subjectivity)| (*word, (*polarity, *subjectivity)))
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Mean polarity and subjectivity of the opinion words in `text`
    pub fn sentiment(&self, text: &str) -> PatternScores {
        let lowered: Vec<String> = tokenize(text).iter().map(|t| t.to_lowercase()).collect();

        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for (i, word) in lowered.iter().enumerate() {
            let Some(&(mut polarity, mut subjectivity)) = self.lexicon.get(word.as_str()) else {
                continue;
            };

            let mut j = i;
            while j > 0 {
                j -= 1;
                let prev = lowered[j].as_str();
                if let Some(&factor) = self.intensifiers.get(prev) {
                    polarity *= factor;
                    subjectivity *= factor;
                } else if is_negation(prev, &self.negations) {
                    polarity *= -0.5;
                    break;
                } else {
                    break;
                }
            }

            polarities.push(polarity.clamp(-1.0, 1.0));
            subjectivities.push(subjectivity.clamp(0.0, 1.0));
        }

        if polarities.is_empty() {
            return PatternScores::default();
        }

        let n = polarities.len() as f32;
        PatternScores {
            polarity: polarities.iter().sum::<f32>() / n,
            subjectivity: subjectivities.iter().sum::<f32>() / n,
        }
    }
}

impl Default for PatternEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_apostrophes() {
        assert_eq!(tokenize("Don't stop, \"please\"!"), vec!["Don't", "stop", "please"]);
    }

    #[test]
    fn test_valence_positive_text() {
        let estimator = ValenceEstimator::new();
        let scores = estimator.polarity_scores("I love this video, great job!");

        assert!(scores.compound > 0.5, "compound was {}", scores.compound);
        assert!(scores.positive > 0.0);
        assert_eq!(scores.negative, 0.0);
        let total = scores.positive + scores.negative + scores.neutral;
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_valence_negation_flips_sign() {
        let estimator = ValenceEstimator::new();
        let plain = estimator.polarity_scores("this is good");
        let negated = estimator.polarity_scores("this is not good");

        assert!(plain.compound > 0.0);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn test_valence_booster_increases_magnitude() {
        let estimator = ValenceEstimator::new();
        let plain = estimator.polarity_scores("this is bad");
        let boosted = estimator.polarity_scores("this is very bad");

        assert!(boosted.compound < plain.compound);
    }

    #[test]
    fn test_valence_neutral_text() {
        let estimator = ValenceEstimator::new();
        let scores = estimator.polarity_scores("the video is ten minutes long");

        assert_eq!(scores.compound, 0.0);
        assert_eq!(scores.positive, 0.0);
        assert_eq!(scores.negative, 0.0);
        assert!((scores.neutral - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_valence_empty_text() {
        let estimator = ValenceEstimator::new();
        assert_eq!(estimator.polarity_scores("   "), LexicalScores::default());
    }

    #[test]
    fn test_pattern_average() {
        let estimator = PatternEstimator::new();
        let scores = estimator.sentiment("great and good");

        assert!((scores.polarity - 0.75).abs() < 1e-6);
        assert!((scores.subjectivity - 0.675).abs() < 1e-6);
    }

    #[test]
    fn test_pattern_negation_and_intensifier() {
        let estimator = PatternEstimator::new();

        let negated = estimator.sentiment("not good");
        assert!((negated.polarity + 0.35).abs() < 1e-6);

        let intensified = estimator.sentiment("very bad");
        assert!((intensified.polarity + 0.91).abs() < 1e-5);
    }

    #[test]
    fn test_pattern_no_opinion_words() {
        let estimator = PatternEstimator::new();
        assert_eq!(estimator.sentiment("the cat sat"), PatternScores::default());
    }
}

//! Theme ranking and keyword extraction
//!
//! Themes come from a fixed taxonomy of keyword sets scored by substring
//! frequency. When nothing in the taxonomy scores, a short list of content
//! heuristics supplies up to three fallback themes.

use crate::config::MAX_FALLBACK_THEMES;
use aho_corasick::AhoCorasick;
use commentlens_core::{Error, Result, SentimentLabel};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Theme taxonomy in declaration order; ties keep this order
const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "appreciation",
        &["love", "amazing", "awesome", "great", "fantastic", "wonderful", "excellent", "brilliant"],
    ),
    (
        "criticism",
        &["bad", "terrible", "awful", "horrible", "worst", "disappointing", "boring"],
    ),
    ("questions", &["why", "how", "what", "when", "where", "who", "?"]),
    (
        "suggestions",
        &["should", "could", "would", "try", "maybe", "suggest", "idea", "think"],
    ),
    (
        "personal_story",
        &["i", "me", "my", "myself", "personal", "experience", "story"],
    ),
    (
        "technical",
        &["code", "programming", "software", "bug", "feature", "technical", "algorithm"],
    ),
    (
        "entertainment",
        &["funny", "hilarious", "laugh", "lol", "haha", "comedy", "entertainment"],
    ),
    (
        "educational",
        &["learn", "tutorial", "explain", "understand", "knowledge", "education"],
    ),
    (
        "emotional",
        &["feel", "emotion", "sad", "happy", "angry", "excited", "worried"],
    ),
    (
        "community",
        &["everyone", "community", "together", "group", "people", "fans"],
    ),
    ("requests", &["please", "can you", "request", "want", "need", "hope"]),
    (
        "spam",
        &["subscribe", "like", "follow", "check out", "click", "link", "promo"],
    ),
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "this", "that", "these", "those", "i",
    "you", "he", "she", "it", "we", "they",
];

const QUESTION_WORDS: &[&str] = &["?", "why", "how", "what", "when", "where"];
const EMOTIONAL_WORDS: &[&str] = &["feel", "love", "hate", "sad", "happy", "angry", "excited"];
const PERSONAL_MARKERS: &[&str] = &["i ", "me ", "my ", "myself"];
const POSITIVE_WORDS: &[&str] = &["great", "awesome", "love", "amazing", "excellent"];
const NEGATIVE_WORDS: &[&str] = &["bad", "terrible", "awful", "hate", "worst"];
const NEGATIVE_INDICATORS: &[&str] = &["bad", "terrible", "sad", "angry", "hate"];

/// A ranked keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
    /// `count` over the number of kept tokens
    pub relevance: f32,
}

/// Substring matchers for the fallback heuristics, checked in this order
struct FallbackMatchers {
    questions: AhoCorasick,
    emotional: AhoCorasick,
    personal: AhoCorasick,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

pub struct ThemeRanker {
    fallback: FallbackMatchers,
    negative_indicators: AhoCorasick,
    stop_words: HashSet<&'static str>,
    punctuation: Regex,
}

fn matcher(words: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::new(words)
        .map_err(|e| Error::classifier(format!("Failed to build theme matcher: {e}")))
}

impl ThemeRanker {
    pub fn new() -> Result<Self> {
        let fallback = FallbackMatchers {
            questions: matcher(QUESTION_WORDS)?,
            emotional: matcher(EMOTIONAL_WORDS)?,
            personal: matcher(PERSONAL_MARKERS)?,
            positive: matcher(POSITIVE_WORDS)?,
            negative: matcher(NEGATIVE_WORDS)?,
        };

        let punctuation = Regex::new(r"[^\w\s']")
            .map_err(|e| Error::classifier(format!("Failed to compile punctuation regex: {e}")))?;

        info!("ThemeRanker initialized with {} themes", THEME_KEYWORDS.len());

        Ok(Self {
            fallback,
            negative_indicators: matcher(NEGATIVE_INDICATORS)?,
            stop_words: STOP_WORDS.iter().copied().collect(),
            punctuation,
        })
    }

    /// Names of the taxonomy themes in declaration order
    pub fn theme_names() -> impl Iterator<Item = &'static str> {
        THEME_KEYWORDS.iter().map(|(name, _)| *name)
    }

    /// Up to `max_themes` theme names, most salient first
    pub fn extract_themes(&self, text: &str, max_themes: usize) -> Vec<String> {
        let text_lower = text.to_lowercase();

        let mut scored: Vec<(&str, usize)> = THEME_KEYWORDS
            .iter()
            .map(|(theme, keywords)| {
                let score = keywords
                    .iter()
                    .map(|keyword| text_lower.matches(keyword).count())
                    .sum::<usize>();
                (*theme, score)
            })
            .filter(|(_, score)| *score > 0)
            .collect();

        if scored.is_empty() {
            return self.content_themes(&text_lower, max_themes);
        }

        // sort_by is stable: equal scores keep taxonomy order
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
            .into_iter()
            .take(max_themes)
            .map(|(theme, _)| theme.to_string())
            .collect()
    }

    /// Heuristic themes for text the taxonomy did not match
    fn content_themes(&self, text_lower: &str, max_themes: usize) -> Vec<String> {
        let matchers = &self.fallback;
        let mut themes = Vec::new();

        if matchers.questions.is_match(text_lower) {
            themes.push("questions");
        }
        if matchers.emotional.is_match(text_lower) {
            themes.push("emotional");
        }
        if matchers.personal.is_match(text_lower) {
            themes.push("personal_story");
        }
        if matchers.positive.is_match(text_lower) {
            themes.push("appreciation");
        } else if matchers.negative.is_match(text_lower) {
            themes.push("criticism");
        }

        themes
            .into_iter()
            .take(MAX_FALLBACK_THEMES.min(max_themes))
            .map(str::to_string)
            .collect()
    }

    /// Most frequent non-stop-words, ties in first-seen order
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<Keyword> {
        let text_lower = text.to_lowercase();
        let cleaned = self.punctuation.replace_all(&text_lower, " ");

        let filtered: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() > 2 && !self.stop_words.contains(*word))
            .collect();

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for &word in &filtered {
            match index.get(word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word, counts.len());
                    counts.push((word, 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = filtered.len() as f32;
        counts
            .into_iter()
            .take(max_keywords)
            .map(|(word, count)| Keyword {
                word: word.to_string(),
                count,
                relevance: count as f32 / total,
            })
            .collect()
    }

    /// Coarse sentiment per taxonomy theme; unknown themes are omitted
    pub fn theme_sentiments(&self, text: &str, themes: &[String]) -> Vec<(String, SentimentLabel)> {
        let text_lower = text.to_lowercase();
        let known: HashSet<&str> = Self::theme_names().collect();

        themes
            .iter()
            .filter(|theme| known.contains(theme.as_str()))
            .map(|theme| {
                let label = match theme.as_str() {
                    "appreciation" | "entertainment" => SentimentLabel::Positive,
                    "criticism" | "emotional" if self.negative_indicators.is_match(&text_lower) => {
                        SentimentLabel::Negative
                    }
                    _ => SentimentLabel::Neutral,
                };
                (theme.clone(), label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranker() -> ThemeRanker {
        ThemeRanker::new().unwrap()
    }

    #[test]
    fn test_themes_sorted_by_score() {
        let themes = ranker().extract_themes("Awesome tutorial, great and amazing code", 5);

        // appreciation: awesome, great, amazing = 3
        assert_eq!(themes[0], "appreciation");
        assert!(themes.contains(&"technical".to_string()));
        assert!(themes.contains(&"educational".to_string()));
    }

    #[test]
    fn test_ties_keep_taxonomy_order() {
        // technical: code = 1, entertainment: funny = 1, community: fans = 1
        let themes = ranker().extract_themes("funny code fans", 5);
        assert_eq!(themes, vec!["technical", "entertainment", "community"]);
    }

    #[test]
    fn test_max_themes_truncates() {
        let text = "love code funny learn feel everyone please subscribe why should";
        let themes = ranker().extract_themes(text, 2);
        assert_eq!(themes.len(), 2);
    }

    #[test]
    fn test_fallback_when_nothing_scores() {
        // "hate" is an emotional fallback word but not a taxonomy keyword
        let themes = ranker().extract_themes("HATE", 5);
        assert_eq!(themes, vec!["emotional", "criticism"]);
    }

    #[test]
    fn test_fallback_respects_max_themes() {
        assert_eq!(ranker().extract_themes("HATE", 1), vec!["emotional"]);
        assert!(ranker().extract_themes("HATE", 0).is_empty());
        assert_eq!(ranker().extract_themes("HATE", 2), vec!["emotional", "criticism"]);
    }

    #[test]
    fn test_no_themes_for_empty_text() {
        assert!(ranker().extract_themes("", 5).is_empty());
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = ranker().extract_keywords(
            "Rust rust RUST! The borrow checker is great, the borrow checker's great.",
            3,
        );

        assert_eq!(keywords[0].word, "rust");
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].word, "borrow");
        assert_eq!(keywords[1].count, 2);
        assert_eq!(keywords[2].word, "great");
        // rust x3, borrow x2, checker, great x2, checker's = 9 kept tokens
        assert!((keywords[0].relevance - 3.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_keywords_drop_short_and_stop_words() {
        let keywords = ranker().extract_keywords("it is an ok day to be", 10);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].word, "day");
        assert_eq!(keywords[0].relevance, 1.0);
    }

    #[test]
    fn test_theme_sentiments() {
        let themes = vec![
            "appreciation".to_string(),
            "emotional".to_string(),
            "questions".to_string(),
            "not_a_theme".to_string(),
        ];
        let labels = ranker().theme_sentiments("so sad this ended, loved it", &themes);

        assert_eq!(
            labels,
            vec![
                ("appreciation".to_string(), SentimentLabel::Positive),
                ("emotional".to_string(), SentimentLabel::Negative),
                ("questions".to_string(), SentimentLabel::Neutral),
            ]
        );
    }
}

//! Per-comment fusion of the four analysis axes
//!
//! Sentiment, toxicity, themes and tags run as independent futures joined
//! on the calling task. A panic in any axis fails the whole comment; every
//! other failure is absorbed inside the axis itself.

use crate::config::DEFAULT_MAX_THEMES;
use crate::perspective::ToxicityService;
use crate::sentiment::SentimentScorer;
use crate::tagger::TagClassifier;
use crate::themes::ThemeRanker;
use crate::toxicity::{ToxicityReport, ToxicityScorer};
use commentlens_core::{AnalysisResult, Comment, Error, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs every scorer over one comment and assembles the fused record
#[derive(Clone)]
pub struct FusionOrchestrator {
    sentiment: Arc<SentimentScorer>,
    toxicity: Arc<ToxicityScorer>,
    themes: Arc<ThemeRanker>,
    tagger: Arc<TagClassifier>,
    external: Arc<dyn ToxicityService>,
    max_themes: usize,
}

impl FusionOrchestrator {
    /// Build all local scorers around an external toxicity service
    pub fn new(external: Arc<dyn ToxicityService>) -> Result<Self> {
        Ok(Self {
            sentiment: Arc::new(SentimentScorer::new()),
            toxicity: Arc::new(ToxicityScorer::new()?),
            themes: Arc::new(ThemeRanker::new()?),
            tagger: Arc::new(TagClassifier::new()?),
            external,
            max_themes: DEFAULT_MAX_THEMES,
        })
    }

    /// Cap the number of themes per comment
    pub fn with_max_themes(mut self, max_themes: usize) -> Self {
        self.max_themes = max_themes;
        self
    }

    pub fn sentiment(&self) -> &SentimentScorer {
        &self.sentiment
    }

    pub fn toxicity(&self) -> &ToxicityScorer {
        &self.toxicity
    }

    pub fn themes(&self) -> &ThemeRanker {
        &self.themes
    }

    pub fn tagger(&self) -> &TagClassifier {
        &self.tagger
    }

    pub fn external(&self) -> &dyn ToxicityService {
        self.external.as_ref()
    }

    pub fn max_themes(&self) -> usize {
        self.max_themes
    }

    /// Analyze one comment.
    ///
    /// All four axes must finish for a result to exist. If any of them
    /// panics the comment fails with [`Error::Analysis`].
    pub async fn analyze_comment(&self, comment: &Comment) -> Result<AnalysisResult> {
        let start = Instant::now();
        let text = comment.text.as_str();

        let sentiment = guarded("sentiment", async { self.sentiment.analyze(text) });
        let toxicity = guarded("toxicity", self.combined_toxicity(text));
        let themes = guarded("themes", async {
            self.themes.extract_themes(text, self.max_themes)
        });
        let tags = guarded("tags", async { self.tagger.tag(text) });

        let joined = futures::join!(sentiment, toxicity, themes, tags);

        let (sentiment, toxicity_score, themes, tags) = match joined {
            (Ok(s), Ok(t), Ok(th), Ok(tg)) => (s, t, th, tg),
            (s, t, th, tg) => {
                let reason = [s.err(), t.err(), th.err(), tg.err()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!("Analysis failed for comment {}: {}", comment.id, reason);
                metrics::counter!("commentlens_analysis_failures_total").increment(1);
                return Err(Error::analysis(&comment.id, reason));
            }
        };

        let elapsed = start.elapsed();
        metrics::counter!("commentlens_comments_analyzed_total").increment(1);
        metrics::histogram!("commentlens_analysis_latency_us").record(elapsed.as_micros() as f64);
        debug!(
            "Analyzed comment {} in {:?}: {} (toxicity {:.3})",
            comment.id, elapsed, sentiment.label, toxicity_score
        );

        Ok(AnalysisResult {
            comment_id: comment.id.clone(),
            sentiment_label: sentiment.label,
            sentiment_score: sentiment.score,
            toxicity_score,
            themes,
            emotions: sentiment.emotion_distribution,
            tags: tags.tags,
            primary_tag: tags.primary_tag,
        })
    }

    /// Local score blended with the external service score
    pub async fn combined_toxicity(&self, text: &str) -> f32 {
        let local = self.toxicity.analyze(text);
        let external = self.external.analyze_toxicity(text).await;
        ToxicityScorer::combine(local, external)
    }

    /// Full toxicity breakdown, including matched elements
    pub async fn toxicity_report(&self, text: &str) -> ToxicityReport {
        let external = self.external.analyze_toxicity(text).await;
        self.toxicity.report(text, external)
    }
}

/// Run one axis, turning a panic into a reason string
async fn guarded<T>(axis: &'static str, fut: impl Future<Output = T>) -> std::result::Result<T, String> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|payload| format!("{axis} analysis panicked: {}", panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

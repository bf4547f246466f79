//! Mock toxicity services for testing
//!
//! Configurable implementations of the ToxicityService trait for exercising
//! the fusion orchestrator's external-score handling.

use async_trait::async_trait;
use commentlens_classifiers::{AttributeScores, FusionOrchestrator, ToxicityService};
use commentlens_core::{Comment, Error, Result, SentimentLabel};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A configurable mock service
pub struct MockService {
    name: String,
    scores: AttributeScores,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockService {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scores: AttributeScores::default(),
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Return the same value for every attribute
    pub fn with_uniform_score(mut self, score: f32) -> Self {
        self.scores = AttributeScores {
            toxicity: score,
            severe_toxicity: score,
            identity_attack: score,
            insult: score,
            profanity: score,
            threat: score,
        };
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ToxicityService for MockService {
    async fn analyze_detailed(&self, _text: &str) -> Result<AttributeScores> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self.scores)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A service that always fails
pub struct FailingService {
    error_message: String,
}

impl FailingService {
    pub fn new() -> Self {
        Self {
            error_message: "Simulated service failure".to_string(),
        }
    }
}

#[async_trait]
impl ToxicityService for FailingService {
    async fn analyze_detailed(&self, _text: &str) -> Result<AttributeScores> {
        Err(Error::external(&self.error_message))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn test_external_service_called_once_per_comment() {
    let service = Arc::new(MockService::new("mock").with_uniform_score(0.5));
    let fusion = FusionOrchestrator::new(service.clone()).unwrap();

    for i in 0..3 {
        let comment = Comment::new(format!("c{i}"), "nice video");
        fusion.analyze_comment(&comment).await.unwrap();
    }

    assert_eq!(service.call_count(), 3);
}

#[tokio::test]
async fn test_external_score_is_blended() {
    let service = Arc::new(MockService::new("mock").with_uniform_score(0.5));
    let fusion = FusionOrchestrator::new(service).unwrap();

    let result = fusion
        .analyze_comment(&Comment::new("c1", "What a lovely day"))
        .await
        .unwrap();

    // local 0.0, external blend 0.5
    assert!((result.toxicity_score - 0.15).abs() < 1e-6);
}

#[tokio::test]
async fn test_slow_service_still_completes() {
    let service = Arc::new(
        MockService::new("slow")
            .with_uniform_score(1.0)
            .with_latency(Duration::from_millis(20)),
    );
    let fusion = FusionOrchestrator::new(service).unwrap();

    let result = fusion
        .analyze_comment(&Comment::new("c1", "I love this video, great job!"))
        .await
        .unwrap();

    assert_eq!(result.sentiment_label, SentimentLabel::Positive);
    assert!((result.toxicity_score - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_failing_service_degrades_to_local() {
    let fusion = FusionOrchestrator::new(Arc::new(FailingService::new())).unwrap();

    let result = fusion
        .analyze_comment(&Comment::new("c1", "you're stupid, kill yourself"))
        .await
        .unwrap();

    assert!((result.toxicity_score - 0.9 * 0.7).abs() < 1e-6);
    assert!(result.tags.contains(&"Hate Speech".to_string()));
    assert!(result.tags.contains(&"Toxicity".to_string()));
}

#[tokio::test]
async fn test_results_are_deterministic() {
    let fusion = FusionOrchestrator::new(Arc::new(MockService::new("mock"))).unwrap();
    let comment = Comment::new("c1", "Why is the audio so bad at 2:30? Please fix it!!!!");

    let first = fusion.analyze_comment(&comment).await.unwrap();
    let second = fusion.analyze_comment(&comment).await.unwrap();

    assert_eq!(first, second);
}

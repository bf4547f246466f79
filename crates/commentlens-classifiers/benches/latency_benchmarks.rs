//! Latency benchmarks for the comment scorers
//!
//! Local scorers are pure CPU work and should stay well under a millisecond
//! for typical comment lengths. The fusion benchmark uses an unconfigured
//! external service so no network I/O is measured.
//!
//! Run with: cargo bench -p commentlens-classifiers

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

use commentlens_classifiers::{
    AttributeScores, FusionOrchestrator, SentimentScorer, TagClassifier, ThemeRanker,
    ToxicityScorer, ToxicityService,
};
use commentlens_core::{Comment, Error, Result};

const TEST_CASES: &[(&str, &str)] = &[
    ("short_clean", "I love this video, great job!"),
    ("short_toxic", "you're stupid, kill yourself"),
    ("question", "How did you get the audio that clean? What mic is that?"),
    (
        "long_mixed",
        "Honestly the editing at 3:45 was amazing but the music was way too loud. \
         Could you add subtitles next time? My friends and I watch every episode \
         together and we think the tutorial series is the best thing on the channel!!!",
    ),
];

struct Offline;

#[async_trait]
impl ToxicityService for Offline {
    async fn analyze_detailed(&self, _text: &str) -> Result<AttributeScores> {
        Err(Error::external("offline"))
    }

    fn name(&self) -> &str {
        "offline"
    }

    fn is_configured(&self) -> bool {
        false
    }
}

fn benchmark_local_scorers(c: &mut Criterion) {
    let sentiment = SentimentScorer::new();
    let toxicity = ToxicityScorer::new().expect("Failed to create toxicity scorer");
    let themes = ThemeRanker::new().expect("Failed to create theme ranker");
    let tagger = TagClassifier::new().expect("Failed to create tagger");

    let mut group = c.benchmark_group("Local_Scorers");
    group.sample_size(100);

    for (name, text) in TEST_CASES {
        group.bench_with_input(BenchmarkId::new("sentiment", name), text, |b, text| {
            b.iter(|| sentiment.analyze(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("toxicity", name), text, |b, text| {
            b.iter(|| toxicity.analyze(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("themes", name), text, |b, text| {
            b.iter(|| themes.extract_themes(black_box(text), 5))
        });
        group.bench_with_input(BenchmarkId::new("tags", name), text, |b, text| {
            b.iter(|| tagger.tag(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_fusion(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let fusion = FusionOrchestrator::new(Arc::new(Offline)).expect("Failed to create orchestrator");

    let mut group = c.benchmark_group("Fusion");
    group.sample_size(100);

    for (name, text) in TEST_CASES {
        let comment = Comment::new(*name, *text);
        group.bench_with_input(BenchmarkId::new("analyze_comment", name), &comment, |b, comment| {
            b.iter(|| rt.block_on(async { fusion.analyze_comment(black_box(comment)).await.unwrap() }))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_local_scorers, benchmark_fusion);
criterion_main!(benches);

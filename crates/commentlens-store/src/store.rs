//! Comment store contract and persisted records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use commentlens_core::{AnalysisResult, Comment, EmotionDistribution, Result, SentimentLabel};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Analysis columns written back to a comment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisUpdate {
    pub sentiment: SentimentLabel,
    pub sentiment_score: f32,
    pub toxicity_score: f32,
    pub themes: Vec<String>,
    pub emotions: EmotionDistribution,
    pub tags: Vec<String>,
    pub analysis_completed_at: DateTime<Utc>,
}

impl AnalysisUpdate {
    /// Update for `result`, stamped now
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self::completed_at(result, Utc::now())
    }

    pub fn completed_at(result: &AnalysisResult, at: DateTime<Utc>) -> Self {
        Self {
            sentiment: result.sentiment_label,
            sentiment_score: result.sentiment_score,
            toxicity_score: result.toxicity_score,
            themes: result.themes.clone(),
            emotions: result.emotions,
            tags: result.tags.clone(),
            analysis_completed_at: at,
        }
    }
}

impl From<&AnalysisResult> for AnalysisUpdate {
    fn from(result: &AnalysisResult) -> Self {
        Self::from_result(result)
    }
}

/// A comment row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredComment {
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub video_id: Option<String>,

    /// Null until the comment has been analyzed
    #[serde(default)]
    pub sentiment: Option<SentimentLabel>,

    #[serde(default)]
    pub sentiment_score: Option<f32>,

    #[serde(default)]
    pub toxicity_score: Option<f32>,

    #[serde(default)]
    pub themes: Option<Vec<String>>,

    #[serde(default)]
    pub emotions: Option<EmotionDistribution>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub analysis_completed_at: Option<DateTime<Utc>>,
}

impl StoredComment {
    /// An unanalyzed row
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            video_id: None,
            sentiment: None,
            sentiment_score: None,
            toxicity_score: None,
            themes: None,
            emotions: None,
            tags: None,
            analysis_completed_at: None,
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn is_analyzed(&self) -> bool {
        self.sentiment.is_some()
    }

    /// Overwrite the analysis columns
    pub fn apply(&mut self, update: &AnalysisUpdate) {
        self.sentiment = Some(update.sentiment);
        self.sentiment_score = Some(update.sentiment_score);
        self.toxicity_score = Some(update.toxicity_score);
        self.themes = Some(update.themes.clone());
        self.emotions = Some(update.emotions);
        self.tags = Some(update.tags.clone());
        self.analysis_completed_at = Some(update.analysis_completed_at);
    }

    /// An unanalyzed row for `comment`
    pub fn from_comment(comment: &Comment) -> Self {
        let row = Self::new(&comment.id, &comment.text);
        match &comment.source_ref {
            Some(video_id) => row.with_video(video_id),
            None => row,
        }
    }

    /// The analyzable input carried by this row
    pub fn to_comment(&self) -> Comment {
        let comment = Comment::new(&self.id, &self.content);
        match &self.video_id {
            Some(video_id) => comment.with_source(video_id),
            None => comment,
        }
    }
}

/// What triggered an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Deferred processing of an oversized batch request
    Batch,
    /// Re-analysis of comments that were never scored
    Reprocess,
}

/// Tracking record for one background analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub total: usize,
    pub succeeded: usize,
    /// Comments that failed analysis or could not be persisted
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisJob {
    pub fn start(kind: JobKind, total: usize) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            kind,
            total,
            succeeded: 0,
            failed: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Persistence collaborator for analysis results
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Point update of a comment's analysis columns, keyed by id
    async fn update_comment_analysis(&self, comment_id: &str, update: &AnalysisUpdate)
        -> Result<()>;

    async fn get_comment(&self, comment_id: &str) -> Result<Option<StoredComment>>;

    /// Up to `limit` comments with no sentiment yet
    async fn get_unanalyzed_comments(&self, limit: usize) -> Result<Vec<StoredComment>>;

    async fn log_analysis_job(&self, job: &AnalysisJob) -> Result<()>;

    /// Store name for logs
    fn name(&self) -> &str;

    /// Make sure rows exist for comments about to be persisted, returning
    /// how many were created.
    ///
    /// Rows in a remote store come from ingestion, so the default does nothing.
    async fn register_comments(&self, _comments: &[StoredComment]) -> Result<usize> {
        Ok(0)
    }

    /// Apply updates one by one, returning how many succeeded.
    ///
    /// A failed update is logged and does not stop the rest.
    async fn batch_update_comments(&self, updates: &[(String, AnalysisUpdate)]) -> Result<usize> {
        let mut updated = 0;
        for (comment_id, update) in updates {
            match self.update_comment_analysis(comment_id, update).await {
                Ok(()) => updated += 1,
                Err(e) => warn!("Failed to update comment {}: {}", comment_id, e),
            }
        }

        info!("Batch updated {}/{} comments", updated, updates.len());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> AnalysisResult {
        AnalysisResult {
            comment_id: "c1".to_string(),
            sentiment_label: SentimentLabel::Negative,
            sentiment_score: -0.4,
            toxicity_score: 0.63,
            themes: vec!["criticism".to_string()],
            emotions: EmotionDistribution::default(),
            tags: vec!["Hate Speech".to_string(), "Toxicity".to_string()],
            primary_tag: Some("Hate Speech".to_string()),
        }
    }

    #[test]
    fn test_update_wire_shape() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let update = AnalysisUpdate::completed_at(&result(), at);
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["tags"][1], "Toxicity");
        assert_eq!(json["analysis_completed_at"], "2024-05-01T12:00:00Z");
        assert!(json.get("primary_tag").is_none());
        assert!(json.get("comment_id").is_none());
    }

    #[test]
    fn test_apply_marks_analyzed() {
        let mut row = StoredComment::new("c1", "meh").with_video("v1");
        assert!(!row.is_analyzed());

        row.apply(&AnalysisUpdate::from_result(&result()));

        assert!(row.is_analyzed());
        assert_eq!(row.sentiment, Some(SentimentLabel::Negative));
        assert_eq!(row.toxicity_score, Some(0.63));
        assert!(row.analysis_completed_at.is_some());
    }

    #[test]
    fn test_stored_comment_from_row() {
        let row: StoredComment = serde_json::from_str(
            r#"{"id": "c9", "content": "first!", "video_id": "v2", "sentiment": null, "likes": 4}"#,
        )
        .unwrap();

        assert!(!row.is_analyzed());
        let comment = row.to_comment();
        assert_eq!(comment.id, "c9");
        assert_eq!(comment.text, "first!");
        assert_eq!(comment.source_ref.as_deref(), Some("v2"));
    }

    #[test]
    fn test_job_lifecycle() {
        let mut job = AnalysisJob::start(JobKind::Batch, 3);
        job.record_success();
        job.record_success();
        job.record_failure();
        assert!(!job.is_finished());

        job.finish();
        assert!(job.is_finished());
        assert_eq!(job.succeeded + job.failed, job.total);

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["kind"], "batch");
        assert_eq!(json["job_id"], job.job_id.to_string());
    }
}

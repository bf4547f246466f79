//! In-process comment store
//!
//! Used when no remote store is configured, and as a test double.

use crate::store::{AnalysisJob, AnalysisUpdate, CommentStore, StoredComment};
use async_trait::async_trait;
use commentlens_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Jobs kept by default before the oldest are dropped
pub const DEFAULT_JOB_HISTORY: usize = 1000;

#[derive(Default)]
struct Inner {
    comments: HashMap<String, StoredComment>,
    /// Insertion order of comment ids
    order: Vec<String>,
    jobs: VecDeque<AnalysisJob>,
}

/// Comment store held in memory
pub struct MemoryCommentStore {
    inner: RwLock<Inner>,
    job_history: usize,
}

impl Default for MemoryCommentStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            job_history: DEFAULT_JOB_HISTORY,
        }
    }
}

impl MemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `job_history` logged jobs, newest last
    pub fn with_job_history(mut self, job_history: usize) -> Self {
        self.job_history = job_history;
        self
    }

    /// Seed the store with rows
    pub fn with_comments(comments: impl IntoIterator<Item = StoredComment>) -> Self {
        let store = Self::new();
        for comment in comments {
            store.insert(comment);
        }
        store
    }

    /// Insert or replace a row
    pub fn insert(&self, comment: StoredComment) {
        let mut inner = self.inner.write();
        if !inner.comments.contains_key(&comment.id) {
            inner.order.push(comment.id.clone());
        }
        inner.comments.insert(comment.id.clone(), comment);
    }

    pub fn len(&self) -> usize {
        self.inner.read().comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retained jobs, oldest first
    pub fn jobs(&self) -> Vec<AnalysisJob> {
        self.inner.read().jobs.iter().cloned().collect()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn update_comment_analysis(
        &self,
        comment_id: &str,
        update: &AnalysisUpdate,
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let row = inner
            .comments
            .get_mut(comment_id)
            .ok_or_else(|| Error::store(format!("comment {comment_id} not found")))?;

        row.apply(update);
        debug!("Updated analysis for comment {}", comment_id);
        Ok(())
    }

    async fn get_comment(&self, comment_id: &str) -> Result<Option<StoredComment>> {
        Ok(self.inner.read().comments.get(comment_id).cloned())
    }

    async fn get_unanalyzed_comments(&self, limit: usize) -> Result<Vec<StoredComment>> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.comments.get(id))
            .filter(|row| !row.is_analyzed())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn log_analysis_job(&self, job: &AnalysisJob) -> Result<()> {
        let mut inner = self.inner.write();
        inner.jobs.push_back(job.clone());
        while inner.jobs.len() > self.job_history {
            inner.jobs.pop_front();
        }
        debug!("Analysis job logged: {}", job.job_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }

    /// Insert rows for unknown ids; existing rows are left untouched
    async fn register_comments(&self, comments: &[StoredComment]) -> Result<usize> {
        let mut inner = self.inner.write();
        let mut created = 0;
        for comment in comments {
            if inner.comments.contains_key(&comment.id) {
                continue;
            }
            inner.order.push(comment.id.clone());
            inner.comments.insert(comment.id.clone(), comment.clone());
            created += 1;
        }
        debug!("Registered {} new comments", created);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JobKind;
    use chrono::Utc;
    use commentlens_core::{EmotionDistribution, SentimentLabel};

    fn update() -> AnalysisUpdate {
        AnalysisUpdate {
            sentiment: SentimentLabel::Positive,
            sentiment_score: 0.7,
            toxicity_score: 0.0,
            themes: vec!["appreciation".to_string()],
            emotions: EmotionDistribution::default(),
            tags: vec!["Product Praise".to_string()],
            analysis_completed_at: Utc::now(),
        }
    }

    fn seeded() -> MemoryCommentStore {
        MemoryCommentStore::with_comments(
            (1..=5).map(|i| StoredComment::new(format!("c{i}"), format!("comment {i}"))),
        )
    }

    #[tokio::test]
    async fn test_update_and_get() {
        let store = seeded();
        store.update_comment_analysis("c2", &update()).await.unwrap();

        let row = store.get_comment("c2").await.unwrap().unwrap();
        assert_eq!(row.sentiment, Some(SentimentLabel::Positive));
        assert_eq!(row.tags.as_deref(), Some(&["Product Praise".to_string()][..]));
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let store = seeded();
        let update = update();
        store.update_comment_analysis("c1", &update).await.unwrap();
        let first = store.get_comment("c1").await.unwrap();
        store.update_comment_analysis("c1", &update).await.unwrap();

        assert_eq!(store.get_comment("c1").await.unwrap(), first);
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn test_update_unknown_comment_fails() {
        let store = seeded();
        let err = store
            .update_comment_analysis("missing", &update())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(store.get_comment("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unanalyzed_in_insertion_order() {
        let store = seeded();
        store.update_comment_analysis("c1", &update()).await.unwrap();
        store.update_comment_analysis("c3", &update()).await.unwrap();

        let ids: Vec<String> = store
            .get_unanalyzed_comments(10)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, vec!["c2", "c4", "c5"]);

        assert_eq!(store.get_unanalyzed_comments(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_update_skips_failures() {
        let store = seeded();
        let updates = vec![
            ("c1".to_string(), update()),
            ("nope".to_string(), update()),
            ("c2".to_string(), update()),
        ];

        let updated = store.batch_update_comments(&updates).await.unwrap();
        assert_eq!(updated, 2);
        assert_eq!(store.get_unanalyzed_comments(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_log_job() {
        let store = MemoryCommentStore::new();
        assert!(store.is_empty());

        let mut job = AnalysisJob::start(JobKind::Reprocess, 0);
        job.finish();
        store.log_analysis_job(&job).await.unwrap();

        let jobs = store.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, job.job_id);
    }

    #[tokio::test]
    async fn test_register_comments_keeps_existing_rows() {
        let store = seeded();
        store.update_comment_analysis("c1", &update()).await.unwrap();

        let rows = vec![
            StoredComment::new("c1", "replacement text"),
            StoredComment::new("c9", "fresh comment").with_video("v1"),
        ];
        let created = store.register_comments(&rows).await.unwrap();

        assert_eq!(created, 1);
        assert_eq!(store.len(), 6);
        let kept = store.get_comment("c1").await.unwrap().unwrap();
        assert_eq!(kept.content, "comment 1");
        assert!(kept.is_analyzed());

        store.update_comment_analysis("c9", &update()).await.unwrap();
        let fresh = store.get_comment("c9").await.unwrap().unwrap();
        assert_eq!(fresh.video_id.as_deref(), Some("v1"));
        assert!(fresh.is_analyzed());
    }

    #[tokio::test]
    async fn test_job_history_is_capped() {
        let store = MemoryCommentStore::new().with_job_history(3);

        let mut ids = Vec::new();
        for total in 0..5 {
            let job = AnalysisJob::start(JobKind::Batch, total);
            ids.push(job.job_id);
            store.log_analysis_job(&job).await.unwrap();
        }

        let kept: Vec<_> = store.jobs().into_iter().map(|job| job.job_id).collect();
        assert_eq!(kept, ids[2..].to_vec());
    }
}

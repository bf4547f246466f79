//! Batch coordination
//!
//! Small batches are analyzed in request order and returned directly.
//! Larger ones are handed to a tracked background task that persists each
//! result through the comment store and records an analysis job. Shutdown
//! waits for tracked tasks to run to completion.

use commentlens_classifiers::FusionOrchestrator;
use commentlens_core::{AnalysisResult, Comment, Result};
use commentlens_store::{AnalysisJob, AnalysisUpdate, CommentStore, JobKind, StoredComment};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

/// Largest batch answered synchronously
pub const DEFAULT_SYNC_BATCH_LIMIT: usize = 10;

/// Response to a batch request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    /// Every comment that could be analyzed, in input order
    Completed { results: Vec<AnalysisResult> },

    /// The batch was scheduled for background processing
    Processing { message: String },
}

#[derive(Clone)]
pub struct BatchCoordinator {
    fusion: FusionOrchestrator,
    store: Arc<dyn CommentStore>,
    sync_limit: usize,
    background: TaskTracker,
}

impl BatchCoordinator {
    pub fn new(fusion: FusionOrchestrator, store: Arc<dyn CommentStore>) -> Self {
        Self {
            fusion,
            store,
            sync_limit: DEFAULT_SYNC_BATCH_LIMIT,
            background: TaskTracker::new(),
        }
    }

    pub fn with_sync_limit(mut self, sync_limit: usize) -> Self {
        self.sync_limit = sync_limit;
        self
    }

    pub fn fusion(&self) -> &FusionOrchestrator {
        &self.fusion
    }

    pub fn store(&self) -> &dyn CommentStore {
        self.store.as_ref()
    }

    pub fn sync_limit(&self) -> usize {
        self.sync_limit
    }

    /// Analyze a batch, inline when it fits under the sync limit.
    ///
    /// Comments whose analysis fails are logged and left out of the results.
    pub async fn analyze_batch(&self, comments: Vec<Comment>) -> BatchOutcome {
        info!("Starting batch analysis for {} comments", comments.len());

        if comments.len() > self.sync_limit {
            let rows: Vec<StoredComment> =
                comments.iter().map(StoredComment::from_comment).collect();
            match self.store.register_comments(&rows).await {
                Ok(0) => {}
                Ok(created) => info!("Registered {} new comments with the store", created),
                Err(e) => warn!("Failed to register batch comments: {}", e),
            }

            let coordinator = self.clone();
            self.background.spawn(async move {
                coordinator
                    .process_in_background(JobKind::Batch, comments)
                    .await;
            });

            return BatchOutcome::Processing {
                message: "Batch analysis started".to_string(),
            };
        }

        let mut results = Vec::with_capacity(comments.len());
        for comment in &comments {
            match self.fusion.analyze_comment(comment).await {
                Ok(result) => results.push(result),
                Err(e) => error!("Failed to analyze comment {}: {}", comment.id, e),
            }
        }

        BatchOutcome::Completed { results }
    }

    /// Analyze and persist comments one at a time.
    ///
    /// Analysis and persistence failures are counted on the job and never
    /// stop the run. The finished job is logged to the store.
    pub async fn process_in_background(&self, kind: JobKind, comments: Vec<Comment>) -> AnalysisJob {
        let mut job = AnalysisJob::start(kind, comments.len());
        info!(
            "Processing batch of {} comments in background (job {})",
            comments.len(),
            job.job_id
        );

        for comment in &comments {
            let result = match self.fusion.analyze_comment(comment).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Failed to process comment {}: {}", comment.id, e);
                    job.record_failure();
                    continue;
                }
            };

            let update = AnalysisUpdate::from_result(&result);
            match self.store.update_comment_analysis(&comment.id, &update).await {
                Ok(()) => job.record_success(),
                Err(e) => {
                    error!("Failed to persist analysis for comment {}: {}", comment.id, e);
                    metrics::counter!("commentlens_persist_failures_total").increment(1);
                    job.record_failure();
                }
            }
        }

        job.finish();
        if let Err(e) = self.store.log_analysis_job(&job).await {
            warn!("Failed to log analysis job {}: {}", job.job_id, e);
        }

        info!(
            "Batch analysis completed (job {}): {} succeeded, {} failed",
            job.job_id, job.succeeded, job.failed
        );
        job
    }

    /// Number of background batches still running
    pub fn pending_batches(&self) -> usize {
        self.background.len()
    }

    /// Wait for every background batch spawned so far to finish
    pub async fn shutdown(&self) {
        self.background.close();
        self.background.wait().await;
    }

    /// Run every not-yet-analyzed comment (up to `limit`) through the
    /// background path and wait for it to finish
    pub async fn reprocess_unanalyzed(&self, limit: usize) -> Result<AnalysisJob> {
        let rows = self.store.get_unanalyzed_comments(limit).await?;
        info!("Reprocessing {} unanalyzed comments", rows.len());

        let comments = rows.iter().map(StoredComment::to_comment).collect();
        Ok(self.process_in_background(JobKind::Reprocess, comments).await)
    }
}

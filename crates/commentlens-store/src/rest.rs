//! PostgREST-backed comment store
//!
//! Speaks the REST dialect exposed by Supabase: rows are filtered with
//! `column=op.value` query parameters and writes ask for the affected rows
//! back so a missing comment can be told apart from a successful update.

use crate::store::{AnalysisJob, AnalysisUpdate, CommentStore, StoredComment};
use async_trait::async_trait;
use commentlens_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,

    /// Service role key
    #[serde(default)]
    pub service_key: Option<String>,

    #[serde(default = "default_comments_table")]
    pub comments_table: String,

    #[serde(default = "default_jobs_table")]
    pub jobs_table: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            comments_table: default_comments_table(),
            jobs_table: default_jobs_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Whether both the URL and the key are present
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
            && self.service_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

fn default_comments_table() -> String {
    "comments".to_string()
}

fn default_jobs_table() -> String {
    "analysis_jobs".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Comment store over a PostgREST endpoint
pub struct RestCommentStore {
    base_url: String,
    comments_table: String,
    jobs_table: String,
    http_client: reqwest::Client,
}

impl RestCommentStore {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let (url, key) = match (&config.url, &config.service_key) {
            (Some(url), Some(key)) if config.is_configured() => (url, key),
            _ => return Err(Error::config("Store URL and service role key are required")),
        };

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(key)
            .map_err(|e| Error::config(format!("Invalid service key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| Error::config(format!("Invalid service key: {e}")))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = url.trim_end_matches('/').to_string();
        info!("RestCommentStore initialized for {}", base_url);

        Ok(Self {
            base_url,
            comments_table: config.comments_table,
            jobs_table: config.jobs_table,
            http_client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn rows<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!("request failed with {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::store(format!("Malformed response: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::store(e.to_string())
    }
}

#[async_trait]
impl CommentStore for RestCommentStore {
    async fn update_comment_analysis(
        &self,
        comment_id: &str,
        update: &AnalysisUpdate,
    ) -> Result<()> {
        let response = self
            .http_client
            .patch(self.table_url(&self.comments_table))
            .query(&[("id", format!("eq.{comment_id}"))])
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;

        let updated: Vec<serde_json::Value> = Self::rows(response).await?;
        if updated.is_empty() {
            return Err(Error::store(format!("comment {comment_id} not found")));
        }

        debug!("Updated analysis for comment {}", comment_id);
        Ok(())
    }

    async fn get_comment(&self, comment_id: &str) -> Result<Option<StoredComment>> {
        let response = self
            .http_client
            .get(self.table_url(&self.comments_table))
            .query(&[("select", "*".to_string()), ("id", format!("eq.{comment_id}"))])
            .send()
            .await
            .map_err(transport_error)?;

        let rows: Vec<StoredComment> = Self::rows(response).await?;
        if rows.is_empty() {
            warn!("Comment {} not found", comment_id);
        }
        Ok(rows.into_iter().next())
    }

    async fn get_unanalyzed_comments(&self, limit: usize) -> Result<Vec<StoredComment>> {
        let response = self
            .http_client
            .get(self.table_url(&self.comments_table))
            .query(&[
                ("select", "*".to_string()),
                ("sentiment", "is.null".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        Self::rows(response).await
    }

    async fn log_analysis_job(&self, job: &AnalysisJob) -> Result<()> {
        let response = self
            .http_client
            .post(self.table_url(&self.jobs_table))
            .json(job)
            .send()
            .await
            .map_err(transport_error)?;

        let _: Vec<serde_json::Value> = Self::rows(response).await?;
        info!("Analysis job logged: {}", job.job_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "rest"
    }
}

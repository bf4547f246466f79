//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use commentlens_classifiers::config::DEFAULT_MAX_KEYWORDS;
use commentlens_classifiers::{Keyword, TagClassifier, ToxicityReport};
use commentlens_core::{AnalysisResult, Comment, SentimentLabel};
use commentlens_store::AnalysisJob;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::batch::BatchOutcome;
use crate::state::AppState;

const DEFAULT_REPROCESS_LIMIT: usize = 100;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/analyze/comment", post(analyze_comment))
        .route("/analyze/batch", post(analyze_batch))
        .route("/analyze/tags", post(analyze_tags))
        .route("/analyze/toxicity", post(analyze_toxicity))
        .route("/analyze/keywords", post(analyze_keywords))
        .route("/reprocess", post(reprocess))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "CommentLens analysis service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let external = state.fusion().external();
    let perspective = if external.is_configured() {
        "ready"
    } else {
        "unconfigured"
    };

    Json(json!({
        "status": "healthy",
        "services": {
            "sentiment_analyzer": "ready",
            "toxicity_detector": "ready",
            "theme_extractor": "ready",
            "comment_tagger": "ready",
            "perspective_api": perspective,
            "store": state.store().name(),
        }
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Single comment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub comment_id: String,
    pub content: String,
    #[serde(default)]
    pub video_id: Option<String>,
}

impl From<CommentRequest> for Comment {
    fn from(req: CommentRequest) -> Self {
        let comment = Comment::new(req.comment_id, req.content);
        match req.video_id {
            Some(video_id) => comment.with_source(video_id),
            None => comment,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub comments: Vec<CommentRequest>,
}

/// Free-text request for the single-axis endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRequest {
    pub content: String,
    #[serde(default)]
    pub max_keywords: Option<usize>,
    #[serde(default)]
    pub max_themes: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    tags: Vec<String>,
    tag_count: usize,
    primary_tag: Option<String>,
    colors: BTreeMap<String, &'static str>,
}

#[derive(Debug, Serialize)]
struct ThemeSentiment {
    theme: String,
    sentiment: SentimentLabel,
}

#[derive(Debug, Serialize)]
struct KeywordsResponse {
    keywords: Vec<Keyword>,
    themes: Vec<String>,
    theme_sentiments: Vec<ThemeSentiment>,
}

#[derive(Debug, Deserialize)]
struct ReprocessParams {
    limit: Option<usize>,
}

async fn analyze_comment(
    State(state): State<AppState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(req) = payload?;
    info!("Analyzing comment: {}", req.comment_id);

    let comment = Comment::from(req);
    let result = state.fusion().analyze_comment(&comment).await?;

    info!("Analysis complete for comment: {}", comment.id);
    Ok(Json(result))
}

async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchOutcome>, AppError> {
    let Json(req) = payload?;
    let comments = req.comments.into_iter().map(Comment::from).collect();

    Ok(Json(state.coordinator.analyze_batch(comments).await))
}

async fn analyze_tags(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<TagsResponse>, AppError> {
    let Json(req) = payload?;
    let result = state.fusion().tagger().tag(&req.content);

    let colors = result
        .tags
        .iter()
        .map(|tag| (tag.clone(), TagClassifier::tag_color(tag)))
        .collect();

    Ok(Json(TagsResponse {
        tags: result.tags,
        tag_count: result.tag_count,
        primary_tag: result.primary_tag,
        colors,
    }))
}

async fn analyze_toxicity(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ToxicityReport>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.fusion().toxicity_report(&req.content).await))
}

async fn analyze_keywords(
    State(state): State<AppState>,
    payload: Result<Json<KeywordRequest>, JsonRejection>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let Json(req) = payload?;
    let ranker = state.fusion().themes();

    let keywords = ranker.extract_keywords(
        &req.content,
        req.max_keywords.unwrap_or(DEFAULT_MAX_KEYWORDS),
    );
    let themes = ranker.extract_themes(
        &req.content,
        req.max_themes.unwrap_or(state.config.analysis.max_themes),
    );
    let theme_sentiments = ranker
        .theme_sentiments(&req.content, &themes)
        .into_iter()
        .map(|(theme, sentiment)| ThemeSentiment { theme, sentiment })
        .collect();

    Ok(Json(KeywordsResponse {
        keywords,
        themes,
        theme_sentiments,
    }))
}

async fn reprocess(
    State(state): State<AppState>,
    Query(params): Query<ReprocessParams>,
) -> Result<Json<AnalysisJob>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_REPROCESS_LIMIT);
    let job = state.coordinator.reprocess_unanalyzed(limit).await?;
    Ok(Json(job))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    AnalysisFailed(String),
    StoreError(String),
    InternalError(String),
}

impl From<commentlens_core::Error> for AppError {
    fn from(err: commentlens_core::Error) -> Self {
        use commentlens_core::Error;

        match err {
            Error::Analysis { .. } => AppError::AnalysisFailed(err.to_string()),
            Error::Store(_) | Error::Timeout => AppError::StoreError(err.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request_error", msg),
            AppError::AnalysisFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "analysis_error",
                format!("Analysis failed: {msg}"),
            ),
            AppError::StoreError(msg) => (StatusCode::BAD_GATEWAY, "store_error", msg),
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}

//! External toxicity service client
//!
//! The service scores six attributes per comment. Its blended score is
//! always optional: any failure (no key, transport error, non-success
//! status, timeout) contributes 0.0 to the combined toxicity.

use crate::config::{attribute_weights, PerspectiveConfig};
use async_trait::async_trait;
use commentlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Attribute names requested from the service
pub const REQUESTED_ATTRIBUTES: [&str; 6] = [
    "TOXICITY",
    "SEVERE_TOXICITY",
    "IDENTITY_ATTACK",
    "INSULT",
    "PROFANITY",
    "THREAT",
];

/// Per-attribute scores, each 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeScores {
    pub toxicity: f32,
    pub severe_toxicity: f32,
    pub identity_attack: f32,
    pub insult: f32,
    pub profanity: f32,
    pub threat: f32,
}

impl AttributeScores {
    /// Weighted blend of the six attributes, capped at 1.0
    pub fn blended(&self) -> f32 {
        let combined = self.toxicity * attribute_weights::TOXICITY
            + self.severe_toxicity * attribute_weights::SEVERE_TOXICITY
            + self.identity_attack * attribute_weights::IDENTITY_ATTACK
            + self.insult * attribute_weights::INSULT
            + self.profanity * attribute_weights::PROFANITY
            + self.threat * attribute_weights::THREAT;
        combined.clamp(0.0, 1.0)
    }

    /// Read scores out of an analyze response; missing attributes are 0.0
    pub fn from_response(response: &AnalyzeResponse) -> Self {
        let value = |name: &str| {
            response
                .attribute_scores
                .get(name)
                .map(|a| a.summary_score.value)
                .unwrap_or(0.0)
        };

        Self {
            toxicity: value("TOXICITY"),
            severe_toxicity: value("SEVERE_TOXICITY"),
            identity_attack: value("IDENTITY_ATTACK"),
            insult: value("INSULT"),
            profanity: value("PROFANITY"),
            threat: value("THREAT"),
        }
    }
}

/// Analyze response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(rename = "attributeScores", default)]
    pub attribute_scores: HashMap<String, AttributeScore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeScore {
    #[serde(rename = "summaryScore")]
    pub summary_score: SummaryScore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryScore {
    #[serde(default)]
    pub value: f32,
}

/// A remote toxicity scorer
#[async_trait]
pub trait ToxicityService: Send + Sync {
    /// Fetch per-attribute scores for `text`
    async fn analyze_detailed(&self, text: &str) -> Result<AttributeScores>;

    /// Service name for logs
    fn name(&self) -> &str;

    /// Whether the service can be called at all
    fn is_configured(&self) -> bool {
        true
    }

    /// Blended score, or 0.0 when the service is unavailable or fails
    async fn analyze_toxicity(&self, text: &str) -> f32 {
        if !self.is_configured() {
            debug!("{} not configured, external toxicity defaults to 0.0", self.name());
            return 0.0;
        }

        match self.analyze_detailed(text).await {
            Ok(scores) => scores.blended(),
            Err(e) => {
                warn!("{} error: {}", self.name(), e);
                metrics::counter!("commentlens_external_toxicity_failures_total").increment(1);
                0.0
            }
        }
    }
}

/// Client for the Perspective comment analyzer
pub struct PerspectiveClient {
    config: PerspectiveConfig,
    http_client: reqwest::Client,
}

impl PerspectiveClient {
    pub fn new(config: PerspectiveConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        if config.api_key.is_none() {
            warn!("Perspective API key not found, external toxicity will default to 0.0");
        } else {
            info!("PerspectiveClient initialized");
        }

        Ok(Self {
            config,
            http_client,
        })
    }

    fn request_body(text: &str) -> serde_json::Value {
        let attributes: serde_json::Map<String, serde_json::Value> = REQUESTED_ATTRIBUTES
            .iter()
            .map(|name| (name.to_string(), json!({})))
            .collect();

        json!({
            "requestedAttributes": attributes,
            "comment": { "text": text },
            "languages": ["en"],
        })
    }
}

#[async_trait]
impl ToxicityService for PerspectiveClient {
    async fn analyze_detailed(&self, text: &str) -> Result<AttributeScores> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::external("No API key available"))?;

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .query(&[("key", api_key)])
            .json(&Self::request_body(text))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::external(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::external(format!("API error: {status}")));
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| Error::external(format!("Malformed response: {e}")))?;

        Ok(AttributeScores::from_response(&body))
    }

    fn name(&self) -> &str {
        "perspective"
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blended_weights() {
        let scores = AttributeScores {
            toxicity: 1.0,
            severe_toxicity: 1.0,
            identity_attack: 0.0,
            insult: 0.0,
            profanity: 0.0,
            threat: 0.0,
        };
        assert!((scores.blended() - 0.7).abs() < 1e-6);

        let all = AttributeScores {
            toxicity: 1.0,
            severe_toxicity: 1.0,
            identity_attack: 1.0,
            insult: 1.0,
            profanity: 1.0,
            threat: 1.0,
        };
        assert!(all.blended() <= 1.0);
    }

    #[test]
    fn test_parse_response_with_missing_attributes() {
        let body = r#"{
            "attributeScores": {
                "TOXICITY": {"summaryScore": {"value": 0.8, "type": "PROBABILITY"}},
                "INSULT": {"summaryScore": {"value": 0.5}}
            },
            "languages": ["en"]
        }"#;
        let response: AnalyzeResponse = serde_json::from_str(body).unwrap();
        let scores = AttributeScores::from_response(&response);

        assert_eq!(scores.toxicity, 0.8);
        assert_eq!(scores.insult, 0.5);
        assert_eq!(scores.threat, 0.0);
        assert!((scores.blended() - (0.8 * 0.4 + 0.5 * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_shape() {
        let body = PerspectiveClient::request_body("hello");
        assert_eq!(body["comment"]["text"], "hello");
        assert_eq!(body["languages"][0], "en");
        for name in REQUESTED_ATTRIBUTES {
            assert!(body["requestedAttributes"].get(name).is_some(), "missing {name}");
        }
    }

    #[tokio::test]
    async fn test_without_key_scores_zero() {
        let client = PerspectiveClient::new(PerspectiveConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert_eq!(client.analyze_toxicity("you idiot").await, 0.0);
        assert!(client.analyze_detailed("you idiot").await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_scores_zero() {
        let client = PerspectiveClient::new(PerspectiveConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://127.0.0.1:9/v1alpha1/comments:analyze".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        assert_eq!(client.analyze_toxicity("you idiot").await, 0.0);
    }
}

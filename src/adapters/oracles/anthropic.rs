//! Oracles backed by the Anthropic Messages API.
//!
//! Both oracles share one [`AnthropicClient`], so the rate limit applies to
//! risk analyses and cluster advisories together. Transient failures are
//! retried with exponential backoff; anything else surfaces immediately and
//! the calling service applies its fallback.

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoffBuilder};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::prompts::{
    advisory_user_prompt, risk_user_prompt, ADVISORY_SYSTEM_PROMPT, RISK_SYSTEM_PROMPT,
};
use crate::domain::errors::{OracleError, OracleResult};
use crate::domain::models::{
    AiAnalysisResult, AnthropicOracleConfig, ClusterContext, OracleConfig, RateLimitConfig,
    RetryConfig, RiskContext,
};
use crate::domain::ports::{AdvisoryOracle, RiskOracle};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Rate-limited, retrying client for the Messages API.
pub struct AnthropicClient {
    http: Client,
    config: AnthropicOracleConfig,
    api_key: String,
    limiter: DefaultDirectRateLimiter,
    retry: RetryConfig,
    timeout_secs: u64,
}

impl AnthropicClient {
    /// Build a client from oracle configuration.
    ///
    /// Fails with [`OracleError::NotConfigured`] when no API key is set in
    /// the config or in `ANTHROPIC_API_KEY`.
    pub fn from_config(config: &OracleConfig) -> OracleResult<Self> {
        let api_key = config
            .anthropic
            .get_api_key()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OracleError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::NotConfigured(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: config.anthropic.clone(),
            api_key,
            limiter: build_limiter(&config.rate_limit)?,
            retry: config.retry.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Send one system/user exchange and return the concatenated text reply.
    pub async fn complete(&self, system: &str, user: &str) -> OracleResult<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };
        let request = &request;

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.retry.initial_backoff_ms))
            .with_max_interval(Duration::from_millis(self.retry.max_backoff_ms))
            .with_max_elapsed_time(None)
            .build();
        let max_retries = self.retry.max_retries;
        let mut attempts = 0u32;

        retry(policy, || {
            attempts += 1;
            let attempt = attempts;
            async move {
                match self.send_once(request).await {
                    Ok(text) => Ok(text),
                    Err(err) if err.is_transient() && attempt <= max_retries => {
                        warn!(attempt, error = %err, "transient oracle failure, retrying");
                        Err(backoff::Error::transient(err))
                    }
                    Err(err) => Err(backoff::Error::permanent(err)),
                }
            }
        })
        .await
    }

    async fn send_once(&self, request: &MessagesRequest<'_>) -> OracleResult<String> {
        self.limiter.until_ready().await;

        let response = self
            .http
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.timeout_secs)
                } else {
                    OracleError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OracleError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        let text = result
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        debug!(chars = text.len(), "oracle reply received");
        Ok(text)
    }
}

fn build_limiter(config: &RateLimitConfig) -> OracleResult<DefaultDirectRateLimiter> {
    let burst = NonZeroU32::new(config.burst_size)
        .ok_or_else(|| OracleError::NotConfigured("burst_size must be positive".to_string()))?;
    if !(config.requests_per_second.is_finite() && config.requests_per_second > 0.0) {
        return Err(OracleError::NotConfigured(
            "requests_per_second must be positive".to_string(),
        ));
    }
    let quota = Quota::with_period(Duration::from_secs_f64(1.0 / config.requests_per_second))
        .ok_or_else(|| OracleError::NotConfigured("rate limit period is zero".to_string()))?
        .allow_burst(burst);
    Ok(RateLimiter::direct(quota))
}

/// Slice out the outermost JSON object, tolerating code fences or prose
/// around it.
fn extract_json(text: &str) -> OracleResult<&str> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(OracleError::MalformedResponse(
            "no JSON object in reply".to_string(),
        )),
    }
}

fn parse_analysis(text: &str) -> OracleResult<AiAnalysisResult> {
    let analysis: AiAnalysisResult = serde_json::from_str(extract_json(text)?)
        .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;
    analysis
        .validate()
        .map_err(OracleError::ContractViolation)?;
    Ok(analysis)
}

/// Risk oracle that asks the model for a structured JSON assessment.
pub struct AnthropicRiskOracle {
    client: Arc<AnthropicClient>,
}

impl AnthropicRiskOracle {
    pub fn new(client: Arc<AnthropicClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RiskOracle for AnthropicRiskOracle {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn analyze(&self, context: &RiskContext) -> OracleResult<AiAnalysisResult> {
        let reply = self
            .client
            .complete(RISK_SYSTEM_PROMPT, &risk_user_prompt(context))
            .await?;
        parse_analysis(&reply)
    }
}

/// Advisory oracle that asks the model for short plain-text guidance.
pub struct AnthropicAdvisoryOracle {
    client: Arc<AnthropicClient>,
}

impl AnthropicAdvisoryOracle {
    pub fn new(client: Arc<AnthropicClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdvisoryOracle for AnthropicAdvisoryOracle {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn advise(&self, context: &ClusterContext) -> OracleResult<String> {
        let reply = self
            .client
            .complete(ADVISORY_SYSTEM_PROMPT, &advisory_user_prompt(context))
            .await?;
        Ok(reply.trim().to_string())
    }
}

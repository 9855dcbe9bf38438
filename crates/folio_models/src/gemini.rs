//! Gemini `generateContent` REST client.

use crate::RetryPolicy;
use derive_builder::Builder;
use derive_getters::Getters;
use folio_core::{GenerateRequest, GenerateResponse};
use folio_error::{FolioResult, GenerationError, GenerationErrorKind};
use folio_interface::TextGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, instrument, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One part of a Gemini message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiPart {
    /// Text payload
    #[serde(default)]
    text: String,
}

/// A Gemini message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiContent {
    /// Message role ("user" or "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Message parts
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Sampling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Request body for `generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<GeminiContent>,
    /// Sampling configuration
    generation_config: GeminiGenerationConfig,
}

impl GeminiRequest {
    /// Wrap a single prompt as one user turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the generation config cannot be assembled.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::GenerateRequest;
    /// use folio_models::GeminiRequest;
    ///
    /// let req = GenerateRequest::builder().prompt("Hi").max_tokens(500u32).build().unwrap();
    /// let body = GeminiRequest::from_generate(&req, 0.7).unwrap();
    /// let json = serde_json::to_value(&body).unwrap();
    /// assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
    /// assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
    /// ```
    pub fn from_generate(
        req: &GenerateRequest,
        default_temperature: f32,
    ) -> Result<Self, GenerationError> {
        let generation_config = GeminiGenerationConfigBuilder::default()
            .max_output_tokens(req.max_tokens)
            .temperature(Some(req.temperature.unwrap_or(default_temperature)))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))?;

        Ok(Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: req.prompt.clone(),
                }],
            }],
            generation_config,
        })
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated message
    #[serde(default)]
    content: Option<GeminiContent>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiResponse {
    /// Response candidates
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini REST client with jittered retry on transient failures.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Create a client for `model`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Gemini client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            retry: RetryPolicy::default(),
        }
    }

    /// Create a client reading the API key from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is unset or empty.
    #[instrument(name = "gemini_client_from_env", skip(model))]
    pub fn from_env(var: &str, model: impl Into<String>) -> FolioResult<Self> {
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(var.to_string()))
            })?;
        Ok(Self::new(api_key, model))
    }

    /// Override the API root (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Default sampling temperature when a request carries none.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Retry policy for transient failures.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// One HTTP round trip.
    #[instrument(skip(self, body), fields(model = %model))]
    async fn send_once(
        &self,
        model: &str,
        body: &GeminiRequest,
    ) -> Result<GeminiResponse, GenerationError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Gemini API");
                GenerationError::new(GenerationErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Gemini API returned error");
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message: body,
            }));
        }

        response.json::<GeminiResponse>().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Gemini response");
            GenerationError::new(GenerationErrorKind::Parse(e.to_string()))
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, req), fields(prompt_len = req.prompt.len(), max_tokens = ?req.max_tokens))]
    async fn generate(&self, req: &GenerateRequest) -> FolioResult<GenerateResponse> {
        let model = req.model.clone().unwrap_or_else(|| self.model.clone());
        let body = GeminiRequest::from_generate(req, self.temperature)?;

        let response = Retry::spawn(self.retry.delays(), || {
            let model = model.clone();
            let body = body.clone();
            async move {
                match self.send_once(&model, &body).await {
                    Ok(response) => Ok(response),
                    Err(e) if e.kind.is_retryable() => {
                        warn!(error = %e, "Gemini request failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent Gemini error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await?;

        let text = response
            .text()
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))?;
        debug!(chars = text.len(), "Received response from Gemini");
        Ok(GenerateResponse { text })
    }
}

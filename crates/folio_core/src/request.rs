//! Request and response types for text generation.

use serde::{Deserialize, Serialize};

/// A single-prompt generation request.
///
/// # Examples
///
/// ```
/// use folio_core::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .prompt("Write chapter one")
///     .max_tokens(8192u32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.max_tokens, Some(8192));
/// assert_eq!(request.temperature, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// Prompt text
    pub prompt: String,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Model identifier override
    #[builder(default)]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Generated text returned by a [`GenerateRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub text: String,
}

//! Text generation clients for folio.
//!
//! The pipeline only needs `prompt -> text`, so the Gemini integration talks to the
//! `generateContent` REST endpoint directly through `reqwest`.
//!
//! ```no_run
//! use folio_models::GeminiClient;
//! use folio_interface::TextGenerator;
//! use folio_core::GenerateRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env("GEMINI_API_KEY", "gemini-2.0-flash")?;
//! let request = GenerateRequest::builder().prompt("Hello").build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod retry;

pub use gemini::{
    GeminiCandidate, GeminiClient, GeminiContent, GeminiGenerationConfig, GeminiPart,
    GeminiRequest, GeminiResponse,
};
pub use retry::RetryPolicy;

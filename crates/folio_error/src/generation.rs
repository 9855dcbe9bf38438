//! Text generation error types.

/// Kinds of text generation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Transport-level failure talking to the service
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// The service answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
    /// The service answered without any text
    #[display("Empty response from model")]
    EmptyResponse,
    /// The response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Credentials are not configured
    #[display("Missing API key: set {}", _0)]
    MissingApiKey(String),
    /// Request could not be assembled
    #[display("Failed to build request: {}", _0)]
    Builder(String),
}

impl GenerationErrorKind {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Http(_) => true,
            GenerationErrorKind::Api { status, .. } => *status == 429 || *status >= 500,
            GenerationErrorKind::EmptyResponse
            | GenerationErrorKind::Parse(_)
            | GenerationErrorKind::MissingApiKey(_)
            | GenerationErrorKind::Builder(_) => false,
        }
    }
}

/// Text generation error with location tracking.
///
/// # Examples
///
/// ```
/// use folio_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Api { status: 503, message: "busy".into() });
/// assert!(err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Document rendering error types.

/// Kinds of rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// Building the document structure failed
    #[display("{} rendering failed: {}", format, message)]
    Layout {
        /// Target format name
        format: String,
        /// Failure description
        message: String,
    },
    /// Packaging the rendered document failed
    #[display("{} packaging failed: {}", format, message)]
    Encode {
        /// Target format name
        format: String,
        /// Failure description
        message: String,
    },
    /// No renderer is registered for the format
    #[display("No renderer registered for {}", _0)]
    UnsupportedFormat(String),
}

/// Rendering error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The specific error condition
    pub kind: RenderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RenderError {
    /// Create a new RenderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

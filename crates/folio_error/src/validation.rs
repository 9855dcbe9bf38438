//! Validation error types.
//!
//! Validation errors are surfaced to the caller immediately and are never retried.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// No book with the given id
    #[display("Book not found: {}", _0)]
    BookNotFound(String),
    /// No chapter with the given id
    #[display("Chapter not found: {}", _0)]
    ChapterNotFound(String),
    /// No chapter with the given number in the book
    #[display("Chapter {} not found for book {}", number, book)]
    ChapterNumberNotFound {
        /// Owning book id
        book: String,
        /// Requested chapter number
        number: u32,
    },
    /// Outline generation requires a brief
    #[display("Book {} has no brief to generate an outline from", _0)]
    MissingBrief(String),
    /// Operation requires an outline
    #[display("Book {} has no outline", _0)]
    MissingOutline(String),
    /// Chapter generation requires an approved outline
    #[display("Book {} outline not approved (status: {})", book, state)]
    OutlineNotApproved {
        /// Book id
        book: String,
        /// Current outline review state
        state: String,
    },
    /// The outline produced no chapters
    #[display("No chapters found for book {}", _0)]
    NoChapters(String),
    /// Regeneration was requested without reviewer feedback
    #[display("No pending feedback for {}", _0)]
    NoPendingFeedback(String),
    /// Another generation already holds the chapter
    #[display("Generation already in progress for chapter {}", _0)]
    GenerationInProgress(String),
    /// The readiness check failed
    #[display("Cannot compile book {}: {}", book, issues.join(", "))]
    NotReady {
        /// Book id
        book: String,
        /// Issues reported by the readiness check
        issues: Vec<String>,
    },
    /// Free-form input was rejected
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use folio_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::NoChapters("b1".to_string()));
/// assert!(format!("{}", err).contains("No chapters"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error condition
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, LifecycleError, RenderError, StorageError, ValidationError,
};

/// Every error domain in the workspace.
///
/// # Examples
///
/// ```
/// use folio_error::{FolioError, ConfigError};
///
/// let err: FolioError = ConfigError::new("bad value").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FolioErrorKind {
    /// Caller supplied an unknown id or violated a precondition
    #[from(ValidationError)]
    Validation(ValidationError),
    /// A state transition was rejected
    #[from(LifecycleError)]
    Lifecycle(LifecycleError),
    /// The text generation service failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// A renderer failed
    #[from(RenderError)]
    Render(RenderError),
    /// The record or artifact store failed
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration could not be loaded
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Folio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use folio_error::{FolioError, FolioErrorKind, FolioResult, ValidationError, ValidationErrorKind};
///
/// fn might_fail() -> FolioResult<()> {
///     Err(ValidationError::new(ValidationErrorKind::InvalidInput("empty title".into())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), FolioErrorKind::Validation(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Folio Error: {}", _0)]
pub struct FolioError(Box<FolioErrorKind>);

impl FolioError {
    /// Create a new error from a kind.
    pub fn new(kind: FolioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FolioErrorKind {
        &self.0
    }

    /// The validation kind, if this is a validation failure.
    pub fn validation_kind(&self) -> Option<&crate::ValidationErrorKind> {
        match self.kind() {
            FolioErrorKind::Validation(err) => Some(&err.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FolioErrorKind
impl<T> From<T> for FolioError
where
    T: Into<FolioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;

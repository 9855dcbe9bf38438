//! Error types for the folio manuscript pipeline.
//!
//! This crate provides the foundation error types used throughout the folio workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use folio_error::{FolioResult, ValidationError, ValidationErrorKind};
//!
//! fn load(id: &str) -> FolioResult<String> {
//!     Err(ValidationError::new(ValidationErrorKind::BookNotFound(id.to_string())))?
//! }
//!
//! assert!(load("missing").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod lifecycle;
mod render;
mod storage;
mod validation;

pub use config::ConfigError;
pub use error::{FolioError, FolioErrorKind, FolioResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use lifecycle::{LifecycleError, LifecycleErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};

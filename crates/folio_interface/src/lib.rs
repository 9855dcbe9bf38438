//! Trait definitions for the folio manuscript pipeline.
//!
//! The pipeline consumes four collaborators through narrow interfaces: a text
//! generation service, a record store, an artifact store and a notifier.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod traits;

pub use events::PipelineEvent;
pub use traits::{ArtifactStorage, BookRepository, Notifier, TextGenerator};

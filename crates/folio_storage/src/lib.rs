//! Record and artifact stores for folio.
//!
//! Two [`BookRepository`](folio_interface::BookRepository) backends share one table
//! implementation: an in-memory store for tests and a JSON-file store for the CLI.
//! Compiled documents go to an [`ArtifactStorage`](folio_interface::ArtifactStorage)
//! backend, either on disk or in memory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifacts;
mod json_file;
mod memory;
mod tables;

pub use artifacts::{FileSystemArtifactStorage, InMemoryArtifactStorage, safe_file_stem};
pub use json_file::JsonFileRepository;
pub use memory::InMemoryBookRepository;

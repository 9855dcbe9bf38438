//! Folio turns a short brief into a compiled book.
//!
//! A book moves through three human-gated stages:
//!
//! 1. **Outline**: generated from the brief, revised from reviewer notes, approved
//! 2. **Chapters**: decomposed from the outline and written in order, each prompt
//!    carrying summaries of the chapters before it
//! 3. **Compilation**: docx, pdf and txt renderings of the approved chapters
//!
//! This crate re-exports the workspace's public API and adds layered configuration
//! ([`FolioConfig`]), tracing setup and the [`Pipeline`] that runs a book end to end.
//!
//! ```no_run
//! use folio::{FileSystemArtifactStorage, FolioConfig, JsonFileRepository, Pipeline};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FolioConfig::load()?;
//! let repository = Arc::new(JsonFileRepository::open(&config.paths.store).await?);
//! let storage = Arc::new(FileSystemArtifactStorage::new(&config.paths.output_dir)?);
//! let pipeline = Pipeline::new(Arc::new(config.text_generator()?), repository, storage)
//!     .with_notifier(config.notifier());
//!
//! let book = pipeline.books().submit_brief("Rust at Sea", "A sailing manual").await?;
//! let report = pipeline.run(*book.id(), true).await?;
//! println!("{}", report.outcome);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;
mod pipeline;

pub use config::{
    DEFAULT_CONFIG, FolioConfig, LoggingConfig, ModelConfig, NotificationConfig, PathsConfig,
};
pub use observability::{ObservabilityConfig, init_observability};
pub use pipeline::{Pipeline, RunOutcome, RunReport};

pub use folio_compiler::{
    CompileReport, Compiler, DocumentRenderer, DocxRenderer, FormatOutcome, Manuscript,
    ManuscriptChapter, PdfRenderer, RendererRegistry, TxtRenderer,
};
pub use folio_core::{
    Book, BookId, BookProgress, Chapter, ChapterAction, ChapterId, ContentState, OutlineAction,
    OutputFormat, OutputState, Readiness, ReviewState,
};
pub use folio_document::{ContentBlock, HeadingLevel, InlineSpan, bold_spans, clean, parse_blocks};
pub use folio_error::{FolioError, FolioErrorKind, FolioResult};
pub use folio_interface::{ArtifactStorage, BookRepository, Notifier, PipelineEvent, TextGenerator};
pub use folio_models::{GeminiClient, RetryPolicy};
pub use folio_outline::{DecomposerConfig, OutlineDecomposer};
pub use folio_pipeline::{
    BatchReport, BookService, ChapterGenerator, GenerationSettings, HaltReason, OutlineGenerator,
    TracingNotifier, WebhookNotifier,
};
pub use folio_storage::{
    FileSystemArtifactStorage, InMemoryArtifactStorage, InMemoryBookRepository,
    JsonFileRepository,
};

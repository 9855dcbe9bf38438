//! Readiness gate and multi-format compilation.

use crate::{Manuscript, RendererRegistry};
use folio_core::{BookId, OutputFormat, OutputState, Readiness};
use folio_error::{FolioResult, ValidationError, ValidationErrorKind};
use folio_interface::{ArtifactStorage, BookRepository, Notifier, PipelineEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use strum::IntoEnumIterator;

/// What happened to one requested format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FormatOutcome {
    /// Rendered and stored
    Written {
        /// Storage handle
        path: String,
    },
    /// Rendering or storing failed
    Failed {
        /// Failure description
        error: String,
    },
}

/// Result of [`Compiler::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileReport {
    /// Compiled book
    pub book_id: BookId,
    /// Outcome per requested format
    pub results: BTreeMap<OutputFormat, FormatOutcome>,
    /// Book output state after the run
    pub output_state: OutputState,
}

impl CompileReport {
    /// Handles of the formats that were written.
    pub fn paths(&self) -> BTreeMap<OutputFormat, String> {
        self.results
            .iter()
            .filter_map(|(format, outcome)| match outcome {
                FormatOutcome::Written { path } => Some((*format, path.clone())),
                FormatOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Failure messages of the formats that were not written.
    pub fn errors(&self) -> BTreeMap<OutputFormat, String> {
        self.results
            .iter()
            .filter_map(|(format, outcome)| match outcome {
                FormatOutcome::Failed { error } => Some((*format, error.clone())),
                FormatOutcome::Written { .. } => None,
            })
            .collect()
    }

    /// Whether every requested format was written.
    pub fn all_succeeded(&self) -> bool {
        self.results
            .values()
            .all(|outcome| matches!(outcome, FormatOutcome::Written { .. }))
    }
}

/// Compiles finished books into documents and stores them.
#[derive(Clone)]
pub struct Compiler {
    repository: Arc<dyn BookRepository>,
    storage: Arc<dyn ArtifactStorage>,
    registry: RendererRegistry,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Compiler {
    /// Create a compiler with the standard renderers.
    pub fn new(repository: Arc<dyn BookRepository>, storage: Arc<dyn ArtifactStorage>) -> Self {
        Self {
            repository,
            storage,
            registry: RendererRegistry::standard(),
            notifier: None,
        }
    }

    /// Report compilation outcomes to a notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Use a different set of renderers.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.registry = registry;
        self
    }

    async fn notify(&self, event: PipelineEvent) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(&event).await;
        }
    }

    /// Check whether a book can be compiled.
    #[tracing::instrument(skip(self))]
    pub async fn check_readiness(&self, book_id: BookId) -> FolioResult<Readiness> {
        let book = self.repository.get_book(book_id).await?;
        let chapters = self.repository.list_chapters(book_id).await?;
        Ok(Readiness::evaluate(&book, &chapters))
    }

    /// Compile a book into the requested formats, or every format when none are given.
    ///
    /// Unless `force` is set the readiness check must pass first. Each format is
    /// rendered and stored independently: a failure is recorded in the report and
    /// the remaining formats still run. The book ends `completed` only when every
    /// format succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrorKind::NotReady`] when the readiness check fails and
    /// `force` is not set, or a storage error if the book cannot be loaded or saved.
    #[tracing::instrument(skip(self, formats), fields(formats = formats.len()))]
    pub async fn compile(
        &self,
        book_id: BookId,
        formats: &[OutputFormat],
        force: bool,
    ) -> FolioResult<CompileReport> {
        let mut book = self.repository.get_book(book_id).await?;
        let chapters = self.repository.list_chapters(book_id).await?;

        let readiness = Readiness::evaluate(&book, &chapters);
        if !readiness.can_compile {
            if !force {
                return Err(ValidationError::new(ValidationErrorKind::NotReady {
                    book: book_id.to_string(),
                    issues: readiness.issues,
                })
                .into());
            }
            tracing::warn!(issues = ?readiness.issues, "Compiling despite readiness issues");
        }

        let requested: BTreeSet<OutputFormat> = if formats.is_empty() {
            OutputFormat::iter().collect()
        } else {
            formats.iter().copied().collect()
        };

        let manuscript = Manuscript::from_book(
            &book,
            &chapters,
            chrono::Local::now().date_naive(),
        );
        tracing::info!(
            chapters = manuscript.chapters.len(),
            "Compiling '{}'",
            manuscript.title
        );

        let mut results = BTreeMap::new();
        for format in requested {
            let outcome = match self.render_and_store(&book, &manuscript, format).await {
                Ok(path) => {
                    tracing::info!(%format, path = %path, "Compiled");
                    FormatOutcome::Written { path }
                }
                Err(e) => {
                    tracing::error!(%format, error = %e, "Compilation failed");
                    FormatOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.insert(format, outcome);
        }

        let mut report = CompileReport {
            book_id,
            results,
            output_state: OutputState::Pending,
        };
        book.record_compilation(report.paths(), report.all_succeeded());
        self.repository.update_book(&book).await?;
        report.output_state = *book.output_state();

        let paths = report.paths();
        if !paths.is_empty() {
            self.notify(PipelineEvent::FinalDraftReady { book_id, paths })
                .await;
        }
        let errors = report.errors();
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(|(format, error)| format!("{}: {}", format, error))
                .collect::<Vec<_>>()
                .join("; ");
            self.notify(PipelineEvent::Error { book_id, message }).await;
        }

        Ok(report)
    }

    async fn render_and_store(
        &self,
        book: &folio_core::Book,
        manuscript: &Manuscript,
        format: OutputFormat,
    ) -> FolioResult<String> {
        let renderer = self.registry.get(format)?;
        let bytes = renderer.render(manuscript)?;
        self.storage.store(book, format, &bytes).await
    }
}

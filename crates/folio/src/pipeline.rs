//! End-to-end orchestration: outline, chapters, compilation.

use folio_compiler::{CompileReport, Compiler, RendererRegistry};
use folio_core::{BookId, OutlineAction};
use folio_error::{FolioResult, ValidationError, ValidationErrorKind};
use folio_interface::{ArtifactStorage, BookRepository, Notifier, PipelineEvent, TextGenerator};
use folio_outline::DecomposerConfig;
use folio_pipeline::{
    BatchReport, BookLocks, BookService, ChapterGenerator, GenerationSettings, HaltReason,
    OutlineGenerator, TracingNotifier,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a [`Pipeline::run`] stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The outline needs a reviewer decision
    #[display("outline awaiting review ({})", action)]
    OutlineReview {
        /// What the outline gate asks for next
        action: OutlineAction,
    },
    /// The chapter walk stopped before the end
    #[display("chapters halted: {}", reason)]
    ChaptersHalted {
        /// Why the walk stopped
        reason: HaltReason,
    },
    /// All chapters are written but not all approved
    #[display("{}/{} chapters approved", approved, total)]
    AwaitingApproval {
        /// Approved chapters
        approved: usize,
        /// All chapters
        total: usize,
    },
    /// The book was compiled
    #[display("compiled")]
    Compiled {
        /// Per-format results
        report: CompileReport,
    },
}

/// Result of [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Processed book
    pub book_id: BookId,
    /// Chapter walk performed during the run, if it got that far
    pub chapters: Option<BatchReport>,
    /// Final stage reached
    pub outcome: RunOutcome,
}

/// Every workflow service wired to the same store, notifier and lock table.
#[derive(Clone)]
pub struct Pipeline {
    repository: Arc<dyn BookRepository>,
    notifier: Arc<dyn Notifier>,
    books: BookService,
    outlines: OutlineGenerator,
    chapters: ChapterGenerator,
    compiler: Compiler,
}

impl Pipeline {
    /// Wire the services with default budgets and a tracing notifier.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        repository: Arc<dyn BookRepository>,
        storage: Arc<dyn ArtifactStorage>,
    ) -> Self {
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let locks = BookLocks::new();
        Self {
            books: BookService::new(repository.clone()),
            outlines: OutlineGenerator::new(generator.clone(), repository.clone())
                .with_notifier(notifier.clone())
                .with_locks(locks.clone()),
            chapters: ChapterGenerator::new(generator, repository.clone())
                .with_notifier(notifier.clone())
                .with_locks(locks),
            compiler: Compiler::new(repository.clone(), storage).with_notifier(notifier.clone()),
            repository,
            notifier,
        }
    }

    /// Send every service's events to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.outlines = self.outlines.with_notifier(notifier.clone());
        self.chapters = self.chapters.with_notifier(notifier.clone());
        self.compiler = self.compiler.with_notifier(notifier.clone());
        self.notifier = notifier;
        self
    }

    /// Use different token budgets for outline and chapter generation.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.outlines = self.outlines.with_settings(settings.clone());
        self.chapters = self.chapters.with_settings(settings);
        self
    }

    /// Use different outline decomposition settings.
    pub fn with_decomposer(mut self, config: DecomposerConfig) -> Self {
        self.chapters = self.chapters.with_decomposer(config);
        self
    }

    /// Use a different set of renderers.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.compiler = self.compiler.with_registry(registry);
        self
    }

    /// Book intake and final review.
    pub fn books(&self) -> &BookService {
        &self.books
    }

    /// Outline workflow.
    pub fn outlines(&self) -> &OutlineGenerator {
        &self.outlines
    }

    /// Chapter workflow.
    pub fn chapters(&self) -> &ChapterGenerator {
        &self.chapters
    }

    /// Readiness and compilation.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// First stored book, the default target of [`run`](Self::run).
    pub async fn first_book(&self) -> FolioResult<BookId> {
        self.repository
            .list_books()
            .await?
            .first()
            .map(|book| *book.id())
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::BookNotFound(
                    "no books submitted".to_string(),
                ))
                .into()
            })
    }

    /// Drive a book as far as its review gates allow.
    ///
    /// Generates the outline if there is none. With `auto_approve` the outline is
    /// approved (after applying any pending feedback) and so is every chapter;
    /// without it the run stops at the first gate that needs a reviewer. Once
    /// every chapter is approved the book is compiled to all formats, bypassing
    /// the final review gate, and a completion event follows a fully successful
    /// compilation.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, book_id: BookId, auto_approve: bool) -> FolioResult<RunReport> {
        let mut book = self.repository.get_book(book_id).await?;
        tracing::info!("Running pipeline for '{}'", book.title());

        if book.outline().is_none() {
            book = self.outlines.generate_outline(book_id).await?;
        }

        match book.outline_action() {
            OutlineAction::Proceed => {}
            OutlineAction::Regenerate if auto_approve => {
                self.outlines.regenerate_outline(book_id).await?;
                self.outlines.approve_outline(book_id).await?;
            }
            OutlineAction::Wait if auto_approve => {
                self.outlines.approve_outline(book_id).await?;
            }
            action => {
                tracing::warn!(%action, "Outline gate not passed");
                return Ok(RunReport {
                    book_id,
                    chapters: None,
                    outcome: RunOutcome::OutlineReview { action },
                });
            }
        }

        let batch = self.chapters.generate_all(book_id, auto_approve).await?;
        if let Some(reason) = batch.halted.clone() {
            return Ok(RunReport {
                book_id,
                chapters: Some(batch),
                outcome: RunOutcome::ChaptersHalted { reason },
            });
        }

        let progress = self.chapters.book_progress(book_id).await?;
        if progress.total == 0 || progress.approved < progress.total {
            tracing::info!(
                approved = progress.approved,
                total = progress.total,
                "Chapters not fully approved"
            );
            return Ok(RunReport {
                book_id,
                chapters: Some(batch),
                outcome: RunOutcome::AwaitingApproval {
                    approved: progress.approved,
                    total: progress.total,
                },
            });
        }

        let report = self.compiler.compile(book_id, &[], true).await?;
        if report.all_succeeded() {
            self.notifier
                .notify(&PipelineEvent::BookCompleted { book_id })
                .await;
        }
        Ok(RunReport {
            book_id,
            chapters: Some(batch),
            outcome: RunOutcome::Compiled { report },
        })
    }
}

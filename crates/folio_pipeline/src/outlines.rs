//! Outline generation and the outline review gate.

use crate::{BookLocks, GenerationSettings, TracingNotifier, prompts};
use folio_core::{Book, BookId, OutlineAction};
use folio_error::{FolioResult, ValidationError, ValidationErrorKind};
use folio_interface::{BookRepository, Notifier, PipelineEvent, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of [`OutlineGenerator::generate_pending_outlines`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineBatch {
    /// Books that received an outline
    pub generated: Vec<BookId>,
    /// Books skipped for lack of a brief
    pub skipped: Vec<BookId>,
    /// Books whose generation failed, with the failure message
    pub failed: Vec<(BookId, String)>,
}

/// Generates, revises and approves book outlines.
#[derive(Clone)]
pub struct OutlineGenerator {
    generator: Arc<dyn TextGenerator>,
    repository: Arc<dyn BookRepository>,
    notifier: Arc<dyn Notifier>,
    settings: GenerationSettings,
    locks: BookLocks,
}

impl OutlineGenerator {
    /// Create a generator with default budgets and a tracing notifier.
    pub fn new(generator: Arc<dyn TextGenerator>, repository: Arc<dyn BookRepository>) -> Self {
        Self {
            generator,
            repository,
            notifier: Arc::new(TracingNotifier),
            settings: GenerationSettings::default(),
            locks: BookLocks::new(),
        }
    }

    /// Send events to a different notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use different token budgets.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Share a lock table with other services.
    pub fn with_locks(mut self, locks: BookLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Generate the outline for a book from its brief.
    ///
    /// A book that already has an outline is returned unchanged. On failure the
    /// book is marked `error` and the failure propagates.
    #[tracing::instrument(skip(self))]
    pub async fn generate_outline(&self, book_id: BookId) -> FolioResult<Book> {
        let _guard = self.locks.acquire(book_id).await;
        let mut book = self.repository.get_book(book_id).await?;
        if book.outline().is_some() {
            tracing::info!("Outline already exists");
            return Ok(book);
        }
        if !book.has_brief() {
            return Err(
                ValidationError::new(ValidationErrorKind::MissingBrief(book_id.to_string()))
                    .into(),
            );
        }

        let request = prompts::outline_request(&self.settings, book.title(), book.brief())?;
        match self.generator.generate(&request).await {
            Ok(response) => {
                book.record_outline(response.text)?;
                self.repository.update_book(&book).await?;
                tracing::info!("Outline generated");
                self.notifier
                    .notify(&PipelineEvent::OutlineReady {
                        book_id,
                        title: book.title().clone(),
                    })
                    .await;
                Ok(book)
            }
            Err(e) => Err(self.fail(book, e).await),
        }
    }

    /// Generate outlines for every book that has a brief but no outline yet.
    ///
    /// Individual failures are collected rather than aborting the batch.
    #[tracing::instrument(skip(self))]
    pub async fn generate_pending_outlines(&self) -> FolioResult<OutlineBatch> {
        let mut batch = OutlineBatch::default();
        for book in self.repository.list_books().await? {
            if book.outline().is_some() {
                continue;
            }
            if !book.has_brief() {
                tracing::warn!(book_id = %book.id(), "Skipping book without a brief");
                batch.skipped.push(*book.id());
                continue;
            }
            match self.generate_outline(*book.id()).await {
                Ok(_) => batch.generated.push(*book.id()),
                Err(e) => batch.failed.push((*book.id(), e.to_string())),
            }
        }
        tracing::info!(
            generated = batch.generated.len(),
            skipped = batch.skipped.len(),
            failed = batch.failed.len(),
            "Pending outlines processed"
        );
        Ok(batch)
    }

    /// Next allowed outline action for a book.
    pub async fn outline_status(&self, book_id: BookId) -> FolioResult<OutlineAction> {
        Ok(self.repository.get_book(book_id).await?.outline_action())
    }

    /// Attach reviewer notes to an outline awaiting review.
    #[tracing::instrument(skip(self, feedback))]
    pub async fn request_outline_revision(
        &self,
        book_id: BookId,
        feedback: &str,
    ) -> FolioResult<Book> {
        let _guard = self.locks.acquire(book_id).await;
        let mut book = self.repository.get_book(book_id).await?;
        book.request_outline_revision(feedback)?;
        self.repository.update_book(&book).await?;
        tracing::info!("Outline revision requested");
        Ok(book)
    }

    /// Regenerate the outline from pending reviewer notes.
    #[tracing::instrument(skip(self))]
    pub async fn regenerate_outline(&self, book_id: BookId) -> FolioResult<Book> {
        let _guard = self.locks.acquire(book_id).await;
        let book = self.repository.get_book(book_id).await?;
        let outline = book.outline().clone().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::MissingOutline(book_id.to_string()))
        })?;
        let feedback = book.outline_feedback().clone().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::NoPendingFeedback(format!(
                "outline of book {}",
                book_id
            )))
        })?;

        let request =
            prompts::outline_revision_request(&self.settings, book.title(), &outline, &feedback)?;
        match self.generator.generate(&request).await {
            Ok(response) => {
                let mut book = book;
                book.record_outline(response.text)?;
                self.repository.update_book(&book).await?;
                tracing::info!("Outline regenerated");
                self.notifier
                    .notify(&PipelineEvent::OutlineReady {
                        book_id,
                        title: book.title().clone(),
                    })
                    .await;
                Ok(book)
            }
            Err(e) => Err(self.fail(book, e).await),
        }
    }

    /// Approve the outline so chapters may be generated.
    #[tracing::instrument(skip(self))]
    pub async fn approve_outline(&self, book_id: BookId) -> FolioResult<Book> {
        let _guard = self.locks.acquire(book_id).await;
        let mut book = self.repository.get_book(book_id).await?;
        book.approve_outline()?;
        self.repository.update_book(&book).await?;
        tracing::info!("Outline approved");
        Ok(book)
    }

    async fn fail(&self, mut book: Book, error: folio_error::FolioError) -> folio_error::FolioError {
        tracing::error!(book_id = %book.id(), error = %error, "Outline generation failed");
        book.record_failure();
        if let Err(e) = self.repository.update_book(&book).await {
            tracing::warn!(error = %e, "Could not record outline failure");
        }
        self.notifier
            .notify(&PipelineEvent::Error {
                book_id: *book.id(),
                message: error.to_string(),
            })
            .await;
        error
    }
}

//! Context-chaining chapter generation.
//!
//! Chapter N is generated from the book outline plus the summaries of chapters
//! 1..N-1, so the chapters of one book are always walked in ascending order under
//! that book's lock. Separate books proceed independently.

use crate::{BookLocks, GenerationSettings, TracingNotifier, prompts};
use folio_core::{
    Book, BookId, BookProgress, Chapter, ChapterAction, ContentState, ContextEntry, ReviewState,
};
use folio_error::{FolioError, FolioResult, LifecycleError, ValidationError, ValidationErrorKind};
use folio_interface::{BookRepository, Notifier, PipelineEvent, TextGenerator};
use folio_outline::{DecomposerConfig, OutlineDecomposer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Why a batch walk stopped before the last chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    /// A generated chapter is waiting for reviewer notes
    #[display("chapter {} is waiting for review notes", chapter_number)]
    AwaitingNotes {
        /// Blocking chapter
        chapter_number: u32,
    },
    /// A chapter is in a state that needs an operator
    #[display("chapter {} paused ({}/{})", chapter_number, content_state, review_state)]
    Paused {
        /// Blocking chapter
        chapter_number: u32,
        /// Its generation state
        content_state: ContentState,
        /// Its review gate
        review_state: ReviewState,
    },
}

/// Outcome of [`ChapterGenerator::generate_all`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Chapters generated or regenerated by this call, in walk order
    pub generated: Vec<Chapter>,
    /// Chapter numbers approved automatically by this call
    pub auto_approved: Vec<u32>,
    /// Set when the walk stopped early
    pub halted: Option<HaltReason>,
}

impl BatchReport {
    /// Whether the walk reached the last chapter.
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }

    /// Numbers of the chapters generated by this call.
    pub fn generated_numbers(&self) -> Vec<u32> {
        self.generated.iter().map(|c| *c.chapter_number()).collect()
    }
}

/// Generates chapters in order, feeding each one the summaries of its predecessors.
#[derive(Clone)]
pub struct ChapterGenerator {
    generator: Arc<dyn TextGenerator>,
    repository: Arc<dyn BookRepository>,
    notifier: Arc<dyn Notifier>,
    settings: GenerationSettings,
    decomposer: OutlineDecomposer,
    locks: BookLocks,
}

impl ChapterGenerator {
    /// Create a generator with default budgets and a tracing notifier.
    pub fn new(generator: Arc<dyn TextGenerator>, repository: Arc<dyn BookRepository>) -> Self {
        Self {
            generator,
            repository,
            notifier: Arc::new(TracingNotifier),
            settings: GenerationSettings::default(),
            decomposer: OutlineDecomposer::default(),
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

    /// Use a differently configured outline decomposer.
    pub fn with_decomposer(mut self, config: DecomposerConfig) -> Self {
        self.decomposer = OutlineDecomposer::new(config);
        self
    }

    /// Share a lock table with other services.
    pub fn with_locks(mut self, locks: BookLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Create chapter records from the book's outline.
    ///
    /// Runs once per book: when chapters already exist they are returned as-is.
    /// Decomposed chapters are numbered densely from 1 in outline order.
    #[tracing::instrument(skip(self))]
    pub async fn initialize_chapters(&self, book_id: BookId) -> FolioResult<Vec<Chapter>> {
        let _guard = self.locks.acquire(book_id).await;
        let book = self.repository.get_book(book_id).await?;
        self.initialize_locked(&book).await
    }

    async fn initialize_locked(&self, book: &Book) -> FolioResult<Vec<Chapter>> {
        let book_id = *book.id();
        let existing = self.repository.list_chapters(book_id).await?;
        if !existing.is_empty() {
            tracing::info!(chapters = existing.len(), "Chapters already initialized");
            return Ok(existing);
        }

        let outline = book.outline().as_deref().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::MissingOutline(book_id.to_string()))
        })?;
        let stubs = self.decomposer.decompose(outline);
        if stubs.is_empty() {
            return Err(
                ValidationError::new(ValidationErrorKind::NoChapters(book_id.to_string())).into(),
            );
        }

        let chapters: Vec<Chapter> = stubs
            .into_iter()
            .zip(1u32..)
            .map(|(stub, number)| Chapter::new(book_id, number, stub.title))
            .collect();
        self.repository.create_chapters(&chapters).await?;
        tracing::info!(chapters = chapters.len(), "Chapters initialized from outline");
        Ok(chapters)
    }

    /// Recaps of every summarised chapter before `chapter_number`, ascending.
    ///
    /// Always empty for chapter 1.
    pub async fn context_for_chapter(
        &self,
        book_id: BookId,
        chapter_number: u32,
    ) -> FolioResult<Vec<ContextEntry>> {
        if chapter_number <= 1 {
            return Ok(Vec::new());
        }
        self.repository
            .chapter_summaries(book_id, chapter_number - 1)
            .await
    }

    /// Load one chapter by number.
    pub async fn chapter(&self, book_id: BookId, chapter_number: u32) -> FolioResult<Chapter> {
        self.find(book_id, chapter_number).await
    }

    /// Generate one chapter.
    ///
    /// Requires an approved outline. A chapter that already has content is returned
    /// unchanged. On failure the chapter is marked `error` and the failure propagates.
    #[tracing::instrument(skip(self))]
    pub async fn generate(&self, book_id: BookId, chapter_number: u32) -> FolioResult<Chapter> {
        let _guard = self.locks.acquire(book_id).await;
        let book = self.repository.get_book(book_id).await?;
        ensure_outline_approved(&book)?;
        let chapter = self.find(book_id, chapter_number).await?;
        self.generate_locked(&book, chapter).await
    }

    async fn generate_locked(&self, book: &Book, chapter: Chapter) -> FolioResult<Chapter> {
        let number = *chapter.chapter_number();
        if chapter.has_content() {
            tracing::info!(chapter = number, "Chapter already has content");
            return Ok(chapter);
        }

        let context = self.context_for_chapter(*book.id(), number).await?;
        let mut claimed = self.repository.claim_generation(*chapter.id()).await?;
        tracing::info!(
            chapter = number,
            context_chapters = context.len(),
            "Generating chapter"
        );

        let outline = book.outline().as_deref().unwrap_or_default();
        let request = prompts::chapter_request(
            &self.settings,
            prompts::ChapterPrompt {
                book_title: book.title(),
                outline,
                chapter_number: number,
                chapter_title: claimed.title(),
                context: &context,
                notes: claimed.pending_feedback().as_deref(),
            },
        );
        let written = match request {
            Ok(request) => self.write(book, &claimed, &request).await,
            Err(e) => Err(e),
        };
        match written {
            Ok((content, summary)) => {
                claimed.record_generation(content, summary)?;
                self.repository.update_chapter(&claimed).await?;
                tracing::info!(chapter = number, "Chapter generated");
                self.notifier
                    .notify(&PipelineEvent::ChapterReady {
                        book_id: *book.id(),
                        chapter_number: number,
                    })
                    .await;
                Ok(claimed)
            }
            Err(e) => Err(self.fail(claimed, e).await),
        }
    }

    /// Walk every chapter in order, generating what the lifecycle allows.
    ///
    /// Initialises chapters from the outline first when none exist. Approved
    /// chapters are skipped, chapters with reviewer notes are regenerated in place,
    /// and a paused chapter always stops the walk. A chapter waiting for review
    /// stops the walk unless `auto_approve` is set, in which case it is approved
    /// and the walk continues; with `auto_approve` every chapter generated in this
    /// call is approved as well.
    #[tracing::instrument(skip(self))]
    pub async fn generate_all(
        &self,
        book_id: BookId,
        auto_approve: bool,
    ) -> FolioResult<BatchReport> {
        let _guard = self.locks.acquire(book_id).await;
        let book = self.repository.get_book(book_id).await?;
        ensure_outline_approved(&book)?;

        let mut chapters = self.repository.list_chapters(book_id).await?;
        if chapters.is_empty() {
            tracing::info!("No chapters yet, initializing from outline");
            chapters = self.initialize_locked(&book).await?;
        }

        let mut report = BatchReport::default();
        for chapter in chapters {
            let number = *chapter.chapter_number();
            let produced = match chapter.action() {
                ChapterAction::Skip => {
                    tracing::debug!(chapter = number, "Skipping approved chapter");
                    continue;
                }
                ChapterAction::Wait if !auto_approve => {
                    tracing::warn!(chapter = number, "Halting batch, chapter awaits review");
                    self.notifier
                        .notify(&PipelineEvent::WaitingChapterNotes {
                            book_id,
                            chapter_number: number,
                        })
                        .await;
                    report.halted = Some(HaltReason::AwaitingNotes {
                        chapter_number: number,
                    });
                    break;
                }
                ChapterAction::Pause => {
                    tracing::warn!(
                        chapter = number,
                        content_state = %chapter.content_state(),
                        review_state = %chapter.review_state(),
                        "Halting batch, chapter needs an operator"
                    );
                    report.halted = Some(HaltReason::Paused {
                        chapter_number: number,
                        content_state: *chapter.content_state(),
                        review_state: *chapter.review_state(),
                    });
                    break;
                }
                ChapterAction::Wait => chapter,
                ChapterAction::Regenerate => {
                    let chapter = self.regenerate_locked(&book, chapter).await?;
                    report.generated.push(chapter.clone());
                    chapter
                }
                ChapterAction::Generate => {
                    let chapter = self.generate_locked(&book, chapter).await?;
                    report.generated.push(chapter.clone());
                    chapter
                }
            };

            if auto_approve {
                self.approve_record(produced).await?;
                report.auto_approved.push(number);
            }
        }

        tracing::info!(
            generated = report.generated.len(),
            auto_approved = report.auto_approved.len(),
            halted = report.halted.is_some(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Attach reviewer notes to a chapter awaiting review.
    #[tracing::instrument(skip(self, feedback))]
    pub async fn request_chapter_revision(
        &self,
        book_id: BookId,
        chapter_number: u32,
        feedback: &str,
    ) -> FolioResult<Chapter> {
        let _guard = self.locks.acquire(book_id).await;
        let mut chapter = self.find(book_id, chapter_number).await?;
        chapter.request_revision(feedback)?;
        self.repository.update_chapter(&chapter).await?;
        tracing::info!("Chapter revision requested");
        Ok(chapter)
    }

    /// Regenerate a chapter from its pending reviewer notes.
    #[tracing::instrument(skip(self))]
    pub async fn regenerate_chapter(
        &self,
        book_id: BookId,
        chapter_number: u32,
    ) -> FolioResult<Chapter> {
        let _guard = self.locks.acquire(book_id).await;
        let book = self.repository.get_book(book_id).await?;
        let chapter = self.find(book_id, chapter_number).await?;
        self.regenerate_locked(&book, chapter).await
    }

    async fn regenerate_locked(&self, book: &Book, chapter: Chapter) -> FolioResult<Chapter> {
        let number = *chapter.chapter_number();
        let feedback = chapter.pending_feedback().clone().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::NoPendingFeedback(format!(
                "chapter {} of book {}",
                number,
                book.id()
            )))
        })?;
        let original = match (chapter.action(), chapter.content()) {
            (ChapterAction::Regenerate, Some(content)) => content.clone(),
            (action, _) => {
                return Err(LifecycleError::invalid(
                    format!("chapter {} of book {}", number, book.id()),
                    action,
                    "regenerate",
                )
                .into());
            }
        };

        tracing::info!(chapter = number, revision = *chapter.revision(), "Regenerating chapter");
        let request = prompts::chapter_revision_request(
            &self.settings,
            book.title(),
            number,
            chapter.title(),
            &original,
            &feedback,
        );
        let written = match request {
            Ok(request) => self.write(book, &chapter, &request).await,
            Err(e) => Err(e),
        };
        match written {
            Ok((content, summary)) => {
                let mut chapter = chapter;
                chapter.record_regeneration(content, summary)?;
                self.repository.update_chapter(&chapter).await?;
                tracing::info!(chapter = number, revision = *chapter.revision(), "Chapter regenerated");
                self.notifier
                    .notify(&PipelineEvent::ChapterReady {
                        book_id: *book.id(),
                        chapter_number: number,
                    })
                    .await;
                Ok(chapter)
            }
            Err(e) => Err(self.fail(chapter, e).await),
        }
    }

    /// Approve a chapter. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn approve_chapter(
        &self,
        book_id: BookId,
        chapter_number: u32,
    ) -> FolioResult<Chapter> {
        let _guard = self.locks.acquire(book_id).await;
        let chapter = self.find(book_id, chapter_number).await?;
        self.approve_record(chapter).await
    }

    async fn approve_record(&self, mut chapter: Chapter) -> FolioResult<Chapter> {
        chapter.approve();
        self.repository.update_chapter(&chapter).await?;
        tracing::info!(chapter = *chapter.chapter_number(), "Chapter approved");
        Ok(chapter)
    }

    /// Return a chapter stuck in `generating` or `error` to `pending`.
    #[tracing::instrument(skip(self))]
    pub async fn reset_chapter(&self, book_id: BookId, chapter_number: u32) -> FolioResult<Chapter> {
        let _guard = self.locks.acquire(book_id).await;
        let mut chapter = self.find(book_id, chapter_number).await?;
        chapter.reset()?;
        self.repository.update_chapter(&chapter).await?;
        tracing::info!("Chapter reset");
        Ok(chapter)
    }

    /// Generation and review counts for a book.
    pub async fn book_progress(&self, book_id: BookId) -> FolioResult<BookProgress> {
        let book = self.repository.get_book(book_id).await?;
        let chapters = self.repository.list_chapters(book_id).await?;
        Ok(BookProgress::evaluate(&book, &chapters))
    }

    async fn find(&self, book_id: BookId, chapter_number: u32) -> FolioResult<Chapter> {
        self.repository
            .find_chapter(book_id, chapter_number)
            .await?
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::ChapterNumberNotFound {
                    book: book_id.to_string(),
                    number: chapter_number,
                })
                .into()
            })
    }

    /// Generate the body, then a condensed summary of it.
    async fn write(
        &self,
        book: &Book,
        chapter: &Chapter,
        request: &folio_core::GenerateRequest,
    ) -> FolioResult<(String, String)> {
        let content = self.generator.generate(request).await?.text;
        let summary_request = prompts::summary_request(
            &self.settings,
            book.title(),
            *chapter.chapter_number(),
            chapter.title(),
            &content,
        )?;
        let summary = self.generator.generate(&summary_request).await?.text;
        Ok((content, summary))
    }

    async fn fail(&self, mut chapter: Chapter, error: FolioError) -> FolioError {
        tracing::error!(
            chapter = *chapter.chapter_number(),
            error = %error,
            "Chapter generation failed"
        );
        chapter.record_failure();
        if let Err(e) = self.repository.update_chapter(&chapter).await {
            tracing::warn!(error = %e, "Could not record chapter failure");
        }
        self.notifier
            .notify(&PipelineEvent::Error {
                book_id: *chapter.book_id(),
                message: format!("Chapter {}: {}", chapter.chapter_number(), error),
            })
            .await;
        error
    }
}

fn ensure_outline_approved(book: &Book) -> FolioResult<()> {
    match book.outline_review_state() {
        ReviewState::Approved => Ok(()),
        state => Err(ValidationError::new(ValidationErrorKind::OutlineNotApproved {
            book: book.id().to_string(),
            state: state.to_string(),
        })
        .into()),
    }
}

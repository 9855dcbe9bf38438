//! Collaborator traits.

use crate::PipelineEvent;
use async_trait::async_trait;
use folio_core::{
    Book, BookId, Chapter, ChapterId, ContextEntry, GenerateRequest, GenerateResponse,
    OutputFormat,
};
use folio_error::FolioResult;

/// Text generation service.
///
/// Accepts a prompt and returns generated text. Retry and rate limiting are the
/// implementation's concern.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> FolioResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// Record store for books and chapters.
///
/// Implementations only need per-record atomicity, plus the compare-and-set in
/// [`BookRepository::claim_generation`].
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert a new book.
    async fn create_book(&self, book: &Book) -> FolioResult<()>;

    /// Load a book, or a validation error when the id is unknown.
    async fn get_book(&self, id: BookId) -> FolioResult<Book>;

    /// All books in submission order.
    async fn list_books(&self) -> FolioResult<Vec<Book>>;

    /// Replace a stored book.
    async fn update_book(&self, book: &Book) -> FolioResult<()>;

    /// Remove a book and every chapter it owns.
    async fn delete_book(&self, id: BookId) -> FolioResult<()>;

    /// Insert chapters for a book.
    async fn create_chapters(&self, chapters: &[Chapter]) -> FolioResult<()>;

    /// Load a chapter, or a validation error when the id is unknown.
    async fn get_chapter(&self, id: ChapterId) -> FolioResult<Chapter>;

    /// A book's chapters ordered by chapter number.
    async fn list_chapters(&self, book_id: BookId) -> FolioResult<Vec<Chapter>>;

    /// Replace a stored chapter.
    async fn update_chapter(&self, chapter: &Chapter) -> FolioResult<()>;

    /// Atomically move a chapter into `generating`.
    ///
    /// Succeeds only when the chapter has no content and no generation in flight;
    /// returns the claimed chapter.
    async fn claim_generation(&self, id: ChapterId) -> FolioResult<Chapter>;

    /// Recaps of chapters numbered `<= up_to`, ascending, skipping chapters
    /// without a summary.
    async fn chapter_summaries(
        &self,
        book_id: BookId,
        up_to: u32,
    ) -> FolioResult<Vec<ContextEntry>> {
        Ok(self
            .list_chapters(book_id)
            .await?
            .into_iter()
            .filter(|c| *c.chapter_number() <= up_to)
            .filter_map(|c| {
                c.summary().clone().map(|summary| ContextEntry {
                    chapter_number: *c.chapter_number(),
                    title: c.title().clone(),
                    summary,
                })
            })
            .collect())
    }

    /// Find a chapter by its number within a book.
    async fn find_chapter(&self, book_id: BookId, number: u32) -> FolioResult<Option<Chapter>> {
        Ok(self
            .list_chapters(book_id)
            .await?
            .into_iter()
            .find(|c| *c.chapter_number() == number))
    }
}

/// Store for compiled documents.
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Persist rendered bytes and return an addressable path or handle.
    async fn store(
        &self,
        book: &Book,
        format: OutputFormat,
        bytes: &[u8],
    ) -> FolioResult<String>;

    /// Read back a stored artifact.
    async fn retrieve(&self, handle: &str) -> FolioResult<Vec<u8>>;
}

/// Receiver of pipeline events.
///
/// Delivery failures are the notifier's problem; the pipeline never fails because
/// a notification could not be sent.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an event.
    async fn notify(&self, event: &PipelineEvent);
}

//! In-memory implementation of BookRepository.
//!
//! Stores books and chapters in HashMaps protected by an RwLock. All data is lost
//! when the repository is dropped.

use crate::tables::Tables;
use async_trait::async_trait;
use folio_core::{Book, BookId, Chapter, ChapterId};
use folio_error::FolioResult;
use folio_interface::BookRepository;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory repository for books and chapters.
///
/// # Example
/// ```no_run
/// use folio_storage::InMemoryBookRepository;
/// use folio_interface::BookRepository;
/// use folio_core::Book;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = InMemoryBookRepository::new();
///     repo.create_book(&Book::new("Title", "brief")).await.unwrap();
///     assert_eq!(repo.len().await, 1);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBookRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books.
    pub async fn len(&self) -> usize {
        self.tables.read().await.book_count()
    }

    /// Whether no books are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove every record.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create_book(&self, book: &Book) -> FolioResult<()> {
        self.tables.write().await.create_book(book)
    }

    async fn get_book(&self, id: BookId) -> FolioResult<Book> {
        self.tables.read().await.get_book(id)
    }

    async fn list_books(&self) -> FolioResult<Vec<Book>> {
        Ok(self.tables.read().await.list_books())
    }

    async fn update_book(&self, book: &Book) -> FolioResult<()> {
        self.tables.write().await.update_book(book)
    }

    async fn delete_book(&self, id: BookId) -> FolioResult<()> {
        self.tables.write().await.delete_book(id)
    }

    async fn create_chapters(&self, chapters: &[Chapter]) -> FolioResult<()> {
        self.tables.write().await.create_chapters(chapters)
    }

    async fn get_chapter(&self, id: ChapterId) -> FolioResult<Chapter> {
        self.tables.read().await.get_chapter(id)
    }

    async fn list_chapters(&self, book_id: BookId) -> FolioResult<Vec<Chapter>> {
        Ok(self.tables.read().await.list_chapters(book_id))
    }

    async fn update_chapter(&self, chapter: &Chapter) -> FolioResult<()> {
        self.tables.write().await.update_chapter(chapter)
    }

    async fn claim_generation(&self, id: ChapterId) -> FolioResult<Chapter> {
        self.tables.write().await.claim_generation(id)
    }
}

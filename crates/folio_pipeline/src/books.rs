//! Book intake and the final review gate.

use folio_core::{Book, BookId};
use folio_error::{FolioResult, ValidationError, ValidationErrorKind};
use folio_interface::BookRepository;
use std::sync::Arc;

/// Submits briefs and manages book-level records.
#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    /// Create a service over a record store.
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Register a new book from its brief.
    ///
    /// A book whose title matches an existing one (ignoring case and surrounding
    /// whitespace) is returned unchanged instead of creating a duplicate.
    #[tracing::instrument(skip(self, brief), fields(title = %title))]
    pub async fn submit_brief(&self, title: &str, brief: &str) -> FolioResult<Book> {
        if title.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::InvalidInput(
                "book title must not be empty".to_string(),
            ))
            .into());
        }

        if let Some(existing) = self
            .repository
            .list_books()
            .await?
            .into_iter()
            .find(|b| b.title_matches(title))
        {
            tracing::info!(book_id = %existing.id(), "Book already submitted");
            return Ok(existing);
        }

        let book = Book::new(title, brief);
        self.repository.create_book(&book).await?;
        tracing::info!(book_id = %book.id(), "Book submitted");
        Ok(book)
    }

    /// Load one book.
    pub async fn get_book(&self, id: BookId) -> FolioResult<Book> {
        self.repository.get_book(id).await
    }

    /// All books in submission order.
    pub async fn list_books(&self) -> FolioResult<Vec<Book>> {
        self.repository.list_books().await
    }

    /// Delete a book and its chapters.
    #[tracing::instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> FolioResult<()> {
        self.repository.delete_book(id).await?;
        tracing::info!("Book deleted");
        Ok(())
    }

    /// Hold compilation until a reviewer signs off the final draft.
    #[tracing::instrument(skip(self))]
    pub async fn request_final_review(&self, id: BookId) -> FolioResult<Book> {
        let mut book = self.repository.get_book(id).await?;
        book.request_final_review();
        self.repository.update_book(&book).await?;
        tracing::info!("Final review requested");
        Ok(book)
    }

    /// Release the final review gate.
    #[tracing::instrument(skip(self))]
    pub async fn approve_final_review(&self, id: BookId) -> FolioResult<Book> {
        let mut book = self.repository.get_book(id).await?;
        book.approve_final_review();
        self.repository.update_book(&book).await?;
        tracing::info!("Final review approved");
        Ok(book)
    }
}

//! Table logic shared by the repository backends.

use folio_core::{Book, BookId, Chapter, ChapterId, ContentState};
use folio_error::{
    FolioResult, StorageError, StorageErrorKind, ValidationError, ValidationErrorKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Books and chapters keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Tables {
    #[serde(default)]
    books: HashMap<BookId, Book>,
    #[serde(default)]
    chapters: HashMap<ChapterId, Chapter>,
}

impl Tables {
    pub(crate) fn book_count(&self) -> usize {
        self.books.len()
    }

    pub(crate) fn create_book(&mut self, book: &Book) -> FolioResult<()> {
        if self.books.contains_key(book.id()) {
            return Err(StorageError::new(StorageErrorKind::Conflict(format!(
                "book {} already exists",
                book.id()
            )))
            .into());
        }
        self.books.insert(*book.id(), book.clone());
        Ok(())
    }

    pub(crate) fn get_book(&self, id: BookId) -> FolioResult<Book> {
        self.books
            .get(&id)
            .cloned()
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::BookNotFound(id.to_string())).into())
    }

    pub(crate) fn list_books(&self) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.values().cloned().collect();
        books.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.title().cmp(b.title()))
        });
        books
    }

    pub(crate) fn update_book(&mut self, book: &Book) -> FolioResult<()> {
        match self.books.get_mut(book.id()) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(ValidationError::new(ValidationErrorKind::BookNotFound(
                book.id().to_string(),
            ))
            .into()),
        }
    }

    pub(crate) fn delete_book(&mut self, id: BookId) -> FolioResult<()> {
        if self.books.remove(&id).is_none() {
            return Err(
                ValidationError::new(ValidationErrorKind::BookNotFound(id.to_string())).into(),
            );
        }
        self.chapters.retain(|_, chapter| *chapter.book_id() != id);
        Ok(())
    }

    pub(crate) fn create_chapters(&mut self, chapters: &[Chapter]) -> FolioResult<()> {
        for chapter in chapters {
            if !self.books.contains_key(chapter.book_id()) {
                return Err(ValidationError::new(ValidationErrorKind::BookNotFound(
                    chapter.book_id().to_string(),
                ))
                .into());
            }
            let taken = self.chapters.values().any(|existing| {
                existing.book_id() == chapter.book_id()
                    && existing.chapter_number() == chapter.chapter_number()
            });
            if taken {
                return Err(StorageError::new(StorageErrorKind::Conflict(format!(
                    "chapter {} of book {} already exists",
                    chapter.chapter_number(),
                    chapter.book_id()
                )))
                .into());
            }
        }
        for chapter in chapters {
            self.chapters.insert(*chapter.id(), chapter.clone());
        }
        Ok(())
    }

    pub(crate) fn get_chapter(&self, id: ChapterId) -> FolioResult<Chapter> {
        self.chapters.get(&id).cloned().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::ChapterNotFound(id.to_string())).into()
        })
    }

    pub(crate) fn list_chapters(&self, book_id: BookId) -> Vec<Chapter> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .values()
            .filter(|c| *c.book_id() == book_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| *c.chapter_number());
        chapters
    }

    pub(crate) fn update_chapter(&mut self, chapter: &Chapter) -> FolioResult<()> {
        match self.chapters.get_mut(chapter.id()) {
            Some(stored) => {
                *stored = chapter.clone();
                Ok(())
            }
            None => Err(ValidationError::new(ValidationErrorKind::ChapterNotFound(
                chapter.id().to_string(),
            ))
            .into()),
        }
    }

    pub(crate) fn claim_generation(&mut self, id: ChapterId) -> FolioResult<Chapter> {
        let chapter = self.chapters.get_mut(&id).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::ChapterNotFound(id.to_string()))
        })?;
        if *chapter.content_state() == ContentState::Generating {
            return Err(ValidationError::new(ValidationErrorKind::GenerationInProgress(
                format!("{} of book {}", chapter.chapter_number(), chapter.book_id()),
            ))
            .into());
        }
        chapter.begin_generation()?;
        Ok(chapter.clone())
    }
}

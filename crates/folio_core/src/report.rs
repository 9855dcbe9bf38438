//! Read-only reports over a book and its chapters.

use crate::{Book, BookId, Chapter, ContentState, ReviewState};
use serde::{Deserialize, Serialize};

/// Whether a book may be compiled, and why not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    /// True when no issues were found
    pub can_compile: bool,
    /// Human-readable blocking issues
    pub issues: Vec<String>,
    /// Number of chapters
    pub total: usize,
    /// Chapters with content
    pub generated: usize,
    /// Chapters in `approved` content state
    pub approved: usize,
    /// Final review gate
    pub final_status: ReviewState,
}

impl Readiness {
    /// Evaluate readiness for a book and its chapters.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::{Book, Readiness};
    ///
    /// let book = Book::new("Empty", "brief");
    /// let readiness = Readiness::evaluate(&book, &[]);
    /// assert!(!readiness.can_compile);
    /// assert_eq!(readiness.issues, vec!["No chapters found".to_string()]);
    /// ```
    pub fn evaluate(book: &Book, chapters: &[Chapter]) -> Self {
        let mut issues = Vec::new();
        let final_status = *book.final_review_state();
        if final_status == ReviewState::AwaitingReview {
            issues.push("Waiting for final review notes".to_string());
        }

        let generated = chapters.iter().filter(|c| c.has_content()).count();
        if chapters.is_empty() {
            issues.push("No chapters found".to_string());
        } else if generated < chapters.len() {
            issues.push(format!(
                "{} chapters not generated",
                chapters.len() - generated
            ));
        }

        Self {
            can_compile: issues.is_empty(),
            issues,
            total: chapters.len(),
            generated,
            approved: chapters
                .iter()
                .filter(|c| *c.content_state() == ContentState::Approved)
                .count(),
            final_status,
        }
    }
}

/// Per-chapter line in a [`BookProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProgress {
    /// Chapter number
    pub chapter_number: u32,
    /// Chapter title
    pub title: String,
    /// Generation state
    pub content_state: ContentState,
    /// Review gate
    pub review_state: ReviewState,
    /// Whether content is present
    pub has_content: bool,
    /// Whether a summary is present
    pub has_summary: bool,
    /// Regenerations applied
    pub revision: u32,
}

/// Chapter generation progress for a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookProgress {
    /// Book id
    pub book_id: BookId,
    /// Book title
    pub title: String,
    /// Number of chapters
    pub total: usize,
    /// Chapters with content
    pub generated: usize,
    /// Chapters in `approved` content state
    pub approved: usize,
    /// Chapters without content
    pub pending: usize,
    /// Chapters blocked on a reviewer
    pub awaiting_review: usize,
    /// Per-chapter detail in chapter order
    pub chapters: Vec<ChapterProgress>,
}

impl BookProgress {
    /// Summarise a book's chapters.
    pub fn evaluate(book: &Book, chapters: &[Chapter]) -> Self {
        Self {
            book_id: *book.id(),
            title: book.title().clone(),
            total: chapters.len(),
            generated: chapters.iter().filter(|c| c.has_content()).count(),
            approved: chapters
                .iter()
                .filter(|c| *c.content_state() == ContentState::Approved)
                .count(),
            pending: chapters.iter().filter(|c| !c.has_content()).count(),
            awaiting_review: chapters
                .iter()
                .filter(|c| *c.review_state() == ReviewState::AwaitingReview)
                .count(),
            chapters: chapters
                .iter()
                .map(|c| ChapterProgress {
                    chapter_number: *c.chapter_number(),
                    title: c.title().clone(),
                    content_state: *c.content_state(),
                    review_state: *c.review_state(),
                    has_content: c.has_content(),
                    has_summary: c.summary().is_some(),
                    revision: *c.revision(),
                })
                .collect(),
        }
    }
}

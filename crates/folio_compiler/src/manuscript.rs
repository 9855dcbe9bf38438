//! Render-ready view of a book.

use chrono::NaiveDate;
use folio_core::{Book, Chapter};
use folio_document::{ContentBlock, parse_blocks};
use serde::{Deserialize, Serialize};

/// One chapter with its content parsed into blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptChapter {
    /// Chapter number
    pub number: u32,
    /// Chapter title
    pub title: String,
    /// Parsed body
    pub blocks: Vec<ContentBlock>,
}

impl ManuscriptChapter {
    /// Heading line used for the chapter and its table of contents entry.
    pub fn heading(&self) -> String {
        format!("Chapter {}: {}", self.number, self.title)
    }
}

/// Everything a renderer needs: title, date and chapters in order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use folio_compiler::{Manuscript, ManuscriptChapter};
///
/// let manuscript = Manuscript::new(
///     "Rust at Sea",
///     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
///     vec![],
/// );
/// assert_eq!(manuscript.date_line(), "Generated on March 05, 2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manuscript {
    /// Book title
    pub title: String,
    /// Compilation date shown on the title page
    pub generated_on: NaiveDate,
    /// Chapters with content, ascending by number
    pub chapters: Vec<ManuscriptChapter>,
}

impl Manuscript {
    /// Build a manuscript from explicit parts.
    pub fn new(
        title: impl Into<String>,
        generated_on: NaiveDate,
        chapters: Vec<ManuscriptChapter>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_on,
            chapters,
        }
    }

    /// Assemble a book's chapters that have content, sorted by chapter number.
    pub fn from_book(book: &Book, chapters: &[Chapter], generated_on: NaiveDate) -> Self {
        let mut with_content: Vec<&Chapter> =
            chapters.iter().filter(|c| c.has_content()).collect();
        with_content.sort_by_key(|c| *c.chapter_number());

        Self {
            title: book.title().clone(),
            generated_on,
            chapters: with_content
                .into_iter()
                .map(|c| ManuscriptChapter {
                    number: *c.chapter_number(),
                    title: c.title().clone(),
                    blocks: parse_blocks(c.content().as_deref().unwrap_or_default()),
                })
                .collect(),
        }
    }

    /// Title page date line.
    pub fn date_line(&self) -> String {
        format!("Generated on {}", self.generated_on.format("%B %d, %Y"))
    }
}

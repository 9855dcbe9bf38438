//! Outline decomposition and context-chaining value types.

use serde::{Deserialize, Serialize};

/// One chapter extracted from an outline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterStub {
    /// Chapter number as written in the outline
    pub chapter_number: u32,
    /// Trimmed chapter title
    pub title: String,
}

impl ChapterStub {
    /// Create a stub.
    pub fn new(chapter_number: u32, title: impl Into<String>) -> Self {
        Self {
            chapter_number,
            title: title.into(),
        }
    }
}

/// Recap of an earlier chapter passed as context to a later one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Earlier chapter's number
    pub chapter_number: u32,
    /// Earlier chapter's title
    pub title: String,
    /// Earlier chapter's summary
    pub summary: String,
}

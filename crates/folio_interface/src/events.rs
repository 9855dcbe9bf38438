//! Events emitted by the pipeline.

use folio_core::{BookId, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pipeline milestone worth telling a human about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "event", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineEvent {
    /// An outline was generated and waits for review
    OutlineReady {
        /// Book id
        book_id: BookId,
        /// Book title
        title: String,
    },
    /// The batch stopped at a chapter that needs reviewer notes
    WaitingChapterNotes {
        /// Book id
        book_id: BookId,
        /// Blocking chapter
        chapter_number: u32,
    },
    /// A chapter was generated or regenerated
    ChapterReady {
        /// Book id
        book_id: BookId,
        /// Chapter number
        chapter_number: u32,
    },
    /// Compiled documents are available
    FinalDraftReady {
        /// Book id
        book_id: BookId,
        /// Artifact path per format
        paths: BTreeMap<OutputFormat, String>,
    },
    /// Every chapter is approved and the book compiled
    BookCompleted {
        /// Book id
        book_id: BookId,
    },
    /// A pipeline step failed
    Error {
        /// Book id
        book_id: BookId,
        /// Failure description
        message: String,
    },
}

impl PipelineEvent {
    /// Event name, e.g. `chapter_ready`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Book the event concerns.
    pub fn book_id(&self) -> BookId {
        match self {
            PipelineEvent::OutlineReady { book_id, .. }
            | PipelineEvent::WaitingChapterNotes { book_id, .. }
            | PipelineEvent::ChapterReady { book_id, .. }
            | PipelineEvent::FinalDraftReady { book_id, .. }
            | PipelineEvent::BookCompleted { book_id }
            | PipelineEvent::Error { book_id, .. } => *book_id,
        }
    }

    /// One-line human description.
    pub fn message(&self) -> String {
        match self {
            PipelineEvent::OutlineReady { title, .. } => {
                format!("Outline for '{}' is ready for review", title)
            }
            PipelineEvent::WaitingChapterNotes { chapter_number, .. } => {
                format!("Chapter {} is waiting for editor notes", chapter_number)
            }
            PipelineEvent::ChapterReady { chapter_number, .. } => {
                format!("Chapter {} has been generated", chapter_number)
            }
            PipelineEvent::FinalDraftReady { paths, .. } => {
                let files: Vec<String> = paths
                    .iter()
                    .map(|(format, path)| format!("{}: {}", format, path))
                    .collect();
                format!("Final draft compiled ({})", files.join(", "))
            }
            PipelineEvent::BookCompleted { .. } => "Book completed".to_string(),
            PipelineEvent::Error { message, .. } => format!("Pipeline error: {}", message),
        }
    }
}

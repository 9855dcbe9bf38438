//! Test utilities for compiler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use folio_core::{Book, Chapter, OutputFormat};
use folio_error::{FolioResult, RenderError, RenderErrorKind};
use folio_compiler::{DocumentRenderer, Manuscript};
use folio_interface::{BookRepository, Notifier, PipelineEvent};
use folio_storage::InMemoryBookRepository;
use std::sync::{Arc, Mutex};

/// Chapter body exercising every block kind.
pub const RICH_BODY: &str = "## The Harbour\n\nWe **left** at dawn, rope coiled.\n\n- rope\n- sail\n\n1. hoist\n2. trim\n\n> Fair winds.\n\n```rust\nfn main() {}\n```\n";

/// Records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(PipelineEvent::name).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &PipelineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Renderer that always fails, for exercising partial compilation.
#[derive(Debug)]
pub struct BrokenRenderer(pub OutputFormat);

impl DocumentRenderer for BrokenRenderer {
    fn format(&self) -> OutputFormat {
        self.0
    }

    fn render(&self, _manuscript: &Manuscript) -> FolioResult<Vec<u8>> {
        Err(RenderError::new(RenderErrorKind::Layout {
            format: self.0.to_string(),
            message: "printer on fire".to_string(),
        })
        .into())
    }
}

/// Store a book with `count` chapters, each generated from `body`.
pub async fn written_book(
    repository: &Arc<InMemoryBookRepository>,
    title: &str,
    count: u32,
    body: &str,
) -> Book {
    let mut book = Book::new(title, "brief");
    book.record_outline("## Chapter 1: One").unwrap();
    book.approve_outline().unwrap();
    repository.create_book(&book).await.unwrap();

    let chapters: Vec<Chapter> = (1..=count)
        .map(|n| {
            let mut chapter = Chapter::new(*book.id(), n, format!("Part {}", n));
            chapter.begin_generation().unwrap();
            chapter
                .record_generation(body, format!("Summary {}", n))
                .unwrap();
            chapter
        })
        .collect();
    repository.create_chapters(&chapters).await.unwrap();
    book
}

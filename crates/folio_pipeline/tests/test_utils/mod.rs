//! Test utilities for pipeline tests.
//!
//! Provides a scripted text generator, a recording notifier and a few setup helpers.

#![allow(dead_code)]

pub mod scripted_generator;

pub use scripted_generator::{RecordingNotifier, ScriptedGenerator};

use folio_core::Book;
use folio_interface::BookRepository;
use folio_pipeline::{BookLocks, ChapterGenerator, OutlineGenerator};
use folio_storage::InMemoryBookRepository;
use std::sync::Arc;

/// Outline with three numbered chapters.
pub const THREE_CHAPTERS: &str =
    "# Rust at Sea\n\n## Chapter 1: Casting Off\n\n## Chapter 2: Open Water\n\n## Chapter 3: Landfall\n";

/// Outline with five numbered chapters.
pub const FIVE_CHAPTERS: &str = "## Chapter 1: One\n## Chapter 2: Two\n## Chapter 3: Three\n## Chapter 4: Four\n## Chapter 5: Five\n";

/// Everything a pipeline test needs, wired to one in-memory store.
pub struct Harness {
    pub repository: Arc<InMemoryBookRepository>,
    pub generator: Arc<ScriptedGenerator>,
    pub notifier: Arc<RecordingNotifier>,
    pub outlines: OutlineGenerator,
    pub chapters: ChapterGenerator,
}

impl Harness {
    pub fn new(generator: ScriptedGenerator) -> Self {
        let repository = Arc::new(InMemoryBookRepository::new());
        let generator = Arc::new(generator);
        let notifier = Arc::new(RecordingNotifier::default());
        let locks = BookLocks::new();
        let outlines = OutlineGenerator::new(generator.clone(), repository.clone())
            .with_notifier(notifier.clone())
            .with_locks(locks.clone());
        let chapters = ChapterGenerator::new(generator.clone(), repository.clone())
            .with_notifier(notifier.clone())
            .with_locks(locks);
        Self {
            repository,
            generator,
            notifier,
            outlines,
            chapters,
        }
    }

    /// Store a book whose outline is already approved.
    pub async fn approved_book(&self, outline: &str) -> Book {
        let mut book = Book::new("Rust at Sea", "A sailing manual for systems programmers");
        book.record_outline(outline).expect("outline recorded");
        book.approve_outline().expect("outline approved");
        self.repository
            .create_book(&book)
            .await
            .expect("book stored");
        book
    }
}

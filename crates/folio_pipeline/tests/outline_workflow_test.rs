//! Book intake and outline gate tests.

mod test_utils;

use folio_core::{Book, OutlineAction, OutputState, ReviewState};
use folio_error::{FolioErrorKind, ValidationErrorKind};
use folio_interface::BookRepository;
use folio_pipeline::BookService;
use test_utils::{Harness, ScriptedGenerator, THREE_CHAPTERS};

#[tokio::test]
async fn submit_brief_deduplicates_titles() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let books = BookService::new(harness.repository.clone());

    let first = books.submit_brief("Rust at Sea", "sailing").await?;
    let second = books.submit_brief("  rust AT sea ", "different brief").await?;

    assert_eq!(first.id(), second.id());
    assert_eq!(second.brief(), "sailing");
    assert_eq!(books.list_books().await?.len(), 1);
    assert_eq!(*first.outline_review_state(), ReviewState::Pending);
    assert_eq!(*first.output_state(), OutputState::Pending);
    Ok(())
}

#[tokio::test]
async fn submit_brief_rejects_blank_title() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let books = BookService::new(harness.repository.clone());

    let err = books.submit_brief("   ", "brief").await.unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::InvalidInput(_))
    ));
    Ok(())
}

#[tokio::test]
async fn delete_book_cascades_to_chapters() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let books = BookService::new(harness.repository.clone());
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    books.delete_book(*book.id()).await?;

    assert!(books.list_books().await?.is_empty());
    assert!(harness.repository.list_chapters(*book.id()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn outline_generation_moves_to_review() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;
    assert_eq!(
        harness.outlines.outline_status(*book.id()).await?,
        OutlineAction::Generate
    );

    let book = harness.outlines.generate_outline(*book.id()).await?;

    assert_eq!(book.outline().as_deref(), Some(THREE_CHAPTERS));
    assert_eq!(*book.outline_review_state(), ReviewState::AwaitingReview);
    assert_eq!(
        harness.outlines.outline_status(*book.id()).await?,
        OutlineAction::Wait
    );
    assert_eq!(harness.notifier.names(), vec!["outline_ready"]);
    let prompt = &harness.generator.prompts()[0];
    assert!(prompt.contains("BOOK TITLE: Rust at Sea"));
    assert!(prompt.contains("EDITOR'S NOTES & REQUIREMENTS:\nsailing"));
    Ok(())
}

#[tokio::test]
async fn outline_generation_is_idempotent() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;

    harness.outlines.generate_outline(*book.id()).await?;
    harness.outlines.generate_outline(*book.id()).await?;

    assert_eq!(harness.generator.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn outline_generation_requires_brief() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Blank", "  ");
    harness.repository.create_book(&book).await?;

    let err = harness
        .outlines
        .generate_outline(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::MissingBrief(_))
    ));
    assert_eq!(
        harness.outlines.outline_status(*book.id()).await?,
        OutlineAction::Pause
    );
    Ok(())
}

#[tokio::test]
async fn outline_failure_marks_book_error() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    harness.generator.fail_on("BOOK TITLE");
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;

    let err = harness
        .outlines
        .generate_outline(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FolioErrorKind::Generation(_)));

    let stored = harness.repository.get_book(*book.id()).await?;
    assert_eq!(*stored.output_state(), OutputState::Error);
    assert!(stored.outline().is_none());
    assert_eq!(harness.notifier.names(), vec!["error"]);
    Ok(())
}

#[tokio::test]
async fn outline_revision_cycle() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;
    harness.outlines.generate_outline(*book.id()).await?;

    harness
        .outlines
        .request_outline_revision(*book.id(), "Add an appendix")
        .await?;
    assert_eq!(
        harness.outlines.outline_status(*book.id()).await?,
        OutlineAction::Regenerate
    );

    let revised = harness.outlines.regenerate_outline(*book.id()).await?;

    assert!(revised.outline().as_deref().unwrap_or_default().contains("Appendix"));
    assert!(revised.outline_feedback().is_none());
    assert_eq!(*revised.outline_review_state(), ReviewState::AwaitingReview);
    let prompt = harness.generator.prompts().pop().unwrap_or_default();
    assert!(prompt.contains("EDITOR'S FEEDBACK FOR IMPROVEMENT:\nAdd an appendix"));
    assert_eq!(
        harness.notifier.names(),
        vec!["outline_ready", "outline_ready"]
    );
    Ok(())
}

#[tokio::test]
async fn outline_regeneration_requires_feedback() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;

    let err = harness
        .outlines
        .regenerate_outline(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::MissingOutline(_))
    ));

    harness.outlines.generate_outline(*book.id()).await?;
    let err = harness
        .outlines
        .regenerate_outline(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::NoPendingFeedback(_))
    ));
    Ok(())
}

#[tokio::test]
async fn revision_rejected_before_outline_exists() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;

    let err = harness
        .outlines
        .request_outline_revision(*book.id(), "notes")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), FolioErrorKind::Lifecycle(_)));
    Ok(())
}

#[tokio::test]
async fn approval_requires_outline_and_starts_book() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("Rust at Sea", "sailing");
    harness.repository.create_book(&book).await?;

    assert!(harness.outlines.approve_outline(*book.id()).await.is_err());

    harness.outlines.generate_outline(*book.id()).await?;
    let approved = harness.outlines.approve_outline(*book.id()).await?;

    assert_eq!(*approved.outline_review_state(), ReviewState::Approved);
    assert_eq!(*approved.output_state(), OutputState::InProgress);
    assert_eq!(
        harness.outlines.outline_status(*book.id()).await?,
        OutlineAction::Proceed
    );
    Ok(())
}

#[tokio::test]
async fn pending_outlines_skip_and_collect() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let ready = Book::new("Ready", "brief");
    let blank = Book::new("Blank", "");
    let failing = Book::new("Failing", "brief");
    let done = harness.approved_book(THREE_CHAPTERS).await;
    for book in [&ready, &blank, &failing] {
        harness.repository.create_book(book).await?;
    }
    harness.generator.fail_on("BOOK TITLE: Failing");

    let batch = harness.outlines.generate_pending_outlines().await?;

    assert_eq!(batch.generated, vec![*ready.id()]);
    assert_eq!(batch.skipped, vec![*blank.id()]);
    assert_eq!(batch.failed.len(), 1);
    assert_eq!(batch.failed[0].0, *failing.id());
    assert!(!batch.generated.contains(done.id()));
    Ok(())
}

#[tokio::test]
async fn final_review_gate_round_trip() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let books = BookService::new(harness.repository.clone());
    let book = books.submit_brief("Rust at Sea", "sailing").await?;

    let held = books.request_final_review(*book.id()).await?;
    assert_eq!(*held.final_review_state(), ReviewState::AwaitingReview);

    let released = books.approve_final_review(*book.id()).await?;
    assert_eq!(*released.final_review_state(), ReviewState::Approved);
    Ok(())
}

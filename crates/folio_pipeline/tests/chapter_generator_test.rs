//! Chapter generation tests against the in-memory store.

mod test_utils;

use folio_core::{Book, ChapterAction, ContentState, ReviewState};
use folio_error::ValidationErrorKind;
use folio_interface::{BookRepository, PipelineEvent};
use folio_pipeline::HaltReason;
use test_utils::{FIVE_CHAPTERS, Harness, ScriptedGenerator, THREE_CHAPTERS};

#[tokio::test]
async fn initialization_numbers_chapters_densely() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness
        .approved_book("## Chapter 2: Bravo\n## Chapter 5: Echo\n## Chapter 3: Charlie")
        .await;

    let chapters = harness.chapters.initialize_chapters(*book.id()).await?;
    let listed: Vec<_> = chapters
        .iter()
        .map(|c| (*c.chapter_number(), c.title().as_str()))
        .collect();
    assert_eq!(listed, vec![(1, "Bravo"), (2, "Charlie"), (3, "Echo")]);
    Ok(())
}

#[tokio::test]
async fn initialization_runs_once() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;

    let first = harness.chapters.initialize_chapters(*book.id()).await?;
    let second = harness.chapters.initialize_chapters(*book.id()).await?;

    assert_eq!(first, second);
    assert_eq!(harness.repository.list_chapters(*book.id()).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn initialization_requires_outline() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = Book::new("No Outline", "brief");
    harness.repository.create_book(&book).await?;

    let err = harness
        .chapters
        .initialize_chapters(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::MissingOutline(_))
    ));
    Ok(())
}

#[tokio::test]
async fn initialization_rejects_outline_without_chapters() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book("just prose, no headings").await;

    let err = harness
        .chapters
        .initialize_chapters(*book.id())
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::NoChapters(_))
    ));
    Ok(())
}

#[tokio::test]
async fn generation_requires_approved_outline() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let mut book = Book::new("Unapproved", "brief");
    book.record_outline(THREE_CHAPTERS)?;
    harness.repository.create_book(&book).await?;
    harness.chapters.initialize_chapters(*book.id()).await?;

    let err = harness.chapters.generate(*book.id(), 1).await.unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::OutlineNotApproved { .. })
    ));

    let err = harness
        .chapters
        .generate_all(*book.id(), false)
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::OutlineNotApproved { .. })
    ));
    assert_eq!(harness.generator.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_chapter_number_is_rejected() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    let err = harness.chapters.generate(*book.id(), 7).await.unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::ChapterNumberNotFound { number: 7, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn generation_stores_content_and_summary() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    let chapter = harness.chapters.generate(*book.id(), 1).await?;

    assert_eq!(
        chapter.content().as_deref(),
        Some("## Section\n\nBody of chapter 1")
    );
    assert_eq!(chapter.summary().as_deref(), Some("Summary of chapter 1"));
    assert_eq!(*chapter.content_state(), ContentState::Generated);
    assert_eq!(*chapter.review_state(), ReviewState::AwaitingReview);
    assert_eq!(*chapter.revision(), 0);
    assert_eq!(harness.notifier.names(), vec!["chapter_ready"]);
    Ok(())
}

#[tokio::test]
async fn repeated_generation_is_a_no_op() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    let first = harness.chapters.generate(*book.id(), 1).await?;
    let second = harness.chapters.generate(*book.id(), 1).await?;

    assert_eq!(first.content(), second.content());
    // one body request plus one summary request
    assert_eq!(harness.generator.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn concurrent_triggers_generate_once() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    let (a, b) = tokio::join!(
        harness.chapters.generate(*book.id(), 1),
        harness.chapters.generate(*book.id(), 1)
    );

    assert_eq!(a?.content(), b?.content());
    assert_eq!(harness.generator.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn first_chapter_has_empty_context() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(FIVE_CHAPTERS));
    let book = harness.approved_book(FIVE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    assert!(harness.chapters.context_for_chapter(*book.id(), 1).await?.is_empty());
    harness.chapters.generate(*book.id(), 1).await?;
    let prompt = harness.generator.chapter_prompt(1).expect("chapter 1 prompt");
    assert!(!prompt.contains("SUMMARY OF PREVIOUS CHAPTERS"));
    Ok(())
}

#[tokio::test]
async fn context_holds_only_summarised_predecessors() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(FIVE_CHAPTERS));
    let book = harness.approved_book(FIVE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    for n in [1, 2, 4] {
        harness.chapters.generate(*book.id(), n).await?;
    }

    let context = harness.chapters.context_for_chapter(*book.id(), 5).await?;
    let numbers: Vec<u32> = context.iter().map(|c| c.chapter_number).collect();
    assert_eq!(numbers, vec![1, 2, 4]);
    assert_eq!(context[2].title, "Four");
    assert_eq!(context[2].summary, "Summary of chapter 4");

    harness.chapters.generate(*book.id(), 5).await?;
    let prompt = harness.generator.chapter_prompt(5).expect("chapter 5 prompt");
    assert!(prompt.contains("SUMMARY OF PREVIOUS CHAPTERS:\n\nChapter 1: One\nSummary of chapter 1\n"));
    assert!(prompt.contains("\nChapter 4: Four\nSummary of chapter 4\n"));
    assert!(!prompt.contains("Summary of chapter 3"));
    Ok(())
}

#[tokio::test]
async fn batch_generates_pending_chapters_in_order() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;

    let report = harness.chapters.generate_all(*book.id(), false).await?;

    assert_eq!(report.generated_numbers(), vec![1, 2, 3]);
    assert!(report.auto_approved.is_empty());
    assert!(report.is_complete());

    let prompt = harness.generator.chapter_prompt(3).expect("chapter 3 prompt");
    assert!(prompt.contains("Summary of chapter 1"));
    assert!(prompt.contains("Summary of chapter 2"));
    Ok(())
}

#[tokio::test]
async fn batch_halts_at_chapter_awaiting_review() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.generate_all(*book.id(), false).await?;
    let calls = harness.generator.call_count();

    let report = harness.chapters.generate_all(*book.id(), false).await?;

    assert!(report.generated.is_empty());
    assert_eq!(
        report.halted,
        Some(HaltReason::AwaitingNotes { chapter_number: 1 })
    );
    assert_eq!(harness.generator.call_count(), calls);
    assert!(harness.notifier.events().contains(&PipelineEvent::WaitingChapterNotes {
        book_id: *book.id(),
        chapter_number: 1,
    }));
    Ok(())
}

#[tokio::test]
async fn batch_auto_approves_everything() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;

    let report = harness.chapters.generate_all(*book.id(), true).await?;

    assert_eq!(report.generated_numbers(), vec![1, 2, 3]);
    assert_eq!(report.auto_approved, vec![1, 2, 3]);
    let progress = harness.chapters.book_progress(*book.id()).await?;
    assert_eq!(progress.approved, 3);
    assert_eq!(progress.awaiting_review, 0);
    Ok(())
}

#[tokio::test]
async fn auto_approve_releases_waiting_chapters() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.generate_all(*book.id(), false).await?;
    let calls = harness.generator.call_count();

    let report = harness.chapters.generate_all(*book.id(), true).await?;

    assert!(report.generated.is_empty());
    assert_eq!(report.auto_approved, vec![1, 2, 3]);
    assert_eq!(harness.generator.call_count(), calls);
    Ok(())
}

#[tokio::test]
async fn batch_skips_approved_and_regenerates_with_notes() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.generate_all(*book.id(), false).await?;
    harness.chapters.approve_chapter(*book.id(), 1).await?;
    harness
        .chapters
        .request_chapter_revision(*book.id(), 2, "More weather")
        .await?;

    let report = harness.chapters.generate_all(*book.id(), false).await?;

    assert_eq!(report.generated_numbers(), vec![2]);
    assert_eq!(
        report.halted,
        Some(HaltReason::AwaitingNotes { chapter_number: 3 })
    );
    let regenerated = &report.generated[0];
    assert_eq!(
        regenerated.content().as_deref(),
        Some("Revised body of chapter 2")
    );
    assert_eq!(*regenerated.revision(), 1);
    assert!(regenerated.pending_feedback().is_none());
    assert!(
        harness
            .generator
            .prompts()
            .iter()
            .any(|p| p.contains("EDITOR'S FEEDBACK:\nMore weather"))
    );
    Ok(())
}

#[tokio::test]
async fn batch_pauses_on_ambiguous_chapter() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    let chapters = harness.chapters.initialize_chapters(*book.id()).await?;

    // content present but never put up for review
    let mut raw = serde_json::to_value(&chapters[0])?;
    raw["content"] = "Imported text".into();
    raw["summary"] = "Imported summary".into();
    raw["content_state"] = "generated".into();
    let imported: folio_core::Chapter = serde_json::from_value(raw)?;
    assert_eq!(imported.action(), ChapterAction::Pause);
    harness.repository.update_chapter(&imported).await?;

    let report = harness.chapters.generate_all(*book.id(), true).await?;

    assert!(report.generated.is_empty());
    assert!(matches!(
        report.halted,
        Some(HaltReason::Paused {
            chapter_number: 1,
            ..
        })
    ));
    assert_eq!(harness.generator.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn failed_generation_marks_chapter_error() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.generator.fail_on("CHAPTER TO WRITE: Chapter 2:");

    let result = harness.chapters.generate_all(*book.id(), false).await;
    assert!(result.is_err());

    let first = harness.chapters.chapter(*book.id(), 1).await?;
    let second = harness.chapters.chapter(*book.id(), 2).await?;
    let third = harness.chapters.chapter(*book.id(), 3).await?;
    assert!(first.has_content());
    assert_eq!(*second.content_state(), ContentState::Error);
    assert!(!second.has_content());
    assert_eq!(*third.content_state(), ContentState::Pending);
    assert!(harness.notifier.names().contains(&"error"));

    harness.chapters.reset_chapter(*book.id(), 2).await?;
    harness.generator.recover();
    let second = harness.chapters.generate(*book.id(), 2).await?;
    assert_eq!(
        second.content().as_deref(),
        Some("## Section\n\nBody of chapter 2")
    );
    Ok(())
}

#[tokio::test]
async fn failed_summary_leaves_no_content() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;
    harness.generator.fail_on("Summarize");

    assert!(harness.chapters.generate(*book.id(), 1).await.is_err());

    let chapter = harness.chapters.chapter(*book.id(), 1).await?;
    assert!(chapter.content().is_none());
    assert!(chapter.summary().is_none());
    assert_eq!(*chapter.content_state(), ContentState::Error);
    Ok(())
}

#[tokio::test]
async fn regeneration_requires_feedback() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;
    harness.chapters.generate(*book.id(), 1).await?;

    let err = harness
        .chapters
        .regenerate_chapter(*book.id(), 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err.validation_kind(),
        Some(ValidationErrorKind::NoPendingFeedback(_))
    ));
    Ok(())
}

#[tokio::test]
async fn revision_requires_generated_chapter() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;

    assert!(
        harness
            .chapters
            .request_chapter_revision(*book.id(), 1, "notes")
            .await
            .is_err()
    );
    Ok(())
}

#[tokio::test]
async fn reset_rejects_chapter_with_content() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;
    harness.chapters.generate(*book.id(), 1).await?;

    assert!(harness.chapters.reset_chapter(*book.id(), 1).await.is_err());
    Ok(())
}

#[tokio::test]
async fn progress_counts_chapter_states() -> anyhow::Result<()> {
    let harness = Harness::new(ScriptedGenerator::new(THREE_CHAPTERS));
    let book = harness.approved_book(THREE_CHAPTERS).await;
    harness.chapters.initialize_chapters(*book.id()).await?;
    harness.chapters.generate(*book.id(), 1).await?;
    harness.chapters.generate(*book.id(), 2).await?;
    harness.chapters.approve_chapter(*book.id(), 1).await?;

    let progress = harness.chapters.book_progress(*book.id()).await?;

    assert_eq!(progress.total, 3);
    assert_eq!(progress.generated, 2);
    assert_eq!(progress.approved, 1);
    assert_eq!(progress.pending, 1);
    assert_eq!(progress.awaiting_review, 1);
    Ok(())
}

use folio_core::{Book, BookProgress, Chapter, Readiness, ReviewState};

fn book_with_outline() -> Book {
    let mut book = Book::new("Readiness", "brief");
    book.record_outline("## Chapter 1: One\n## Chapter 2: Two").unwrap();
    book.approve_outline().unwrap();
    book
}

fn written(book: &Book, number: u32) -> Chapter {
    let mut chapter = Chapter::new(*book.id(), number, format!("Ch {number}"));
    chapter.begin_generation().unwrap();
    chapter.record_generation("text", "summary").unwrap();
    chapter
}

#[test]
fn no_chapters_blocks_compilation() {
    let book = book_with_outline();
    let readiness = Readiness::evaluate(&book, &[]);
    assert!(!readiness.can_compile);
    assert_eq!(readiness.issues, vec!["No chapters found"]);
    assert_eq!(readiness.total, 0);
}

#[test]
fn missing_content_is_counted() {
    let book = book_with_outline();
    let chapters = vec![
        written(&book, 1),
        Chapter::new(*book.id(), 2, "Two"),
        Chapter::new(*book.id(), 3, "Three"),
    ];
    let readiness = Readiness::evaluate(&book, &chapters);
    assert!(!readiness.can_compile);
    assert_eq!(readiness.issues, vec!["2 chapters not generated"]);
    assert_eq!(readiness.generated, 1);
    assert_eq!(readiness.total, 3);
}

#[test]
fn final_review_hold_blocks_until_approved() {
    let mut book = book_with_outline();
    let chapters = vec![written(&book, 1), written(&book, 2)];

    book.request_final_review();
    let readiness = Readiness::evaluate(&book, &chapters);
    assert_eq!(readiness.issues, vec!["Waiting for final review notes"]);
    assert_eq!(readiness.final_status, ReviewState::AwaitingReview);

    book.approve_final_review();
    let readiness = Readiness::evaluate(&book, &chapters);
    assert!(readiness.can_compile);
    assert!(readiness.issues.is_empty());
}

#[test]
fn approved_count_tracks_content_state() {
    let book = book_with_outline();
    let mut first = written(&book, 1);
    first.approve();
    let chapters = vec![first, written(&book, 2)];

    let readiness = Readiness::evaluate(&book, &chapters);
    assert!(readiness.can_compile);
    assert_eq!(readiness.approved, 1);
    assert_eq!(readiness.generated, 2);
}

#[test]
fn progress_lists_every_chapter() {
    let book = book_with_outline();
    let chapters = vec![written(&book, 1), Chapter::new(*book.id(), 2, "Two")];
    let progress = BookProgress::evaluate(&book, &chapters);

    assert_eq!(progress.total, 2);
    assert_eq!(progress.pending, 1);
    assert_eq!(progress.awaiting_review, 1);
    assert_eq!(progress.chapters[0].chapter_number, 1);
    assert!(progress.chapters[0].has_summary);
    assert!(!progress.chapters[1].has_content);
}

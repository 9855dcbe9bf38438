//! Book record and its gate transitions.

use crate::{BookId, OutputFormat, OutputState, ReviewState};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use folio_error::LifecycleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A book moving through the pipeline.
///
/// Fields are private; every state change goes through a transition method so the
/// record can never hold an approved outline without outline text.
///
/// # Examples
///
/// ```
/// use folio_core::{Book, ReviewState};
///
/// let mut book = Book::new("Rust at Sea", "A sailing manual for systems programmers");
/// assert!(book.approve_outline().is_err());
///
/// book.record_outline("## Chapter 1: Knots").unwrap();
/// assert_eq!(*book.outline_review_state(), ReviewState::AwaitingReview);
///
/// book.approve_outline().unwrap();
/// assert_eq!(*book.outline_review_state(), ReviewState::Approved);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Book {
    /// Stable identity
    id: BookId,
    /// Working title
    title: String,
    /// Requirements text submitted before outlining
    brief: String,
    /// Generated outline text
    #[serde(default)]
    outline: Option<String>,
    /// Reviewer notes waiting to be applied to the outline
    #[serde(default)]
    outline_feedback: Option<String>,
    /// Outline gate
    #[serde(default)]
    outline_review_state: ReviewState,
    /// Final review gate checked before compilation
    #[serde(default)]
    final_review_state: ReviewState,
    /// Output state
    #[serde(default)]
    output_state: OutputState,
    /// Artifact location per successfully compiled format
    #[serde(default)]
    output_paths: BTreeMap<OutputFormat, String>,
    /// Submission time
    created_at: DateTime<Utc>,
}

impl Book {
    /// Create a book from a submitted brief.
    pub fn new(title: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            id: BookId::new(),
            title: title.into().trim().to_string(),
            brief: brief.into(),
            outline: None,
            outline_feedback: None,
            outline_review_state: ReviewState::Pending,
            final_review_state: ReviewState::Pending,
            output_state: OutputState::Pending,
            output_paths: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    fn entity(&self) -> String {
        format!("book {}", self.id)
    }

    /// Whether the brief carries any text.
    pub fn has_brief(&self) -> bool {
        !self.brief.trim().is_empty()
    }

    /// Whether the title matches another, ignoring case and surrounding whitespace.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.trim().to_lowercase() == title.trim().to_lowercase()
    }

    /// Artifact path for a compiled format, if any.
    pub fn output_path(&self, format: OutputFormat) -> Option<&str> {
        self.output_paths.get(&format).map(String::as_str)
    }

    /// Store a freshly generated or regenerated outline.
    ///
    /// Moves the outline gate to `awaiting_review` and consumes any pending outline
    /// feedback. Rejected once the outline is approved.
    pub fn record_outline(&mut self, outline: impl Into<String>) -> Result<(), LifecycleError> {
        match self.outline_review_state {
            ReviewState::Pending | ReviewState::AwaitingReview => {
                self.outline = Some(outline.into());
                self.outline_feedback = None;
                self.outline_review_state = ReviewState::AwaitingReview;
                Ok(())
            }
            ReviewState::Approved => Err(LifecycleError::invalid(
                self.entity(),
                format!("outline {}", self.outline_review_state),
                "replace outline of",
            )),
        }
    }

    /// Attach reviewer notes to an outline awaiting review.
    pub fn request_outline_revision(
        &mut self,
        feedback: impl Into<String>,
    ) -> Result<(), LifecycleError> {
        match self.outline_review_state {
            ReviewState::AwaitingReview => {
                self.outline_feedback = Some(feedback.into());
                Ok(())
            }
            ReviewState::Pending | ReviewState::Approved => Err(LifecycleError::invalid(
                self.entity(),
                format!("outline {}", self.outline_review_state),
                "request outline revision for",
            )),
        }
    }

    /// Approve the outline. Idempotent.
    ///
    /// Fails while no outline exists. Moves a pending book into `in_progress`.
    pub fn approve_outline(&mut self) -> Result<(), LifecycleError> {
        if self.outline.is_none() {
            return Err(LifecycleError::invalid(
                self.entity(),
                "without outline",
                "approve outline of",
            ));
        }
        self.outline_review_state = ReviewState::Approved;
        self.outline_feedback = None;
        if self.output_state == OutputState::Pending {
            self.output_state = OutputState::InProgress;
        }
        Ok(())
    }

    /// Put the final review gate on hold until a reviewer signs off.
    pub fn request_final_review(&mut self) {
        self.final_review_state = ReviewState::AwaitingReview;
    }

    /// Sign off the final review gate. Idempotent.
    pub fn approve_final_review(&mut self) {
        self.final_review_state = ReviewState::Approved;
    }

    /// Mark the book as failed.
    pub fn record_failure(&mut self) {
        self.output_state = OutputState::Error;
    }

    /// Record the outcome of a compilation run.
    ///
    /// Paths of successful formats are stored; the book is `completed` only when
    /// `all_succeeded` holds.
    pub fn record_compilation(
        &mut self,
        paths: impl IntoIterator<Item = (OutputFormat, String)>,
        all_succeeded: bool,
    ) {
        self.output_paths.extend(paths);
        self.output_state = if all_succeeded {
            OutputState::Completed
        } else {
            OutputState::Error
        };
    }
}

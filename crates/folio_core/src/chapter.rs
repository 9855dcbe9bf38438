//! Chapter record and its content/review transitions.

use crate::{BookId, ChapterId, ContentState, ReviewState};
use derive_getters::Getters;
use folio_error::LifecycleError;
use serde::{Deserialize, Serialize};

/// One chapter of a book.
///
/// `content` and `summary` are only ever set together, so a chapter has a summary
/// exactly when it has content.
///
/// # Examples
///
/// ```
/// use folio_core::{BookId, Chapter, ContentState, ReviewState};
///
/// let mut chapter = Chapter::new(BookId::new(), 1, "Knots");
/// chapter.begin_generation().unwrap();
/// chapter.record_generation("Body", "Recap").unwrap();
///
/// assert_eq!(*chapter.content_state(), ContentState::Generated);
/// assert_eq!(*chapter.review_state(), ReviewState::AwaitingReview);
/// assert_eq!(chapter.summary().as_deref(), Some("Recap"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Chapter {
    /// Stable identity
    id: ChapterId,
    /// Owning book
    book_id: BookId,
    /// Position within the book, starting at 1
    chapter_number: u32,
    /// Chapter title from the outline
    title: String,
    /// Generated body text
    #[serde(default)]
    content: Option<String>,
    /// Condensed recap fed to later chapters
    #[serde(default)]
    summary: Option<String>,
    /// Generation state
    #[serde(default)]
    content_state: ContentState,
    /// Review gate
    #[serde(default)]
    review_state: ReviewState,
    /// Reviewer notes waiting to be applied
    #[serde(default)]
    pending_feedback: Option<String>,
    /// Number of regenerations applied since the first generation
    #[serde(default)]
    revision: u32,
}

impl Chapter {
    /// Create an empty chapter stub.
    pub fn new(book_id: BookId, chapter_number: u32, title: impl Into<String>) -> Self {
        Self {
            id: ChapterId::new(),
            book_id,
            chapter_number,
            title: title.into(),
            content: None,
            summary: None,
            content_state: ContentState::Pending,
            review_state: ReviewState::Pending,
            pending_feedback: None,
            revision: 0,
        }
    }

    fn entity(&self) -> String {
        format!("chapter {} of book {}", self.chapter_number, self.book_id)
    }

    fn state_label(&self) -> String {
        format!("{}/{}", self.content_state, self.review_state)
    }

    /// Whether body text is present.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Whether the chapter reached its terminal state.
    pub fn is_approved(&self) -> bool {
        self.review_state == ReviewState::Approved || self.content_state == ContentState::Approved
    }

    /// Claim the chapter for a first generation.
    ///
    /// Only chapters without content that are not already generating may be claimed.
    pub fn begin_generation(&mut self) -> Result<(), LifecycleError> {
        if self.content.is_some() || self.is_approved() {
            return Err(LifecycleError::invalid(
                self.entity(),
                self.state_label(),
                "generate",
            ));
        }
        match self.content_state {
            ContentState::Pending | ContentState::Error => {
                self.content_state = ContentState::Generating;
                Ok(())
            }
            ContentState::Generating | ContentState::Generated | ContentState::Approved => Err(
                LifecycleError::invalid(self.entity(), self.state_label(), "generate"),
            ),
        }
    }

    /// Store the result of a first generation.
    pub fn record_generation(
        &mut self,
        content: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<(), LifecycleError> {
        if self.content_state != ContentState::Generating {
            return Err(LifecycleError::invalid(
                self.entity(),
                self.state_label(),
                "store generated content for",
            ));
        }
        self.content = Some(content.into());
        self.summary = Some(summary.into());
        self.content_state = ContentState::Generated;
        self.review_state = ReviewState::AwaitingReview;
        Ok(())
    }

    /// Mark the last generation attempt as failed.
    pub fn record_failure(&mut self) {
        self.content_state = ContentState::Error;
    }

    /// Attach reviewer notes to a chapter awaiting review.
    pub fn request_revision(&mut self, feedback: impl Into<String>) -> Result<(), LifecycleError> {
        if self.content.is_none() || self.review_state != ReviewState::AwaitingReview {
            return Err(LifecycleError::invalid(
                self.entity(),
                self.state_label(),
                "request revision for",
            ));
        }
        self.pending_feedback = Some(feedback.into());
        Ok(())
    }

    /// Store the result of a regeneration.
    ///
    /// Consumes the pending feedback, returns the chapter to `awaiting_review` and
    /// bumps the revision counter.
    pub fn record_regeneration(
        &mut self,
        content: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<(), LifecycleError> {
        if self.content.is_none() || self.is_approved() {
            return Err(LifecycleError::invalid(
                self.entity(),
                self.state_label(),
                "store regenerated content for",
            ));
        }
        self.content = Some(content.into());
        self.summary = Some(summary.into());
        self.pending_feedback = None;
        self.content_state = ContentState::Generated;
        self.review_state = ReviewState::AwaitingReview;
        self.revision += 1;
        Ok(())
    }

    /// Approve the chapter. Unconditional and idempotent.
    pub fn approve(&mut self) {
        self.review_state = ReviewState::Approved;
        self.content_state = ContentState::Approved;
    }

    /// Return a stuck chapter to `pending`.
    ///
    /// Only chapters without content left in `generating` or `error` can be reset.
    pub fn reset(&mut self) -> Result<(), LifecycleError> {
        match (self.content.is_some(), self.content_state) {
            (false, ContentState::Generating | ContentState::Error) => {
                self.content_state = ContentState::Pending;
                Ok(())
            }
            _ => Err(LifecycleError::invalid(
                self.entity(),
                self.state_label(),
                "reset",
            )),
        }
    }
}

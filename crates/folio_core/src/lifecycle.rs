//! Next-action derivation for books and chapters.
//!
//! Both functions are pure reads over the record's state; they never mutate it.

use crate::{Book, Chapter, ReviewState};
use serde::{Deserialize, Serialize};

/// What the pipeline may do with a chapter next.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChapterAction {
    /// Already approved; nothing to do
    Skip,
    /// Reviewer notes are waiting to be applied
    Regenerate,
    /// Generated and blocked on a reviewer
    Wait,
    /// No content yet
    Generate,
    /// Ambiguous state that needs an operator
    Pause,
}

/// What the pipeline may do with a book's outline next.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutlineAction {
    /// No outline yet and a brief is available
    Generate,
    /// Outline generated and blocked on a reviewer
    Wait,
    /// Reviewer notes are waiting to be applied
    Regenerate,
    /// Outline approved; chapters may be generated
    Proceed,
    /// Ambiguous state that needs an operator
    Pause,
}

impl Chapter {
    /// Decide the next allowed action.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::{BookId, Chapter, ChapterAction};
    ///
    /// let mut chapter = Chapter::new(BookId::new(), 2, "Sails");
    /// assert_eq!(chapter.action(), ChapterAction::Generate);
    ///
    /// chapter.begin_generation().unwrap();
    /// chapter.record_generation("text", "recap").unwrap();
    /// assert_eq!(chapter.action(), ChapterAction::Wait);
    ///
    /// chapter.request_revision("more wind").unwrap();
    /// assert_eq!(chapter.action(), ChapterAction::Regenerate);
    ///
    /// chapter.approve();
    /// assert_eq!(chapter.action(), ChapterAction::Skip);
    /// ```
    pub fn action(&self) -> ChapterAction {
        let awaiting = *self.review_state() == ReviewState::AwaitingReview;
        if self.is_approved() {
            ChapterAction::Skip
        } else if self.has_content() && self.pending_feedback().is_some() && awaiting {
            ChapterAction::Regenerate
        } else if self.has_content() && awaiting {
            ChapterAction::Wait
        } else if !self.has_content() {
            ChapterAction::Generate
        } else {
            ChapterAction::Pause
        }
    }
}

impl Book {
    /// Decide the next allowed outline action.
    pub fn outline_action(&self) -> OutlineAction {
        match self.outline_review_state() {
            ReviewState::Approved => OutlineAction::Proceed,
            ReviewState::AwaitingReview if self.outline_feedback().is_some() => {
                OutlineAction::Regenerate
            }
            ReviewState::AwaitingReview => OutlineAction::Wait,
            ReviewState::Pending if self.outline().is_none() && self.has_brief() => {
                OutlineAction::Generate
            }
            ReviewState::Pending => OutlineAction::Pause,
        }
    }
}

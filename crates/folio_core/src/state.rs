//! Closed status enums for books and chapters.

use serde::{Deserialize, Serialize};

/// Human review gate state.
///
/// Used for the outline gate, each chapter's review and the final review gate.
///
/// # Examples
///
/// ```
/// use folio_core::ReviewState;
///
/// assert_eq!(ReviewState::AwaitingReview.to_string(), "awaiting_review");
/// assert_eq!("approved".parse::<ReviewState>().unwrap(), ReviewState::Approved);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewState {
    /// Nothing to review yet
    #[default]
    Pending,
    /// Blocked on a human decision
    AwaitingReview,
    /// Signed off
    Approved,
}

/// Generation state of a chapter's body text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentState {
    /// Not generated yet
    #[default]
    Pending,
    /// A generation call is in flight
    Generating,
    /// Content and summary are present
    Generated,
    /// Terminal: signed off by a reviewer
    Approved,
    /// The last generation attempt failed
    Error,
}

/// Output state of a book.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputState {
    /// Brief submitted, nothing produced yet
    #[default]
    Pending,
    /// Outline approved, chapters underway
    InProgress,
    /// Every requested output format was produced
    Completed,
    /// A generation or compilation step failed
    Error,
}

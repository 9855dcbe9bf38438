//! Core records for the folio manuscript pipeline.
//!
//! This crate provides the book and chapter records, their closed status enums,
//! and the lifecycle state machine that decides what may happen to each of them next.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod chapter;
mod format;
mod ids;
mod lifecycle;
mod outline;
mod report;
mod request;
mod state;

pub use book::Book;
pub use chapter::Chapter;
pub use format::OutputFormat;
pub use ids::{BookId, ChapterId};
pub use lifecycle::{ChapterAction, OutlineAction};
pub use outline::{ChapterStub, ContextEntry};
pub use report::{BookProgress, ChapterProgress, Readiness};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use state::{ContentState, OutputState, ReviewState};

//! Generation workflow for the folio manuscript pipeline.
//!
//! This crate drives the text generation service through the book lifecycle:
//!
//! - [`BookService`] takes briefs and owns the final review gate
//! - [`OutlineGenerator`] produces outlines and runs the outline review gate
//! - [`ChapterGenerator`] decomposes the outline into chapters and generates them
//!   in order, each conditioned on the summaries of the chapters before it
//!
//! Milestones are reported through a [`Notifier`](folio_interface::Notifier);
//! [`TracingNotifier`] and [`WebhookNotifier`] are provided.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod books;
mod chapters;
mod locks;
mod notify;
mod outlines;
pub mod prompts;
mod settings;

pub use books::BookService;
pub use chapters::{BatchReport, ChapterGenerator, HaltReason};
pub use locks::BookLocks;
pub use notify::{FanoutNotifier, TracingNotifier, WebhookNotifier};
pub use outlines::{OutlineBatch, OutlineGenerator};
pub use prompts::format_context;
pub use settings::GenerationSettings;

//! Manuscript compilation for folio.
//!
//! A [`Compiler`] loads a book and its chapters, checks readiness, assembles a
//! [`Manuscript`] and hands it to one [`DocumentRenderer`] per requested format:
//!
//! - [`DocxRenderer`] writes an OOXML package with real heading and list styles
//! - [`PdfRenderer`] lays out Letter pages with standard PDF fonts
//! - [`TxtRenderer`] produces fixed-width plain text
//!
//! Every renderer starts from the same parsed content blocks, so the formats agree
//! on structure. Output goes to an [`ArtifactStorage`](folio_interface::ArtifactStorage).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compiler;
mod docx;
mod manuscript;
mod pdf;
mod renderer;
mod txt;

pub use compiler::{CompileReport, Compiler, FormatOutcome};
pub use docx::DocxRenderer;
pub use manuscript::{Manuscript, ManuscriptChapter};
pub use pdf::PdfRenderer;
pub use renderer::{DocumentRenderer, RendererRegistry};
pub use txt::{TxtRenderer, word_wrap};

//! Outline decomposition.
//!
//! Turns a generated outline into an ordered list of [`ChapterStub`]s. Never fails:
//! an outline with nothing recognisable yields an empty list.
//!
//! ```
//! use folio_outline::decompose;
//!
//! let stubs = decompose("## Chapter 1: Intro\n## Chapter 3: Middle\n## Chapter 2: End");
//! let pairs: Vec<_> = stubs.iter().map(|s| (s.chapter_number, s.title.as_str())).collect();
//! assert_eq!(pairs, vec![(1, "Intro"), (2, "End"), (3, "Middle")]);
//! ```
//!
//! [`ChapterStub`]: folio_core::ChapterStub

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decomposer;
mod strategies;

pub use decomposer::{DecomposerConfig, OutlineDecomposer, decompose};

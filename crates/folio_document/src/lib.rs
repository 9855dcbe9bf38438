//! Structural content block model.
//!
//! Generated chapter text is parsed into typed [`ContentBlock`]s that every renderer
//! shares. Inline emphasis is handled by two functions that agree on the underlying
//! text: [`clean`] strips markers entirely, [`bold_spans`] keeps bold boundaries.
//!
//! ```
//! use folio_document::{ContentBlock, parse_blocks};
//!
//! let blocks = parse_blocks("## Setting Out\n\n- rope\n- sail\n\nWe **left** at dawn.");
//! assert_eq!(blocks.len(), 3);
//! assert!(matches!(blocks[1], ContentBlock::BulletList { .. }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod inline;
mod parser;

pub use block::{ContentBlock, HeadingLevel};
pub use inline::{InlineSpan, bold_spans, clean, strip_inline};
pub use parser::parse_blocks;

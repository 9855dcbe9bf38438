//! Content block types.

use crate::{InlineSpan, bold_spans};
use serde::{Deserialize, Serialize};

/// Heading depth, `#` through `####`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum HeadingLevel {
    /// `# `
    H1,
    /// `## `
    H2,
    /// `### `
    H3,
    /// `#### `
    H4,
}

impl HeadingLevel {
    /// Numeric depth, 1 to 4.
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Markdown prefix including the trailing space.
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "# ",
            HeadingLevel::H2 => "## ",
            HeadingLevel::H3 => "### ",
            HeadingLevel::H4 => "#### ",
        }
    }

    /// Whether this level belongs to the major pair (h1/h2) rather than the minor pair (h3/h4).
    pub fn is_major(&self) -> bool {
        matches!(self, HeadingLevel::H1 | HeadingLevel::H2)
    }
}

/// One structural unit of chapter text.
///
/// Text fields keep their inline markers; renderers decide whether to strip them
/// with [`clean`](crate::clean) or split them with [`bold_spans`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Section heading
    Heading {
        /// Depth
        level: HeadingLevel,
        /// Heading text
        text: String,
    },
    /// Unordered list
    BulletList {
        /// Item texts in order
        items: Vec<String>,
    },
    /// Ordered list
    NumberedList {
        /// Item texts in order, numbering markers removed
        items: Vec<String>,
    },
    /// Quoted passage
    Blockquote {
        /// Quote text with `>` markers removed
        text: String,
    },
    /// Fenced code
    CodeBlock {
        /// Language tag from the opening fence
        language: Option<String>,
        /// Code body
        text: String,
    },
    /// Body text
    Paragraph {
        /// Paragraph text
        text: String,
    },
}

impl ContentBlock {
    /// Paragraph text split into bold and plain runs; `None` for other blocks.
    pub fn spans(&self) -> Option<Vec<InlineSpan>> {
        match self {
            ContentBlock::Paragraph { text } => Some(bold_spans(text)),
            _ => None,
        }
    }
}

//! Plain-text renderer.

use crate::{DocumentRenderer, Manuscript};
use folio_core::OutputFormat;
use folio_document::{ContentBlock, clean};
use folio_error::FolioResult;

/// Greedy word wrap.
///
/// Words are packed onto a line until the next one would push it past `width`;
/// words are never split, so a single word longer than `width` gets a line of its
/// own. Always returns at least one (possibly empty) line.
///
/// # Examples
///
/// ```
/// use folio_compiler::word_wrap;
///
/// assert_eq!(word_wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
/// assert_eq!(word_wrap("", 10), vec![""]);
/// ```
pub fn word_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push(word);
            length = word_len;
        } else if length + 1 + word_len <= width {
            current.push(word);
            length += 1 + word_len;
        } else {
            lines.push(current.join(" "));
            current = vec![word];
            length = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Fixed-width plain text with a title banner, a table of contents and wrapped paragraphs.
#[derive(Debug, Clone, Copy)]
pub struct TxtRenderer {
    width: usize,
}

impl Default for TxtRenderer {
    fn default() -> Self {
        Self { width: 72 }
    }
}

impl TxtRenderer {
    /// Renderer with a custom line width.
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn centered(&self, text: &str) -> String {
        format!("{:^width$}", text, width = self.width)
    }

    fn render_block(&self, block: &ContentBlock, lines: &mut Vec<String>) {
        match block {
            ContentBlock::Heading { level, text } => {
                let text = clean(text);
                lines.push(String::new());
                if level.is_major() {
                    lines.push(text.to_uppercase());
                    lines.push("-".repeat(text.chars().count()));
                } else {
                    lines.push(format!("  {}", text));
                }
                lines.push(String::new());
            }
            ContentBlock::BulletList { items } => {
                lines.extend(items.iter().map(|item| format!("    • {}", clean(item))));
                lines.push(String::new());
            }
            ContentBlock::NumberedList { items } => {
                lines.extend(
                    items
                        .iter()
                        .zip(1..)
                        .map(|(item, n)| format!("    {}. {}", n, clean(item))),
                );
                lines.push(String::new());
            }
            ContentBlock::Blockquote { text } => {
                lines.push(format!("    \"{}\"", clean(text)));
                lines.push(String::new());
            }
            ContentBlock::CodeBlock { text, .. } => {
                lines.extend(text.lines().map(|line| format!("    {}", line)));
                lines.push(String::new());
            }
            ContentBlock::Paragraph { text } => {
                let text = clean(text);
                if !text.is_empty() {
                    let inner = self.width.saturating_sub(4);
                    lines.extend(
                        word_wrap(&text, inner)
                            .into_iter()
                            .map(|line| format!("    {}", line)),
                    );
                    lines.push(String::new());
                }
            }
        }
    }
}

impl DocumentRenderer for TxtRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Txt
    }

    fn render(&self, manuscript: &Manuscript) -> FolioResult<Vec<u8>> {
        let rule = "=".repeat(self.width);
        let thin = "-".repeat(self.width);
        let mut lines = vec![
            String::new(),
            rule.clone(),
            String::new(),
            self.centered(&manuscript.title),
            String::new(),
            rule.clone(),
            String::new(),
            self.centered(&manuscript.date_line()),
            String::new(),
            String::new(),
            String::new(),
            thin.clone(),
            self.centered("TABLE OF CONTENTS"),
            thin,
            String::new(),
        ];
        lines.extend(
            manuscript
                .chapters
                .iter()
                .map(|chapter| format!("    {}", chapter.heading())),
        );
        lines.push(String::new());
        lines.push(String::new());

        for chapter in &manuscript.chapters {
            lines.push(rule.clone());
            lines.push(format!("CHAPTER {}", chapter.number));
            lines.push(chapter.title.to_uppercase());
            lines.push(rule.clone());
            lines.push(String::new());
            for block in &chapter.blocks {
                self.render_block(block, &mut lines);
            }
            lines.push(String::new());
            lines.push(String::new());
        }

        Ok(lines.join("\n").into_bytes())
    }
}

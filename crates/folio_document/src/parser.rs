//! Block-level parser.

use crate::{ContentBlock, HeadingLevel};
use regex::Regex;
use std::sync::LazyLock;

static NUMBERED_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("numbered list regex is valid"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*(.+)$").expect("numbered item regex is valid"));

static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_+#-]*$").expect("language tag regex is valid")
});

const FENCE: &str = "```";

/// Parse chapter text into blocks.
///
/// Paragraphs are separated by blank lines, except inside fenced code, which is kept
/// whole until its closing fence. Each paragraph becomes exactly one block, chosen in
/// this order: heading (`####` before `###` before `##` before `#`), bullet list,
/// numbered list, blockquote, fenced code, plain paragraph.
///
/// # Examples
///
/// ```
/// use folio_document::{ContentBlock, HeadingLevel, parse_blocks};
///
/// let blocks = parse_blocks("### Rigging\n\n1. Mast\n2. Boom\nnot an item");
/// assert_eq!(
///     blocks,
///     vec![
///         ContentBlock::Heading { level: HeadingLevel::H3, text: "Rigging".into() },
///         ContentBlock::NumberedList { items: vec!["Mast".into(), "Boom".into()] },
///     ]
/// );
/// ```
pub fn parse_blocks(content: &str) -> Vec<ContentBlock> {
    let normalized = content.replace("\r\n", "\n");
    split_paragraphs(&normalized)
        .iter()
        .filter_map(|paragraph| classify(paragraph))
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if in_fence {
            current.push(line);
            if trimmed.starts_with(FENCE) {
                in_fence = false;
                flush(&mut current, &mut paragraphs);
            }
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut current, &mut paragraphs);
            continue;
        }

        if trimmed.starts_with(FENCE) {
            flush(&mut current, &mut paragraphs);
            current.push(line);
            if is_single_line_fence(trimmed) {
                flush(&mut current, &mut paragraphs);
            } else {
                in_fence = true;
            }
            continue;
        }

        current.push(line);
    }
    flush(&mut current, &mut paragraphs);
    paragraphs
}

fn flush(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
        current.clear();
    }
}

fn is_single_line_fence(trimmed: &str) -> bool {
    trimmed.len() > 2 * FENCE.len() && trimmed[FENCE.len()..].ends_with(FENCE)
}

fn classify(paragraph: &str) -> Option<ContentBlock> {
    let para = paragraph.trim();
    if para.is_empty() {
        return None;
    }

    for level in [
        HeadingLevel::H4,
        HeadingLevel::H3,
        HeadingLevel::H2,
        HeadingLevel::H1,
    ] {
        if let Some(rest) = para.strip_prefix(level.prefix()) {
            let text = rest
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            return Some(ContentBlock::Heading { level, text });
        }
    }

    if para.starts_with("- ") || para.starts_with("* ") {
        let items = para
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")))
            .map(|item| item.trim().to_string())
            .collect();
        return Some(ContentBlock::BulletList { items });
    }

    if NUMBERED_START.is_match(para) {
        let items = para
            .lines()
            .filter_map(|line| NUMBERED_ITEM.captures(line.trim()))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
            .collect();
        return Some(ContentBlock::NumberedList { items });
    }

    if para.starts_with("> ") {
        let text = para
            .lines()
            .map(|line| {
                let line = line.trim_start();
                line.strip_prefix("> ")
                    .or_else(|| line.strip_prefix('>'))
                    .unwrap_or(line)
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Some(ContentBlock::Blockquote { text });
    }

    if para.starts_with(FENCE) {
        return Some(code_block(para));
    }

    Some(ContentBlock::Paragraph {
        text: para.to_string(),
    })
}

fn code_block(para: &str) -> ContentBlock {
    let mut lines = para.lines();
    let opening = lines.next().unwrap_or_default().trim();

    if is_single_line_fence(opening) && para.lines().count() == 1 {
        return ContentBlock::CodeBlock {
            language: None,
            text: opening.trim_matches('`').trim().to_string(),
        };
    }

    let info = opening.trim_start_matches('`').trim();
    let mut body: Vec<&str> = lines.collect();
    if body
        .last()
        .is_some_and(|line| line.trim().starts_with(FENCE))
    {
        body.pop();
    }

    let language = if info.is_empty() {
        None
    } else if LANGUAGE_TAG.is_match(info) {
        Some(info.to_string())
    } else {
        body.insert(0, info);
        None
    };

    ContentBlock::CodeBlock {
        language,
        text: body.join("\n").trim_end().to_string(),
    }
}

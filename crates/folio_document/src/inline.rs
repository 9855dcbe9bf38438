//! Inline emphasis handling.
//!
//! Recognised markers: `**bold**`, `__bold__`, `*italic*`, `_italic_` (only at word
//! boundaries, so `snake_case_names` survive), `` `code` `` and `[label](target)`.
//! Stripping runs to a fixed point, which makes both [`strip_inline`] and [`clean`]
//! idempotent.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold regex is valid"));

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("italic regex is valid"));

static BOLD_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("bold regex is valid"));

static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\p{L}\p{N}_])_([^_\n]+)_($|[^\p{L}\p{N}_])")
        .expect("italic regex is valid")
});

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code regex is valid"));

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link regex is valid"));

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*_]{3,}[ \t]*$").expect("rule regex is valid"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line regex is valid"));

/// A run of text with uniform weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    /// Text with inline markers stripped
    pub text: String,
    /// Whether the run was marked bold
    pub bold: bool,
}

impl InlineSpan {
    /// Plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

fn fixed_point(input: String, step: impl Fn(&str) -> String) -> String {
    let mut current = input;
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Text paired with a per-byte bold flag.
#[derive(Debug, Default)]
struct Marked {
    text: String,
    bold: Vec<bool>,
}

impl Marked {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: vec![false; text.len()],
        }
    }

    fn copy(&mut self, from: &Marked, range: std::ops::Range<usize>, embolden: bool) {
        self.text.push_str(&from.text[range.clone()]);
        self.bold
            .extend(from.bold[range].iter().map(|flag| *flag || embolden));
    }

    /// Replace every match with the listed capture groups, in order.
    fn replace(&self, re: &Regex, groups: &[usize], embolden: bool) -> Marked {
        let mut out = Marked::default();
        let mut last = 0;
        for caps in re.captures_iter(&self.text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.copy(self, last..whole.start(), false);
            for group in groups {
                if let Some(inner) = caps.get(*group) {
                    out.copy(self, inner.range(), embolden);
                }
            }
            last = whole.end();
        }
        out.copy(self, last..self.text.len(), false);
        out
    }
}

fn inline_step(marked: &Marked) -> Marked {
    marked
        .replace(&BOLD_STAR, &[1], true)
        .replace(&ITALIC_STAR, &[1], false)
        .replace(&BOLD_UNDERSCORE, &[1], true)
        .replace(&ITALIC_UNDERSCORE, &[1, 2, 3], false)
        .replace(&CODE, &[1], false)
        .replace(&LINK, &[1], false)
}

fn strip_marked(text: &str) -> Marked {
    let mut current = Marked::new(text);
    loop {
        let next = inline_step(&current);
        if next.text == current.text {
            return next;
        }
        current = next;
    }
}

/// Remove inline emphasis, code and link syntax, keeping the text.
///
/// # Examples
///
/// ```
/// use folio_document::strip_inline;
///
/// assert_eq!(strip_inline("a **b** *c* `d` [e](http://f)"), "a b c d e");
/// assert_eq!(strip_inline("keep snake_case_names"), "keep snake_case_names");
/// ```
pub fn strip_inline(text: &str) -> String {
    strip_marked(text).text
}

fn clean_step(text: &str) -> String {
    let text = strip_inline(text);
    let text = RULE.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Strip inline markup and horizontal rules, collapse blank-line runs and trim.
///
/// Idempotent: `clean(&clean(x)) == clean(x)`.
///
/// # Examples
///
/// ```
/// use folio_document::clean;
///
/// let text = "**Bold** start\n\n---\n\n\n\nend";
/// assert_eq!(clean(text), "Bold start\n\nend");
/// assert_eq!(clean(&clean(text)), clean(text));
/// ```
pub fn clean(text: &str) -> String {
    fixed_point(text.replace("\r\n", "\n"), clean_step)
}

/// Split text into bold and plain runs.
///
/// Markers are stripped exactly as [`strip_inline`] strips them, with each
/// character remembering whether a bold marker enclosed it, so joining the runs
/// always gives `strip_inline(text)`. Empty input yields no runs.
///
/// # Examples
///
/// ```
/// use folio_document::{InlineSpan, bold_spans};
///
/// assert_eq!(
///     bold_spans("a **b** c"),
///     vec![InlineSpan::plain("a "), InlineSpan::bold("b"), InlineSpan::plain(" c")]
/// );
/// assert_eq!(bold_spans("***key point***"), vec![InlineSpan::bold("key point")]);
/// ```
pub fn bold_spans(text: &str) -> Vec<InlineSpan> {
    let marked = strip_marked(text);
    let mut spans: Vec<InlineSpan> = Vec::new();
    for (index, ch) in marked.text.char_indices() {
        let bold = marked.bold[index];
        match spans.last_mut() {
            Some(prev) if prev.bold == bold => prev.text.push(ch),
            _ => spans.push(InlineSpan {
                text: ch.to_string(),
                bold,
            }),
        }
    }
    spans
}

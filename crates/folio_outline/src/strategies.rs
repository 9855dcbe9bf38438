//! Ordered parsing strategies.
//!
//! Each strategy is a pure function from outline text to an optional list of stubs.
//! `None` means "nothing recognised"; the decomposer moves on to the next one.

use folio_core::ChapterStub;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A pure parsing strategy.
pub(crate) type Strategy = fn(&str) -> Option<Vec<ChapterStub>>;

// "## Chapter 1: Title" (also matches deeper headings, which contain "##").
static CHAPTER_H2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)##[ \t]*Chapter[ \t]*(\d+)\b[:\t -]*(.+)$")
        .expect("chapter heading regex is valid")
});

static CHAPTER_H3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)###[ \t]*Chapter[ \t]*(\d+)\b[:\t -]*(.+)$")
        .expect("chapter heading regex is valid")
});

// "## 1. Title"
static NUMBERED_H2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)##[ \t]*(\d+)\.[ \t]*(.+)$")
        .expect("numbered heading regex is valid")
});

// "**Chapter 1: Title**" anywhere in a line.
static BOLD_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\*\*Chapter[ \t]*(\d+)\b[:\t -]*([^\n]+?)\*\*")
        .expect("bold chapter regex is valid")
});

static ANY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#{2,}[ \t]*(.+)$")
        .expect("heading regex is valid")
});

/// Strategies in priority order, most specific first.
pub(crate) const NUMBERED_STRATEGIES: [Strategy; 4] =
    [chapter_h2, chapter_h3, numbered_h2, bold_chapter];

fn chapter_h2(text: &str) -> Option<Vec<ChapterStub>> {
    numbered(&CHAPTER_H2, text)
}

fn chapter_h3(text: &str) -> Option<Vec<ChapterStub>> {
    numbered(&CHAPTER_H3, text)
}

fn numbered_h2(text: &str) -> Option<Vec<ChapterStub>> {
    numbered(&NUMBERED_H2, text)
}

fn bold_chapter(text: &str) -> Option<Vec<ChapterStub>> {
    numbered(&BOLD_CHAPTER, text)
}

fn tidy_title(raw: &str) -> String {
    raw.trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Sentence punctuation dropped from the end of fallback headings. Closing
/// brackets and quotes belong to the title and are kept.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '*', '-', '_', '~'];

fn tidy_heading(raw: &str) -> String {
    tidy_title(raw)
        .trim_end_matches(TRAILING_PUNCTUATION)
        .trim_end()
        .to_string()
}

/// Collect `(number, title)` captures, first occurrence of a number wins, sorted.
fn numbered(pattern: &Regex, text: &str) -> Option<Vec<ChapterStub>> {
    let mut seen = HashSet::new();
    let mut stubs: Vec<ChapterStub> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let number: u32 = caps.get(1)?.as_str().parse().ok()?;
            let title = tidy_title(caps.get(2)?.as_str());
            (number >= 1 && !title.is_empty()).then(|| ChapterStub::new(number, title))
        })
        .filter(|stub| seen.insert(stub.chapter_number))
        .collect();

    if stubs.is_empty() {
        return None;
    }
    stubs.sort_by_key(|stub| stub.chapter_number);
    Some(stubs)
}

/// Every heading of depth two or more, numbered sequentially from 1.
///
/// Trailing punctuation is stripped, then headings of three characters or fewer
/// are dropped before numbering; `cap` bounds the number of chapters returned.
pub(crate) fn generic_headings(text: &str, cap: Option<usize>) -> Vec<ChapterStub> {
    let titles = ANY_HEADING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| tidy_heading(m.as_str())))
        .filter(|title| title.chars().count() > 3);

    let limit = cap.unwrap_or(usize::MAX);
    titles
        .take(limit)
        .zip(1u32..)
        .map(|(title, number)| ChapterStub::new(number, title))
        .collect()
}

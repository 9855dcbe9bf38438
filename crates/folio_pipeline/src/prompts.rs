//! Prompt assembly for outline, chapter and summary requests.

use crate::GenerationSettings;
use folio_core::{ContextEntry, GenerateRequest};
use folio_error::{FolioResult, GenerationError, GenerationErrorKind};

fn request(prompt: String, max_tokens: u32) -> FolioResult<GenerateRequest> {
    Ok(GenerateRequest::builder()
        .prompt(prompt)
        .max_tokens(max_tokens)
        .build()
        .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))?)
}

/// Render earlier chapters' recaps as the context block of a chapter prompt.
///
/// Returns an empty string when there is nothing to chain.
///
/// # Examples
///
/// ```
/// use folio_core::ContextEntry;
/// use folio_pipeline::format_context;
///
/// assert_eq!(format_context(&[]), "");
///
/// let context = format_context(&[ContextEntry {
///     chapter_number: 1,
///     title: "Knots".into(),
///     summary: "We tie things.".into(),
/// }]);
/// assert_eq!(context, "SUMMARY OF PREVIOUS CHAPTERS:\n\nChapter 1: Knots\nWe tie things.\n");
/// ```
pub fn format_context(entries: &[ContextEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut context = String::from("SUMMARY OF PREVIOUS CHAPTERS:\n");
    for entry in entries {
        context.push_str(&format!(
            "\nChapter {}: {}\n{}\n",
            entry.chapter_number, entry.title, entry.summary
        ));
    }
    context
}

/// Outline request built from the book's brief.
pub fn outline_request(
    settings: &GenerationSettings,
    title: &str,
    brief: &str,
) -> FolioResult<GenerateRequest> {
    let prompt = format!(
        "You are an expert book author and editor. Your task is to create a detailed book outline.

BOOK TITLE: {title}

EDITOR'S NOTES & REQUIREMENTS:
{brief}

Please generate a comprehensive book outline with the following structure:
1. An engaging introduction section
2. Main chapters (aim for 8-12 chapters depending on scope)
3. A conclusion/summary section

For each chapter, provide:
- Chapter number and title
- Brief description (2-3 sentences) of what the chapter will cover
- Key topics/subtopics as bullet points

Format the outline in clear markdown with proper headings.

IMPORTANT: Consider the editor's notes carefully when designing the structure and focus of each chapter.

Generate the outline now:"
    );
    request(prompt, *settings.outline_max_tokens())
}

/// Outline revision request applying reviewer feedback.
pub fn outline_revision_request(
    settings: &GenerationSettings,
    title: &str,
    outline: &str,
    feedback: &str,
) -> FolioResult<GenerateRequest> {
    let prompt = format!(
        "You are an expert book author and editor. You need to revise a book outline based on feedback.

BOOK TITLE: {title}

ORIGINAL OUTLINE:
{outline}

EDITOR'S FEEDBACK FOR IMPROVEMENT:
{feedback}

Please revise the outline to address all the feedback. Maintain the same general format but incorporate the requested changes.

Generate the improved outline now:"
    );
    request(prompt, *settings.outline_max_tokens())
}

/// Inputs to a first-generation chapter prompt.
#[derive(Debug, Clone, Copy)]
pub struct ChapterPrompt<'a> {
    /// Book title
    pub book_title: &'a str,
    /// Full approved outline
    pub outline: &'a str,
    /// Target chapter number
    pub chapter_number: u32,
    /// Target chapter title
    pub chapter_title: &'a str,
    /// Recaps of earlier chapters, ascending
    pub context: &'a [ContextEntry],
    /// Reviewer notes for this chapter
    pub notes: Option<&'a str>,
}

/// Chapter request conditioned on earlier chapters' summaries.
pub fn chapter_request(
    settings: &GenerationSettings,
    input: ChapterPrompt<'_>,
) -> FolioResult<GenerateRequest> {
    let ChapterPrompt {
        book_title,
        outline,
        chapter_number,
        chapter_title,
        context,
        notes,
    } = input;
    let context = format_context(context);
    let notes_section = notes
        .map(|notes| format!("\nEDITOR'S NOTES FOR THIS CHAPTER:\n{notes}\n"))
        .unwrap_or_default();
    let prompt = format!(
        "You are an expert book author writing a chapter for a book.

BOOK TITLE: {book_title}

BOOK OUTLINE:
{outline}

{context}

CHAPTER TO WRITE: Chapter {chapter_number}: {chapter_title}
{notes_section}

Write this chapter in a professional, engaging style that:
1. Flows naturally from previous chapters (if any)
2. Covers the topics mentioned in the outline for this chapter
3. Uses clear explanations and examples where appropriate
4. Maintains consistent tone with the book's overall style
5. Is approximately 2000-3000 words

Write the complete chapter now:"
    );
    request(prompt, *settings.chapter_max_tokens())
}

/// Chapter revision request carrying the original text and reviewer feedback.
pub fn chapter_revision_request(
    settings: &GenerationSettings,
    book_title: &str,
    chapter_number: u32,
    chapter_title: &str,
    original: &str,
    feedback: &str,
) -> FolioResult<GenerateRequest> {
    let prompt = format!(
        "You are revising a chapter based on editor feedback.

BOOK: {book_title}
CHAPTER {chapter_number}: {chapter_title}

ORIGINAL CHAPTER:
{original}

EDITOR'S FEEDBACK:
{feedback}

Revise the chapter to address all feedback while maintaining the overall flow and style.

Generate the revised chapter:"
    );
    request(prompt, *settings.chapter_max_tokens())
}

/// Summary request over the first `summary_input_chars` characters of a chapter.
pub fn summary_request(
    settings: &GenerationSettings,
    book_title: &str,
    chapter_number: u32,
    chapter_title: &str,
    content: &str,
) -> FolioResult<GenerateRequest> {
    let excerpt: String = content.chars().take(*settings.summary_input_chars()).collect();
    let prompt = format!(
        "Summarize the following chapter in 3-5 sentences. Focus on the main points, key concepts, and any important conclusions.

BOOK: {book_title}
CHAPTER {chapter_number}: {chapter_title}

CHAPTER CONTENT:
{excerpt}

Provide a concise summary:"
    );
    request(prompt, *settings.summary_max_tokens())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prompt_truncates_content() {
        let settings = GenerationSettings::new(4096, 8192, 500, 10);
        let req = summary_request(&settings, "Book", 2, "Sails", "0123456789ABCDEF").unwrap();
        assert!(req.prompt.contains("0123456789\n"));
        assert!(!req.prompt.contains("0123456789A"));
        assert_eq!(req.max_tokens, Some(500));
    }

    #[test]
    fn chapter_prompt_includes_context_and_notes() {
        let context = vec![ContextEntry {
            chapter_number: 1,
            title: "Knots".into(),
            summary: "Tying.".into(),
        }];
        let req = chapter_request(
            &GenerationSettings::default(),
            ChapterPrompt {
                book_title: "Rust at Sea",
                outline: "## Chapter 1: Knots\n## Chapter 2: Sails",
                chapter_number: 2,
                chapter_title: "Sails",
                context: &context,
                notes: Some("More wind"),
            },
        )
        .unwrap();
        assert!(req.prompt.contains("SUMMARY OF PREVIOUS CHAPTERS:\n\nChapter 1: Knots\nTying.\n"));
        assert!(req.prompt.contains("CHAPTER TO WRITE: Chapter 2: Sails"));
        assert!(req.prompt.contains("EDITOR'S NOTES FOR THIS CHAPTER:\nMore wind"));
        assert_eq!(req.max_tokens, Some(8192));
    }
}

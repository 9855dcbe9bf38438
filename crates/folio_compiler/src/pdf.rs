//! PDF renderer.
//!
//! A small flow-layout engine on top of `lopdf`'s object model. Text is set in the
//! standard Type1 fonts with WinAnsi encoding, so no font files are embedded; line
//! breaking uses approximate AFM advance widths. Pages are US Letter with one-inch
//! margins and every page after the title page carries a centred page number.

use crate::{DocumentRenderer, Manuscript};
use folio_core::OutputFormat;
use folio_document::{ContentBlock, bold_spans, clean};
use folio_error::{FolioError, FolioResult, RenderError, RenderErrorKind};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

type Rgb = (f32, f32, f32);

const INK: Rgb = (0.0, 0.0, 0.0);
const TITLE: Rgb = (0.173, 0.243, 0.314);
const SUBHEAD: Rgb = (0.204, 0.286, 0.369);
const MINOR: Rgb = (0.365, 0.427, 0.494);
const MUTED: Rgb = (0.498, 0.549, 0.553);

/// Helvetica advance widths for ASCII 32..=126, in thousandths of an em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722, 667,
    611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500,
    222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32..=126.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Typeface used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl Face {
    const ALL: [Face; 4] = [Face::Regular, Face::Bold, Face::Italic, Face::Mono];

    fn resource(&self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
            Face::Italic => "F3",
            Face::Mono => "F4",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
            Face::Italic => "Times-Italic",
            Face::Mono => "Courier",
        }
    }

    fn advance(&self, ch: char) -> f32 {
        let ascii = (ch as u32)
            .checked_sub(32)
            .filter(|offset| *offset < 95)
            .map(|offset| offset as usize);
        match (self, ascii) {
            (Face::Mono, _) => 600.0,
            (Face::Bold, Some(index)) => f32::from(HELVETICA_BOLD[index]),
            (Face::Regular, Some(index)) => f32::from(HELVETICA[index]),
            // Times is narrower than Helvetica
            (Face::Italic, Some(index)) => f32::from(HELVETICA[index]) * 0.9,
            (_, None) if ch == '•' => 350.0,
            (_, None) => 556.0,
        }
    }

    fn width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch)).sum::<f32>() * size / 1000.0
    }
}

/// Encode text for a WinAnsiEncoding font. Unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Justify,
}

/// Paragraph formatting, all lengths in points.
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: Face,
    size: f32,
    leading: f32,
    color: Rgb,
    align: Align,
    first_indent: f32,
    left_indent: f32,
    right_indent: f32,
    space_before: f32,
    space_after: f32,
}

impl TextStyle {
    fn body() -> Self {
        Self {
            face: Face::Regular,
            size: 11.0,
            leading: 16.0,
            color: INK,
            align: Align::Justify,
            first_indent: 24.0,
            left_indent: 0.0,
            right_indent: 0.0,
            space_before: 0.0,
            space_after: 12.0,
        }
    }

    fn chapter_title() -> Self {
        Self {
            face: Face::Bold,
            size: 20.0,
            leading: 24.0,
            color: TITLE,
            align: Align::Left,
            first_indent: 0.0,
            space_before: 30.0,
            space_after: 20.0,
            ..Self::body()
        }
    }

    fn heading(major: bool) -> Self {
        let (size, color) = if major { (14.0, SUBHEAD) } else { (12.0, MINOR) };
        Self {
            face: Face::Bold,
            size,
            leading: size + 4.0,
            color,
            align: Align::Left,
            first_indent: 0.0,
            space_before: 12.0,
            space_after: 6.0,
            ..Self::body()
        }
    }

    fn list_item() -> Self {
        Self {
            align: Align::Left,
            first_indent: 0.0,
            left_indent: 18.0,
            space_after: 4.0,
            ..Self::body()
        }
    }

    fn quote() -> Self {
        Self {
            face: Face::Italic,
            size: 10.0,
            leading: 14.0,
            color: MINOR,
            first_indent: 0.0,
            left_indent: 36.0,
            right_indent: 36.0,
            ..Self::body()
        }
    }

    fn code() -> Self {
        Self {
            face: Face::Mono,
            size: 9.0,
            leading: 12.0,
            align: Align::Left,
            first_indent: 0.0,
            left_indent: 18.0,
            ..Self::body()
        }
    }

    fn centered(face: Face, size: f32, color: Rgb) -> Self {
        Self {
            face,
            size,
            leading: size * 1.25,
            color,
            align: Align::Center,
            first_indent: 0.0,
            space_after: 0.0,
            ..Self::body()
        }
    }
}

/// A breakable unit: adjacent pieces with no whitespace between them.
#[derive(Debug, Clone, Default, PartialEq)]
struct Word {
    pieces: Vec<(String, Face)>,
}

impl Word {
    fn width(&self, size: f32) -> f32 {
        self.pieces
            .iter()
            .map(|(text, face)| face.width(text, size))
            .sum()
    }
}

/// Split styled runs into words, keeping runs that touch without whitespace together.
fn words(runs: &[(String, Face)]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;
    for (text, face) in runs {
        let mut piece = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !piece.is_empty() {
                    current
                        .get_or_insert_with(Word::default)
                        .pieces
                        .push((std::mem::take(&mut piece), *face));
                }
                if let Some(word) = current.take() {
                    words.push(word);
                }
            } else {
                piece.push(ch);
            }
        }
        if !piece.is_empty() {
            current
                .get_or_insert_with(Word::default)
                .pieces
                .push((piece, *face));
        }
    }
    words.extend(current);
    words
}

/// Greedy line breaking. The first line may be narrower because of a first-line indent.
fn break_lines(words: Vec<Word>, first_width: f32, width: f32, style: &TextStyle) -> Vec<Vec<Word>> {
    let space = style.face.width(" ", style.size);
    let mut lines = Vec::new();
    let mut line: Vec<Word> = Vec::new();
    let mut used = 0.0;
    for word in words {
        let available = if lines.is_empty() { first_width } else { width };
        let word_width = word.width(style.size);
        if !line.is_empty() && used + space + word_width > available {
            lines.push(std::mem::take(&mut line));
            used = 0.0;
        }
        used += if line.is_empty() { word_width } else { space + word_width };
        line.push(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Flow layout state: finished pages plus the page being filled.
#[derive(Debug, Default)]
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            y: PAGE_HEIGHT - MARGIN,
            ..Self::default()
        }
    }

    fn at_top(&self) -> bool {
        self.current.is_empty()
    }

    /// Start a new page unless the current one is still blank.
    fn page_break(&mut self) {
        if !self.at_top() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn space(&mut self, points: f32) {
        self.y -= points;
        if self.y < MARGIN {
            self.page_break();
        }
    }

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str, face: Face, size: f32, color: Rgb) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face.resource().into(), Object::Real(size)]),
            Operation::new(
                "rg",
                vec![
                    Object::Real(color.0),
                    Object::Real(color.1),
                    Object::Real(color.2),
                ],
            ),
            Operation::new(
                "Td",
                vec![Object::Real(x), Object::Real(baseline)],
            ),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn paragraph(&mut self, runs: &[(String, Face)], style: TextStyle) {
        let words = words(runs);
        if words.is_empty() {
            return;
        }
        if !self.at_top() {
            self.space(style.space_before);
        }

        let width = CONTENT_WIDTH - style.left_indent - style.right_indent;
        let first_width = width - style.first_indent;
        let lines = break_lines(words, first_width, width, &style);
        let space = style.face.width(" ", style.size);
        let last = lines.len() - 1;

        for (index, line) in lines.into_iter().enumerate() {
            if self.y - style.leading < MARGIN {
                self.page_break();
            }
            let baseline = self.y - style.size;
            let indent = if index == 0 { style.first_indent } else { 0.0 };
            let available = width - indent;
            let natural: f32 = line.iter().map(|w| w.width(style.size)).sum::<f32>()
                + space * (line.len() - 1) as f32;

            let mut x = MARGIN + style.left_indent + indent;
            let mut gap = space;
            match style.align {
                Align::Center => x += ((available - natural) / 2.0).max(0.0),
                Align::Justify if index != last && line.len() > 1 => {
                    gap += (available - natural).max(0.0) / (line.len() - 1) as f32;
                }
                _ => {}
            }

            for word in &line {
                for (text, face) in &word.pieces {
                    self.draw_text(x, baseline, text, *face, style.size, style.color);
                    x += face.width(text, style.size);
                }
                x += gap;
            }
            self.y -= style.leading;
        }
        self.space(style.space_after);
    }

    fn plain(&mut self, text: &str, style: TextStyle) {
        self.paragraph(&[(text.to_string(), style.face)], style);
    }

    /// Monospaced lines drawn verbatim, hard-wrapped at the right margin.
    fn code(&mut self, text: &str, style: TextStyle) {
        let per_line = ((CONTENT_WIDTH - style.left_indent) / style.face.width("m", style.size))
            .floor()
            .max(1.0) as usize;
        if !self.at_top() {
            self.space(style.space_before);
        }
        for line in text.lines() {
            let chars: Vec<char> = line.chars().collect();
            let chunks: Vec<String> = if chars.is_empty() {
                vec![String::new()]
            } else {
                chars.chunks(per_line).map(|c| c.iter().collect()).collect()
            };
            for chunk in chunks {
                if self.y - style.leading < MARGIN {
                    self.page_break();
                }
                let baseline = self.y - style.size;
                if !chunk.is_empty() {
                    self.draw_text(
                        MARGIN + style.left_indent,
                        baseline,
                        &chunk,
                        style.face,
                        style.size,
                        style.color,
                    );
                }
                self.y -= style.leading;
            }
        }
        self.space(style.space_after);
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { level, text } => {
                self.plain(&clean(text), TextStyle::heading(level.is_major()))
            }
            ContentBlock::BulletList { items } => {
                for item in items {
                    self.plain(&format!("• {}", clean(item)), TextStyle::list_item());
                }
            }
            ContentBlock::NumberedList { items } => {
                for (item, n) in items.iter().zip(1..) {
                    self.plain(&format!("{}. {}", n, clean(item)), TextStyle::list_item());
                }
            }
            ContentBlock::Blockquote { text } => self.plain(&clean(text), TextStyle::quote()),
            ContentBlock::CodeBlock { text, .. } => self.code(text, TextStyle::code()),
            ContentBlock::Paragraph { text } => {
                let runs: Vec<(String, Face)> = bold_spans(text)
                    .into_iter()
                    .map(|span| {
                        let face = if span.bold { Face::Bold } else { Face::Regular };
                        (span.text, face)
                    })
                    .collect();
                self.paragraph(&runs, TextStyle::body());
            }
        }
    }

    /// Close the last page and stamp page numbers on everything after the title page.
    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.at_top() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        let mut pages = std::mem::take(&mut self.pages);
        for (index, operations) in pages.iter_mut().enumerate().skip(1) {
            let label = (index + 1).to_string();
            let x = (PAGE_WIDTH - Face::Regular.width(&label, 9.0)) / 2.0;
            self.current = std::mem::take(operations);
            self.draw_text(x, MARGIN / 2.0, &label, Face::Regular, 9.0, MUTED);
            *operations = std::mem::take(&mut self.current);
        }
        pages
    }
}

fn encode_error(message: impl std::fmt::Display) -> FolioError {
    RenderError::new(RenderErrorKind::Encode {
        format: OutputFormat::Pdf.to_string(),
        message: message.to_string(),
    })
    .into()
}

/// Letter-size PDF with a title page, a table of contents and one chapter per page run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    fn layout(&self, manuscript: &Manuscript) -> Vec<Vec<Operation>> {
        let mut layout = Layout::new();

        layout.space(3.0 * 72.0);
        layout.plain(&manuscript.title, TextStyle::centered(Face::Bold, 32.0, TITLE));
        layout.space(36.0);
        layout.plain(
            &manuscript.date_line(),
            TextStyle::centered(Face::Regular, 12.0, MUTED),
        );
        layout.page_break();

        layout.plain("Table of Contents", TextStyle::chapter_title());
        layout.space(0.3 * 72.0);
        let entry = TextStyle {
            size: 12.0,
            leading: 16.0,
            align: Align::Left,
            first_indent: 0.0,
            space_after: 8.0,
            ..TextStyle::body()
        };
        for chapter in &manuscript.chapters {
            layout.plain(&chapter.heading(), entry);
        }
        layout.page_break();

        for chapter in &manuscript.chapters {
            layout.plain(&chapter.heading(), TextStyle::chapter_title());
            for block in &chapter.blocks {
                layout.block(block);
            }
            layout.page_break();
        }
        layout.finish()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    #[tracing::instrument(skip_all, fields(title = %manuscript.title, chapters = manuscript.chapters.len()))]
    fn render(&self, manuscript: &Manuscript) -> FolioResult<Vec<u8>> {
        let pages = self.layout(manuscript);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in Face::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations }.encode().map_err(encode_error)?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }
        let page_count = kids.len() as i64;

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(&manuscript.title)),
            "Producer" => Object::string_literal("folio"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(encode_error)?;
        tracing::debug!(bytes = bytes.len(), pages = page_count, "Wrote pdf");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> (String, Face) {
        (text.to_string(), Face::Regular)
    }

    #[test]
    fn words_keep_touching_runs_together() {
        let runs = vec![
            plain("We "),
            ("left".to_string(), Face::Bold),
            plain(", at dawn"),
        ];
        let words = words(&runs);
        assert_eq!(words.len(), 4);
        assert_eq!(
            words[1].pieces,
            vec![("left".to_string(), Face::Bold), (",".to_string(), Face::Regular)]
        );
    }

    #[test]
    fn lines_fit_the_measure() {
        let style = TextStyle::body();
        let text = "word ".repeat(200);
        let lines = break_lines(words(&[plain(&text)]), 200.0, 240.0, &style);
        let space = style.face.width(" ", style.size);
        for (index, line) in lines.iter().enumerate() {
            let limit = if index == 0 { 200.0 } else { 240.0 };
            let natural: f32 = line.iter().map(|w| w.width(style.size)).sum::<f32>()
                + space * (line.len() - 1) as f32;
            assert!(natural <= limit, "line {index} is {natural} wide");
        }
        assert_eq!(lines.iter().map(Vec::len).sum::<usize>(), 200);
    }

    #[test]
    fn win_ansi_maps_typographic_marks() {
        assert_eq!(win_ansi("a•b—c"), vec![b'a', 0x95, b'b', 0x97, b'c']);
        assert_eq!(win_ansi("é"), vec![0xe9]);
        assert_eq!(win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn pages_after_title_are_numbered() {
        let mut layout = Layout::new();
        layout.plain("Title", TextStyle::body());
        layout.page_break();
        layout.plain("Body", TextStyle::body());
        let pages = layout.finish();
        assert_eq!(pages.len(), 2);
        let tj = |ops: &Vec<Operation>| ops.iter().filter(|op| op.operator == "Tj").count();
        assert_eq!(tj(&pages[0]), 1);
        assert_eq!(tj(&pages[1]), 2);
    }
}

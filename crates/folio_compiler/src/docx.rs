//! Word (OOXML) renderer.
//!
//! Writes a minimal WordprocessingML package by hand: document, styles, numbering and
//! core properties zipped together. Headings map to the built-in `Heading1`..`Heading3`
//! styles so the document outline shows up in Word's navigation pane.

use crate::{DocumentRenderer, Manuscript};
use folio_core::OutputFormat;
use folio_document::{ContentBlock, HeadingLevel, bold_spans, clean};
use folio_error::{FolioError, FolioResult, RenderError, RenderErrorKind};
use html_escape::encode_text;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const TITLE_COLOR: &str = "2C3E50";
const MUTED_COLOR: &str = "7F8C8D";
const BULLET_NUM_ID: u32 = 1;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults>
<w:rPrDefault><w:rPr><w:rFonts w:ascii="Georgia" w:hAnsi="Georgia" w:cs="Georgia"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault>
<w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault>
</w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
<w:pPr><w:keepNext/><w:spacing w:before="480" w:after="240"/><w:outlineLvl w:val="0"/></w:pPr>
<w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/><w:b/><w:color w:val="2C3E50"/><w:sz w:val="48"/><w:szCs w:val="48"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
<w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="1"/></w:pPr>
<w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/><w:b/><w:color w:val="34495E"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>
<w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="2"/></w:pPr>
<w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/><w:b/><w:color w:val="5D6D7E"/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="ListBullet"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/>
<w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr></w:style>
<w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/><w:basedOn w:val="Normal"/></w:style>
</w:styles>"#;

/// Run formatting.
#[derive(Debug, Clone, Copy, Default)]
struct RunStyle {
    bold: bool,
    italic: bool,
    size_pt: Option<u32>,
    color: Option<&'static str>,
    font: Option<&'static str>,
}

impl RunStyle {
    fn xml(&self) -> String {
        let mut props = String::new();
        if let Some(font) = self.font {
            props.push_str(&format!(
                r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
                font
            ));
        }
        if self.bold {
            props.push_str("<w:b/>");
        }
        if self.italic {
            props.push_str("<w:i/>");
        }
        if let Some(color) = self.color {
            props.push_str(&format!(r#"<w:color w:val="{}"/>"#, color));
        }
        if let Some(size) = self.size_pt {
            props.push_str(&format!(
                r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
                size * 2
            ));
        }
        if props.is_empty() {
            props
        } else {
            format!("<w:rPr>{}</w:rPr>", props)
        }
    }
}

/// Paragraph formatting. Lengths are in twentieths of a point.
#[derive(Debug, Clone, Copy, Default)]
struct ParagraphStyle {
    style: Option<&'static str>,
    centered: bool,
    justified: bool,
    after: Option<u32>,
    line: Option<u32>,
    indent_left: Option<u32>,
    indent_right: Option<u32>,
    num_id: Option<u32>,
}

impl ParagraphStyle {
    fn styled(style: &'static str) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    fn xml(&self) -> String {
        let mut props = String::new();
        if let Some(style) = self.style {
            props.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, style));
        }
        if let Some(num_id) = self.num_id {
            props.push_str(&format!(
                r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr>"#,
                num_id
            ));
        }
        if self.after.is_some() || self.line.is_some() {
            props.push_str("<w:spacing");
            if let Some(after) = self.after {
                props.push_str(&format!(r#" w:after="{}""#, after));
            }
            if let Some(line) = self.line {
                props.push_str(&format!(r#" w:line="{}" w:lineRule="auto""#, line));
            }
            props.push_str("/>");
        }
        if self.indent_left.is_some() || self.indent_right.is_some() {
            props.push_str(&format!(
                r#"<w:ind w:left="{}" w:right="{}"/>"#,
                self.indent_left.unwrap_or(0),
                self.indent_right.unwrap_or(0)
            ));
        }
        if self.centered {
            props.push_str(r#"<w:jc w:val="center"/>"#);
        } else if self.justified {
            props.push_str(r#"<w:jc w:val="both"/>"#);
        }
        if props.is_empty() {
            props
        } else {
            format!("<w:pPr>{}</w:pPr>", props)
        }
    }
}

fn run(text: &str, style: RunStyle) -> String {
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        style.xml(),
        encode_text(text)
    )
}

/// Accumulates `<w:body>` content and the numbered lists that need their own `w:num`.
#[derive(Debug, Default)]
struct Body {
    xml: String,
    numbered_lists: u32,
}

impl Body {
    fn paragraph(&mut self, style: ParagraphStyle, runs: &[String]) {
        self.xml.push_str("<w:p>");
        self.xml.push_str(&style.xml());
        for run in runs {
            self.xml.push_str(run);
        }
        self.xml.push_str("</w:p>");
    }

    fn text(&mut self, style: ParagraphStyle, text: &str, run_style: RunStyle) {
        self.paragraph(style, &[run(text, run_style)]);
    }

    fn empty(&mut self) {
        self.xml.push_str("<w:p/>");
    }

    fn page_break(&mut self) {
        self.xml
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
    }

    /// Allocate a numbering instance that restarts at 1.
    fn next_numbered_list(&mut self) -> u32 {
        self.numbered_lists += 1;
        BULLET_NUM_ID + self.numbered_lists
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { level, text } => {
                let text = clean(text);
                match level {
                    HeadingLevel::H1 => {
                        self.text(ParagraphStyle::styled("Heading1"), &text, RunStyle::default())
                    }
                    HeadingLevel::H2 => {
                        self.text(ParagraphStyle::styled("Heading2"), &text, RunStyle::default())
                    }
                    HeadingLevel::H3 => {
                        self.text(ParagraphStyle::styled("Heading3"), &text, RunStyle::default())
                    }
                    HeadingLevel::H4 => self.text(
                        ParagraphStyle::default(),
                        &text,
                        RunStyle {
                            bold: true,
                            size_pt: Some(12),
                            ..RunStyle::default()
                        },
                    ),
                }
            }
            ContentBlock::BulletList { items } => {
                let style = ParagraphStyle {
                    after: Some(80),
                    ..ParagraphStyle::styled("ListBullet")
                };
                for item in items {
                    self.text(style, &clean(item), RunStyle::default());
                }
            }
            ContentBlock::NumberedList { items } => {
                let style = ParagraphStyle {
                    after: Some(80),
                    num_id: Some(self.next_numbered_list()),
                    ..ParagraphStyle::styled("ListNumber")
                };
                for item in items {
                    self.text(style, &clean(item), RunStyle::default());
                }
            }
            ContentBlock::Blockquote { text } => self.text(
                ParagraphStyle {
                    indent_left: Some(720),
                    indent_right: Some(720),
                    after: Some(200),
                    ..ParagraphStyle::default()
                },
                &clean(text),
                RunStyle {
                    italic: true,
                    color: Some(MUTED_COLOR),
                    ..RunStyle::default()
                },
            ),
            ContentBlock::CodeBlock { text, .. } => {
                let style = RunStyle {
                    font: Some("Consolas"),
                    size_pt: Some(9),
                    ..RunStyle::default()
                };
                let mut runs = Vec::new();
                for (index, line) in text.lines().enumerate() {
                    if index > 0 {
                        runs.push("<w:r><w:br/></w:r>".to_string());
                    }
                    runs.push(run(line, style));
                }
                self.paragraph(
                    ParagraphStyle {
                        indent_left: Some(360),
                        after: Some(200),
                        ..ParagraphStyle::default()
                    },
                    &runs,
                );
            }
            ContentBlock::Paragraph { text } => {
                let runs: Vec<String> = bold_spans(text)
                    .iter()
                    .map(|span| {
                        run(
                            &span.text,
                            RunStyle {
                                bold: span.bold,
                                ..RunStyle::default()
                            },
                        )
                    })
                    .collect();
                if !runs.is_empty() {
                    self.paragraph(
                        ParagraphStyle {
                            justified: true,
                            after: Some(200),
                            line: Some(360),
                            ..ParagraphStyle::default()
                        },
                        &runs,
                    );
                }
            }
        }
    }
}

fn numbering(numbered_lists: u32) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="{}">
<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
<w:abstractNum w:abstractNumId="1"><w:multiLevelType w:val="singleLevel"/><w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>
<w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num>
"#,
        WORD_NS, BULLET_NUM_ID
    );
    for offset in 1..=numbered_lists {
        xml.push_str(&format!(
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="1"/><w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride></w:num>"#,
            BULLET_NUM_ID + offset
        ));
    }
    xml.push_str("</w:numbering>");
    xml
}

fn core_properties(manuscript: &Manuscript) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{}</dc:title>
<dc:creator>folio</dc:creator>
<dcterms:created xsi:type="dcterms:W3CDTF">{}T00:00:00Z</dcterms:created>
</cp:coreProperties>"#,
        encode_text(&manuscript.title),
        manuscript.generated_on.format("%Y-%m-%d")
    )
}

fn encode_error(message: impl std::fmt::Display) -> FolioError {
    RenderError::new(RenderErrorKind::Encode {
        format: OutputFormat::Docx.to_string(),
        message: message.to_string(),
    })
    .into()
}

/// Word document with a title page, a table of contents and one section per chapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    fn body(&self, manuscript: &Manuscript) -> Body {
        let mut body = Body::default();

        for _ in 0..6 {
            body.empty();
        }
        body.text(
            ParagraphStyle {
                centered: true,
                ..ParagraphStyle::default()
            },
            &manuscript.title,
            RunStyle {
                bold: true,
                size_pt: Some(36),
                color: Some(TITLE_COLOR),
                font: Some("Arial"),
                ..RunStyle::default()
            },
        );
        body.empty();
        body.text(
            ParagraphStyle {
                centered: true,
                ..ParagraphStyle::default()
            },
            &manuscript.date_line(),
            RunStyle {
                size_pt: Some(12),
                color: Some(MUTED_COLOR),
                ..RunStyle::default()
            },
        );
        body.page_break();

        body.text(
            ParagraphStyle::styled("Heading1"),
            "Table of Contents",
            RunStyle::default(),
        );
        body.empty();
        for chapter in &manuscript.chapters {
            body.text(
                ParagraphStyle {
                    after: Some(160),
                    ..ParagraphStyle::default()
                },
                &chapter.heading(),
                RunStyle {
                    size_pt: Some(12),
                    ..RunStyle::default()
                },
            );
        }
        body.page_break();

        for chapter in &manuscript.chapters {
            body.text(
                ParagraphStyle::styled("Heading1"),
                &chapter.heading(),
                RunStyle::default(),
            );
            for block in &chapter.blocks {
                body.block(block);
            }
            body.page_break();
        }
        body
    }

    fn document(&self, body: &Body) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
            WORD_NS, body.xml
        )
    }
}

impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    #[tracing::instrument(skip_all, fields(title = %manuscript.title, chapters = manuscript.chapters.len()))]
    fn render(&self, manuscript: &Manuscript) -> FolioResult<Vec<u8>> {
        let body = self.body(manuscript);
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("docProps/core.xml", core_properties(manuscript)),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", STYLES.to_string()),
            ("word/numbering.xml", numbering(body.numbered_lists)),
            ("word/document.xml", self.document(&body)),
        ];

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(name, options).map_err(encode_error)?;
            zip.write_all(content.as_bytes()).map_err(encode_error)?;
        }
        let bytes = zip.finish().map_err(encode_error)?.into_inner();
        tracing::debug!(bytes = bytes.len(), "Packaged docx");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManuscriptChapter;
    use chrono::NaiveDate;
    use folio_document::parse_blocks;

    fn manuscript(body: &str) -> Manuscript {
        Manuscript::new(
            "Tom & Jerry <Live>",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            vec![ManuscriptChapter {
                number: 1,
                title: "Opening".to_string(),
                blocks: parse_blocks(body),
            }],
        )
    }

    #[test]
    fn numbered_lists_restart() {
        let renderer = DocxRenderer;
        let body = renderer.body(&manuscript("1. one\n2. two\n\nBreak.\n\n1. again"));
        assert_eq!(body.numbered_lists, 2);
        assert!(body.xml.contains(r#"<w:numId w:val="2"/>"#));
        assert!(body.xml.contains(r#"<w:numId w:val="3"/>"#));
        let numbering = numbering(body.numbered_lists);
        assert_eq!(numbering.matches("<w:startOverride").count(), 2);
    }

    #[test]
    fn body_paragraphs_are_justified() {
        let body = DocxRenderer.body(&manuscript("## Aside\n\nA ***firm*** line."));
        assert_eq!(body.xml.matches(r#"<w:jc w:val="both"/>"#).count(), 1);
        assert!(body.xml.contains("firm"));
        assert!(!body.xml.contains('*'));
    }

    #[test]
    fn text_is_escaped_and_bold_preserved() {
        let body = DocxRenderer.body(&manuscript("A **strong** claim & more."));
        assert!(body.xml.contains("Tom &amp; Jerry &lt;Live&gt;"));
        assert!(body.xml.contains("<w:b/></w:rPr><w:t xml:space=\"preserve\">strong</w:t>"));
        assert!(body.xml.contains("claim &amp; more."));
    }

    #[test]
    fn chapter_heading_uses_heading_style() {
        let body = DocxRenderer.body(&manuscript("Text."));
        assert!(body.xml.contains(
            r#"<w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Chapter 1: Opening</w:t></w:r>"#
        ));
    }
}

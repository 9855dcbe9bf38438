use folio_document::{ContentBlock, HeadingLevel, parse_blocks};

fn heading(level: HeadingLevel, text: &str) -> ContentBlock {
    ContentBlock::Heading {
        level,
        text: text.to_string(),
    }
}

fn paragraph(text: &str) -> ContentBlock {
    ContentBlock::Paragraph {
        text: text.to_string(),
    }
}

#[test]
fn heading_levels_use_most_specific_prefix() {
    let blocks = parse_blocks("# One\n\n## Two\n\n### Three\n\n#### Four\n\n##### Five");
    assert_eq!(
        blocks,
        vec![
            heading(HeadingLevel::H1, "One"),
            heading(HeadingLevel::H2, "Two"),
            heading(HeadingLevel::H3, "Three"),
            heading(HeadingLevel::H4, "Four"),
            paragraph("##### Five"),
        ]
    );
}

#[test]
fn bullet_items_drop_non_matching_lines() {
    let blocks = parse_blocks("- first\n* second\n  stray continuation\n- third");
    assert_eq!(
        blocks,
        vec![ContentBlock::BulletList {
            items: vec!["first".into(), "second".into(), "third".into()]
        }]
    );
}

#[test]
fn numbered_list_requires_period_and_space() {
    let blocks = parse_blocks("1. Alpha\n2. Beta\n\n3.No space here");
    assert_eq!(
        blocks,
        vec![
            ContentBlock::NumberedList {
                items: vec!["Alpha".into(), "Beta".into()]
            },
            paragraph("3.No space here"),
        ]
    );
}

#[test]
fn blockquote_markers_are_removed() {
    let blocks = parse_blocks("> The sea\n> is wide\nand deep");
    assert_eq!(
        blocks,
        vec![ContentBlock::Blockquote {
            text: "The sea\nis wide\nand deep".into()
        }]
    );
}

#[test]
fn fenced_code_keeps_blank_lines_and_strips_language() {
    let blocks = parse_blocks("Before\n\n```rust\nfn main() {\n\n    println!(\"hi\");\n}\n```\n\nAfter");
    assert_eq!(
        blocks,
        vec![
            paragraph("Before"),
            ContentBlock::CodeBlock {
                language: Some("rust".into()),
                text: "fn main() {\n\n    println!(\"hi\");\n}".into(),
            },
            paragraph("After"),
        ]
    );
}

#[test]
fn fence_without_language_keeps_first_line() {
    let blocks = parse_blocks("```\nidentifier\nmore\n```");
    assert_eq!(
        blocks,
        vec![ContentBlock::CodeBlock {
            language: None,
            text: "identifier\nmore".into(),
        }]
    );
}

#[test]
fn single_line_fence() {
    let blocks = parse_blocks("```let x = 1;```");
    assert_eq!(
        blocks,
        vec![ContentBlock::CodeBlock {
            language: None,
            text: "let x = 1;".into(),
        }]
    );
}

#[test]
fn unterminated_fence_runs_to_end() {
    let blocks = parse_blocks("```python\nprint(1)\n\nprint(2)");
    assert_eq!(
        blocks,
        vec![ContentBlock::CodeBlock {
            language: Some("python".into()),
            text: "print(1)\n\nprint(2)".into(),
        }]
    );
}

#[test]
fn paragraphs_keep_inline_markers() {
    let blocks = parse_blocks("A **bold** claim.\nSecond line.\n\n\n\nNext.");
    assert_eq!(
        blocks,
        vec![paragraph("A **bold** claim.\nSecond line."), paragraph("Next.")]
    );
    let spans = blocks[0].spans().unwrap();
    assert_eq!(spans.len(), 3);
    assert!(spans[1].bold);
}

#[test]
fn whitespace_only_lines_separate_paragraphs() {
    let blocks = parse_blocks("one\r\n   \r\ntwo");
    assert_eq!(blocks, vec![paragraph("one"), paragraph("two")]);
}

#[test]
fn empty_input_has_no_blocks() {
    assert!(parse_blocks("").is_empty());
    assert!(parse_blocks("\n\n  \n").is_empty());
}

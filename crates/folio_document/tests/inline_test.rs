use folio_document::{InlineSpan, bold_spans, clean, strip_inline};

const SAMPLES: &[&str] = &[
    "plain text",
    "**bold** and *italic* and `code`",
    "__strong__ and _soft_ emphasis",
    "see [the docs](https://example.com/x_y) now",
    "nested **bold with `code`** end",
    "****a****",
    "*a **b** c*",
    "***x***",
    "a ***bold italic*** point and __*mixed*__ runs",
    "rule\n\n---\n\n\n\n\nafter",
    "  padded  \n\n\n",
    "snake_case_name stays",
    "_a_ _b_ _c_",
    "unbalanced **bold",
];

#[test]
fn clean_is_idempotent() {
    for sample in SAMPLES {
        let once = clean(sample);
        assert_eq!(clean(&once), once, "sample: {sample:?}");
    }
}

#[test]
fn strip_inline_is_idempotent() {
    for sample in SAMPLES {
        let once = strip_inline(sample);
        assert_eq!(strip_inline(&once), once, "sample: {sample:?}");
    }
}

#[test]
fn clean_removes_markers_and_keeps_link_labels() {
    assert_eq!(
        clean("**Bold** _it_ `x` [label](http://a.b)"),
        "Bold it x label"
    );
}

#[test]
fn clean_keeps_identifiers_with_underscores() {
    assert_eq!(clean("call do_the_thing() now"), "call do_the_thing() now");
}

#[test]
fn adjacent_underscore_emphasis_is_fully_stripped() {
    assert_eq!(clean("_a_ _b_ _c_"), "a b c");
}

#[test]
fn clean_collapses_blank_runs_and_rules() {
    assert_eq!(clean("one\n\n***\n\n\n\ntwo\n"), "one\n\ntwo");
}

#[test]
fn bold_spans_mark_bold_runs() {
    assert_eq!(
        bold_spans("Start **loud** middle __also loud__ end"),
        vec![
            InlineSpan::plain("Start "),
            InlineSpan::bold("loud"),
            InlineSpan::plain(" middle "),
            InlineSpan::bold("also loud"),
            InlineSpan::plain(" end"),
        ]
    );
}

#[test]
fn bold_spans_strip_other_markers() {
    assert_eq!(
        bold_spans("*soft* then **`hard`**"),
        vec![InlineSpan::plain("soft then "), InlineSpan::bold("hard")]
    );
}

#[test]
fn bold_spans_without_bold_is_one_plain_run() {
    assert_eq!(bold_spans("nothing here"), vec![InlineSpan::plain("nothing here")]);
    assert!(bold_spans("").is_empty());
}

#[test]
fn bold_spans_agree_with_strip_inline() {
    for sample in SAMPLES {
        let joined: String = bold_spans(sample).into_iter().map(|s| s.text).collect();
        assert_eq!(joined, strip_inline(sample), "sample: {sample:?}");
    }
}

#[test]
fn bold_italic_markers_leave_no_asterisks() {
    assert_eq!(bold_spans("***key point***"), vec![InlineSpan::bold("key point")]);
    assert_eq!(
        bold_spans("Remember: ***always*** reef early."),
        vec![
            InlineSpan::plain("Remember: "),
            InlineSpan::bold("always"),
            InlineSpan::plain(" reef early."),
        ]
    );
}

#[test]
fn bold_inside_italic_keeps_its_weight() {
    assert_eq!(
        bold_spans("*a **b** c*"),
        vec![
            InlineSpan::plain("a "),
            InlineSpan::bold("b"),
            InlineSpan::plain(" c"),
        ]
    );
}

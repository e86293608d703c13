use serde_json::Value;

use super::block::{
    DesmosBlock, DesmosExpression, ImageBlock, KatexBlock, LessonBlock, QuestionBlock, TextBlock,
    Viewport,
};
use super::document::{Chapter, LessonDocument, LessonPage, LessonSection};

/// Cleans a raw lesson value into a typed document. Lesson files are
/// hand-edited JSON, so cleaning never fails: entries that do not match
/// the expected shape are dropped and the rest of the document is kept.
pub fn clean_lesson(raw: &Value) -> LessonDocument {
    let Some(root) = raw.as_object() else {
        return LessonDocument::default();
    };

    let chapter = match root.get("chapter") {
        Some(Value::String(label)) => Some(Chapter::Label(label.clone())),
        Some(Value::Number(number)) => number.as_f64().map(Chapter::Number),
        _ => None,
    };

    let objectives = root
        .get("objectives")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    let pages = root
        .get("pages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(index, page)| clean_page(page, index))
                .collect()
        })
        .unwrap_or_default();

    let sections = root
        .get("sections")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(clean_section).collect())
        .unwrap_or_default();

    LessonDocument {
        title: str_field(raw, "title"),
        chapter,
        objectives,
        pages,
        sections,
    }
}

fn clean_page(value: &Value, index: usize) -> Option<LessonPage> {
    if !value.is_object() {
        return None;
    }

    let blocks = value
        .get("blocks")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(clean_block).collect())
        .unwrap_or_default();

    Some(LessonPage {
        id: str_field(value, "id").unwrap_or_else(|| format!("page-{}", index + 1)),
        title: str_field(value, "title").unwrap_or_else(|| format!("Page {}", index + 1)),
        blocks,
    })
}

fn clean_block(value: &Value) -> Option<LessonBlock> {
    let block_type = value.get("type").and_then(Value::as_str)?;

    match block_type {
        "text" => Some(LessonBlock::Text(TextBlock {
            text: str_field(value, "text")?,
        })),
        "katex" => Some(LessonBlock::Katex(KatexBlock {
            expression: str_field(value, "expression")?,
            display_mode: bool_field(value, "displayMode", true),
        })),
        "image" => Some(LessonBlock::Image(ImageBlock {
            src: str_field(value, "src")?,
            alt: str_field(value, "alt"),
            caption: str_field(value, "caption"),
            max_width: finite_field(value, "maxWidth"),
        })),
        "question" => Some(LessonBlock::Question(QuestionBlock {
            id: str_field(value, "id")?,
            prompt: str_field(value, "prompt")?,
            explanation: str_field(value, "explanation"),
            acceptable_answers: value
                .get("acceptableAnswers")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter(|answer| !answer.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            require_correct_before_advance: bool_field(value, "requireCorrectBeforeAdvance", false),
        })),
        "desmos" => Some(LessonBlock::Desmos(DesmosBlock {
            title: str_field(value, "title"),
            expressions: value
                .get("expressions")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(clean_desmos_expression).collect())
                .unwrap_or_default(),
            viewport: value.get("viewport").and_then(clean_viewport),
            require_student_graph_before_advance: bool_field(
                value,
                "requireStudentGraphBeforeAdvance",
                false,
            ),
        })),
        _ => None,
    }
}

fn clean_desmos_expression(value: &Value) -> Option<DesmosExpression> {
    match value {
        Value::String(latex) => Some(DesmosExpression {
            latex: latex.clone(),
            label: None,
            show_label: false,
        }),
        Value::Object(_) => Some(DesmosExpression {
            latex: str_field(value, "latex")?,
            label: str_field(value, "label"),
            show_label: bool_field(value, "showLabel", false),
        }),
        _ => None,
    }
}

fn clean_viewport(value: &Value) -> Option<Viewport> {
    Some(Viewport {
        left: finite_field(value, "left")?,
        right: finite_field(value, "right")?,
        bottom: finite_field(value, "bottom")?,
        top: finite_field(value, "top")?,
    })
}

fn clean_section(value: &Value) -> LessonSection {
    LessonSection {
        heading: str_field(value, "heading"),
        content: str_field(value, "content"),
    }
}

fn str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn finite_field(value: &Value, field: &str) -> Option<f64> {
    value
        .get(field)
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
}

// Flags are authored as booleans, 0/1, or strings; coerce the way the
// viewer always has.
fn bool_field(value: &Value, field: &str, default: bool) -> bool {
    match value.get(field) {
        None => default,
        Some(field_value) => truthy(field_value),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_input_yields_the_empty_document() {
        for raw in [json!(null), json!(42), json!("lesson"), json!([1, 2, 3])] {
            let document = clean_lesson(&raw);
            assert_eq!(document, LessonDocument::default());
            assert!(document.pages.is_empty());
            assert!(document.objectives.is_empty());
            assert!(document.sections.is_empty());
        }
    }

    #[test]
    fn title_and_chapter_require_matching_types() {
        let document = clean_lesson(&json!({
            "title": 12,
            "chapter": 5,
        }));
        assert_eq!(document.title, None);
        assert_eq!(document.chapter, Some(Chapter::Number(5.0)));

        let document = clean_lesson(&json!({
            "title": "The Unit Circle",
            "chapter": "Chapter 5",
        }));
        assert_eq!(document.title.as_deref(), Some("The Unit Circle"));
        assert_eq!(
            document.chapter,
            Some(Chapter::Label("Chapter 5".to_string()))
        );

        let document = clean_lesson(&json!({ "chapter": [5] }));
        assert_eq!(document.chapter, None);
    }

    #[test]
    fn objectives_keep_only_strings_in_order() {
        let document = clean_lesson(&json!({
            "objectives": ["first", 2, null, "fourth"],
        }));
        assert_eq!(document.objectives, vec!["first", "fourth"]);

        let document = clean_lesson(&json!({ "objectives": "not a list" }));
        assert!(document.objectives.is_empty());
    }

    #[test]
    fn pages_get_default_ids_and_titles_by_position() {
        let document = clean_lesson(&json!({
            "pages": [
                { "title": "Warm up" },
                "not a page",
                { "id": "m1-p2" },
            ],
        }));

        assert_eq!(document.pages.len(), 2);
        assert_eq!(document.pages[0].id, "page-1");
        assert_eq!(document.pages[0].title, "Warm up");
        // the dropped entry still counts toward positional defaults
        assert_eq!(document.pages[1].id, "m1-p2");
        assert_eq!(document.pages[1].title, "Page 3");
    }

    #[test]
    fn invalid_blocks_are_dropped_and_siblings_keep_their_order() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [
                    { "type": "text", "text": "before" },
                    { "type": "video", "src": "x.mp4" },
                    { "type": "text" },
                    { "type": "katex", "expression": "\\sin t" },
                    17,
                    { "type": "text", "text": "after" },
                ],
            }],
        }));

        let blocks = &document.pages[0].blocks;
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            LessonBlock::Text(TextBlock {
                text: "before".to_string()
            })
        );
        assert!(matches!(blocks[1], LessonBlock::Katex(_)));
        assert_eq!(
            blocks[2],
            LessonBlock::Text(TextBlock {
                text: "after".to_string()
            })
        );
    }

    #[test]
    fn katex_display_mode_defaults_to_true() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [
                    { "type": "katex", "expression": "\\pi" },
                    { "type": "katex", "expression": "\\pi", "displayMode": false },
                    { "type": "katex", "expression": "\\pi", "displayMode": 0 },
                ],
            }],
        }));

        let display_modes: Vec<bool> = document.pages[0]
            .blocks
            .iter()
            .map(|block| match block {
                LessonBlock::Katex(katex) => katex.display_mode,
                other => panic!("unexpected block {:?}", other),
            })
            .collect();
        assert_eq!(display_modes, vec![true, false, false]);
    }

    #[test]
    fn image_max_width_must_be_numeric() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [
                    { "type": "image", "src": "circle.png", "alt": "unit circle", "maxWidth": 480 },
                    { "type": "image", "src": "circle.png", "maxWidth": "480" },
                    { "type": "image", "alt": "missing src" },
                ],
            }],
        }));

        let blocks = &document.pages[0].blocks;
        assert_eq!(blocks.len(), 2);
        let LessonBlock::Image(first) = &blocks[0] else {
            panic!("expected image block");
        };
        assert_eq!(first.max_width, Some(480.0));
        let LessonBlock::Image(second) = &blocks[1] else {
            panic!("expected image block");
        };
        assert_eq!(second.max_width, None);
    }

    #[test]
    fn question_answers_are_filtered_to_non_empty_strings() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [{
                    "type": "question",
                    "id": "q1",
                    "prompt": "What is cos(0)?",
                    "acceptableAnswers": ["1", "", 1, null],
                    "requireCorrectBeforeAdvance": 1,
                }],
            }],
        }));

        let LessonBlock::Question(question) = &document.pages[0].blocks[0] else {
            panic!("expected question block");
        };
        assert_eq!(question.acceptable_answers, vec!["1"]);
        assert!(question.require_correct_before_advance);
        assert_eq!(question.explanation, None);
    }

    #[test]
    fn desmos_expressions_accept_strings_and_objects_independently() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [{
                    "type": "desmos",
                    "title": "Graph it",
                    "expressions": [
                        "y=\\sin x",
                        { "latex": "x^2+y^2=1", "label": "unit circle", "showLabel": true },
                        { "label": "no latex" },
                        42,
                    ],
                    "viewport": { "left": -2, "right": 2, "bottom": -2, "top": 2 },
                }],
            }],
        }));

        let LessonBlock::Desmos(desmos) = &document.pages[0].blocks[0] else {
            panic!("expected desmos block");
        };
        assert_eq!(desmos.expressions.len(), 2);
        assert_eq!(desmos.expressions[0].latex, "y=\\sin x");
        assert_eq!(desmos.expressions[0].label, None);
        assert_eq!(desmos.expressions[1].label.as_deref(), Some("unit circle"));
        assert!(desmos.expressions[1].show_label);
        assert_eq!(
            desmos.viewport,
            Some(Viewport {
                left: -2.0,
                right: 2.0,
                bottom: -2.0,
                top: 2.0,
            })
        );
    }

    #[test]
    fn partial_viewports_are_rejected() {
        let document = clean_lesson(&json!({
            "pages": [{
                "blocks": [{
                    "type": "desmos",
                    "expressions": [],
                    "viewport": { "left": -2, "right": 2, "top": 2 },
                }],
            }],
        }));

        let LessonBlock::Desmos(desmos) = &document.pages[0].blocks[0] else {
            panic!("expected desmos block");
        };
        assert_eq!(desmos.viewport, None);
    }

    #[test]
    fn sections_copy_string_fields_only() {
        let document = clean_lesson(&json!({
            "sections": [
                { "heading": "Radians", "content": "An angle measure." },
                { "heading": 5 },
                "just a string",
            ],
        }));

        assert_eq!(document.sections.len(), 3);
        assert_eq!(document.sections[0].heading.as_deref(), Some("Radians"));
        assert_eq!(document.sections[1], LessonSection::default());
        assert_eq!(document.sections[2], LessonSection::default());
    }
}

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use precalc::lesson::{clean_lesson, serialize_page, LessonBlock};
use precalc::progress::{progress_storage_key, ProgressStore};
use precalc::viewer::{Coordinate, LessonViewer, PageAdvance};

fn temp_store_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("precalc-flow-{}-{}.json", name, std::process::id()))
}

// A lesson file the way an author would actually write it, including a
// couple of mistakes the cleaner is expected to absorb.
fn unit_circle_lesson() -> serde_json::Value {
    json!({
        "title": "The Unit Circle",
        "chapter": 5,
        "objectives": [
            "Locate terminal points on the unit circle",
            "Evaluate the six circular functions at special angles",
            7,
        ],
        "pages": [
            {
                "id": "m1-p1",
                "title": "Terminal points",
                "blocks": [
                    { "type": "text", "text": "Every real number t walks an arc of length t." },
                    { "type": "katex", "expression": "x^2 + y^2 = 1" },
                    { "type": "diagram", "src": "oops.svg" },
                    { "type": "image", "src": "circle.png", "alt": "unit circle", "maxWidth": 520 },
                ],
            },
            {
                "id": "m1-p2",
                "title": "Check your understanding",
                "blocks": [
                    {
                        "type": "question",
                        "id": "q-terminal",
                        "prompt": "Give the terminal point for t = π/3.",
                        "explanation": "Use the 30-60-90 triangle.",
                        "acceptableAnswers": ["(1/2,\\sqrt{3}/2)"],
                        "requireCorrectBeforeAdvance": true,
                    },
                ],
            },
            {
                "id": "m1-p3",
                "title": "Graph it",
                "blocks": [
                    {
                        "type": "desmos",
                        "title": "Draw the unit circle",
                        "expressions": [
                            { "latex": "(\\cos t, \\sin t)", "label": "terminal point", "showLabel": true },
                        ],
                        "viewport": { "left": -2, "right": 2, "bottom": -2, "top": 2 },
                        "requireStudentGraphBeforeAdvance": true,
                    },
                ],
            },
        ],
    })
}

#[test]
fn a_full_lesson_walk_survives_a_restart() {
    let document = clean_lesson(&unit_circle_lesson());

    // the malformed diagram block is gone, everything else survived
    assert_eq!(document.title.as_deref(), Some("The Unit Circle"));
    assert_eq!(document.objectives.len(), 2);
    assert_eq!(document.pages.len(), 3);
    assert_eq!(document.pages[0].blocks.len(), 3);

    let path = temp_store_path("walk");
    let mut store = ProgressStore::open(&path);
    let mut viewer = LessonViewer::open(
        document.clone(),
        "ada",
        "precalc/chapter-5/unit-circle.json",
        &store,
    );

    // page 1 has no gates
    assert_eq!(viewer.next_page(&mut store).unwrap(), PageAdvance::Moved(1));

    // the required question blocks page 2 until a correct submission
    assert!(matches!(
        viewer.next_page(&mut store).unwrap(),
        PageAdvance::Blocked(_)
    ));
    viewer
        .update_answer("q-terminal", Coordinate::X, "1/2", &mut store)
        .unwrap();
    viewer
        .update_answer("q-terminal", Coordinate::Y, "\\sqrt3/2", &mut store)
        .unwrap();
    assert_eq!(
        viewer.submit_answer("q-terminal", &mut store).unwrap(),
        Some(true)
    );
    assert_eq!(viewer.next_page(&mut store).unwrap(), PageAdvance::Moved(2));

    // the graph gate holds until the unit circle shows up in the state
    assert!(matches!(
        viewer.next_page(&mut store).unwrap(),
        PageAdvance::Blocked(_)
    ));
    let key = LessonViewer::graph_block_key(viewer.current_page().unwrap(), 0);
    viewer
        .record_graph_state(
            &key,
            json!({ "expressions": { "list": [{ "latex": "x^{2}+y^{2}=1" }] } }),
            &mut store,
        )
        .unwrap();
    assert_eq!(viewer.next_page(&mut store).unwrap(), PageAdvance::AtEnd);

    // a new viewer over a reopened store lands exactly where we left off
    drop(viewer);
    let store = ProgressStore::open(&path);
    let restored = LessonViewer::open(
        document,
        "ada",
        "precalc/chapter-5/unit-circle.json",
        &store,
    );
    assert_eq!(restored.page_index(), 2);
    assert!(restored
        .progress()
        .question_results
        .get("q-terminal")
        .unwrap()
        .is_correct);
    assert_eq!(
        restored.progress().desmos_graph_status.get(&key),
        Some(&true)
    );

    fs::remove_file(&path).unwrap();
}

#[test]
fn corrupted_saved_progress_starts_the_lesson_over() {
    let document = clean_lesson(&unit_circle_lesson());
    let path = temp_store_path("corrupt");

    let mut store = ProgressStore::open(&path);
    let key = progress_storage_key("ada", "precalc/chapter-5/unit-circle.json");
    store.set(&key, json!("not progress at all")).unwrap();

    let viewer = LessonViewer::open(
        document,
        "ada",
        "precalc/chapter-5/unit-circle.json",
        &store,
    );
    assert_eq!(viewer.page_index(), 0);
    assert!(viewer.progress().question_answers.is_empty());

    fs::remove_file(&path).unwrap();
}

#[test]
fn cleaned_pages_serialize_to_markdown() {
    let document = clean_lesson(&unit_circle_lesson());

    let first = serialize_page(&document.pages[0], 0).unwrap();
    assert!(first.contains("id: m1-p1"));
    assert!(first.contains("$$x^2 + y^2 = 1$$"));
    assert!(first.contains("![unit circle](circle.png)"));

    let second = serialize_page(&document.pages[1], 1).unwrap();
    assert!(second.contains("> **Check your understanding:** Give the terminal point for t = π/3."));

    let third = serialize_page(&document.pages[2], 2).unwrap();
    assert!(third.contains("```desmos\n(\\cos t, \\sin t)\n```"));

    // the desmos expression object kept its label
    let LessonBlock::Desmos(desmos) = &document.pages[2].blocks[0] else {
        panic!("expected desmos block");
    };
    assert_eq!(desmos.expressions[0].label.as_deref(), Some("terminal point"));
}

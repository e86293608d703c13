use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Two-part coordinate answer. Single-value questions leave one part
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerValue {
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
}

impl AnswerValue {
    /// An attempt on a two-part answer needs both parts filled in.
    pub fn is_attempted(&self) -> bool {
        !self.x.trim().is_empty() && !self.y.trim().is_empty()
    }

    /// The string handed to the answer checker: `(x,y)` when both parts
    /// are present, the single filled part otherwise.
    pub fn combined(&self) -> String {
        let x = self.x.trim();
        let y = self.y.trim();
        if y.is_empty() {
            x.to_string()
        } else if x.is_empty() {
            y.to_string()
        } else {
            format!("({},{})", x, y)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub submitted: bool,
    pub is_correct: bool,
}

/// The persisted per-student, per-lesson viewer snapshot. Field names
/// match the JSON the browser client has always written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonProgress {
    pub page_index: usize,
    pub question_answers: BTreeMap<String, AnswerValue>,
    pub visible_hints: BTreeMap<String, bool>,
    pub question_results: BTreeMap<String, QuestionResult>,
    pub desmos_graph_status: BTreeMap<String, bool>,
    pub desmos_graph_states: BTreeMap<String, Value>,
}

pub fn progress_storage_key(username: &str, lesson_file_path: &str) -> String {
    format!("precalc-lesson-progress:{}:{}", username, lesson_file_path)
}

pub fn navigation_storage_key(username: &str) -> String {
    format!("student-navigation:{}", username)
}

/// Restores persisted progress from an untrusted value. Non-object input
/// is discarded entirely; inside an object, every field falls back to its
/// default when the stored type does not match, and `pageIndex` is
/// clamped to the open lesson's page range.
pub fn clean_progress(raw: &Value, max_page_index: usize) -> Option<LessonProgress> {
    let map = raw.as_object()?;

    let page_index = map
        .get("pageIndex")
        .and_then(Value::as_u64)
        .map(|index| index as usize)
        .unwrap_or(0)
        .min(max_page_index);

    let question_answers = object_entries(map.get("questionAnswers"))
        .filter_map(|(id, value)| {
            value.as_object().map(|answer| {
                (
                    id.clone(),
                    AnswerValue {
                        x: string_or_default(answer.get("x")),
                        y: string_or_default(answer.get("y")),
                    },
                )
            })
        })
        .collect();

    let visible_hints = object_entries(map.get("visibleHints"))
        .map(|(id, value)| (id.clone(), value == &Value::Bool(true)))
        .collect();

    let question_results = object_entries(map.get("questionResults"))
        .filter_map(|(id, value)| {
            value.as_object().map(|result| {
                (
                    id.clone(),
                    QuestionResult {
                        submitted: result.get("submitted") == Some(&Value::Bool(true)),
                        is_correct: result.get("isCorrect") == Some(&Value::Bool(true)),
                    },
                )
            })
        })
        .collect();

    let desmos_graph_status = object_entries(map.get("desmosGraphStatus"))
        .map(|(id, value)| (id.clone(), value == &Value::Bool(true)))
        .collect();

    let desmos_graph_states = object_entries(map.get("desmosGraphStates"))
        .filter(|(_, value)| value.is_object())
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect();

    Some(LessonProgress {
        page_index,
        question_answers,
        visible_hints,
        question_results,
        desmos_graph_status,
        desmos_graph_states,
    })
}

fn object_entries(value: Option<&Value>) -> impl Iterator<Item = (&String, &Value)> {
    value
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.iter())
}

fn string_or_default(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// File-backed analog of the browser's localStorage: one JSON object
/// mapping storage key to stored value. Every write re-serializes the
/// whole map, last write wins, no merging.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl ProgressStore {
    /// A missing or corrupted store file opens as an empty store rather
    /// than failing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        let text = serde_json::to_string_pretty(&self.entries)
            .context("failed to serialize progress store")?;
        fs::write(&self.path, text).context(format!(
            "failed to write progress store {}",
            self.path.display()
        ))?;
        Ok(())
    }
}

pub fn read_lesson_progress(
    store: &ProgressStore,
    key: &str,
    max_page_index: usize,
) -> Option<LessonProgress> {
    store
        .get(key)
        .and_then(|raw| clean_progress(raw, max_page_index))
}

pub fn write_lesson_progress(
    store: &mut ProgressStore,
    key: &str,
    progress: &LessonProgress,
) -> anyhow::Result<()> {
    let value = serde_json::to_value(progress).context("failed to serialize lesson progress")?;
    store.set(key, value)
}

use anyhow::Result;
use serde_json::Value;

use crate::answer::is_answer_acceptable;
use crate::lesson::{LessonBlock, LessonDocument, LessonPage, QuestionBlock};
use crate::progress::{
    progress_storage_key, read_lesson_progress, write_lesson_progress, AnswerValue, LessonProgress,
    ProgressStore, QuestionResult,
};

/// Which half of a two-part coordinate answer an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    X,
    Y,
}

/// Outcome of a "next page" request. Blocked and AtEnd leave the viewer
/// unchanged; Blocked carries the message shown to the student.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAdvance {
    Moved(usize),
    Blocked(String),
    AtEnd,
}

/// Drives one open lesson: the cleaned document plus the student's live
/// progress. Every mutation persists the full snapshot through the
/// store, so the viewer can be dropped and reopened at any point.
#[derive(Debug)]
pub struct LessonViewer {
    document: LessonDocument,
    storage_key: String,
    progress: LessonProgress,
}

impl LessonViewer {
    /// Opens a lesson for a student, restoring any previously saved
    /// progress for this (user, lesson) pair. The restored page index is
    /// clamped to the current page count, so a shortened lesson still
    /// opens on a valid page.
    pub fn open(
        document: LessonDocument,
        username: &str,
        lesson_file_path: &str,
        store: &ProgressStore,
    ) -> Self {
        let storage_key = progress_storage_key(username, lesson_file_path);
        let max_page_index = document.pages.len().saturating_sub(1);
        let progress = read_lesson_progress(store, &storage_key, max_page_index).unwrap_or_default();

        Self {
            document,
            storage_key,
            progress,
        }
    }

    pub fn document(&self) -> &LessonDocument {
        &self.document
    }

    pub fn progress(&self) -> &LessonProgress {
        &self.progress
    }

    pub fn page_index(&self) -> usize {
        self.progress.page_index
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    pub fn current_page(&self) -> Option<&LessonPage> {
        self.document.pages.get(self.progress.page_index)
    }

    /// Storage key for a desmos block. The blocks carry no id of their
    /// own, so status and state are keyed by page id and 1-based block
    /// position, which is stable because block order is display order.
    pub fn graph_block_key(page: &LessonPage, block_index: usize) -> String {
        format!("{}:graph-{}", page.id, block_index + 1)
    }

    /// The message blocking "next page", if any required block on the
    /// current page is still incomplete.
    pub fn advancement_gate(&self) -> Option<String> {
        let page = self.current_page()?;

        for (index, block) in page.blocks.iter().enumerate() {
            match block {
                LessonBlock::Question(question) if question.require_correct_before_advance => {
                    let correct = self
                        .progress
                        .question_results
                        .get(&question.id)
                        .map(|result| result.is_correct)
                        .unwrap_or(false);
                    if !correct {
                        return Some(
                            "Answer every required question correctly before moving on."
                                .to_string(),
                        );
                    }
                }
                LessonBlock::Desmos(desmos) if desmos.require_student_graph_before_advance => {
                    let key = Self::graph_block_key(page, index);
                    let complete = self
                        .progress
                        .desmos_graph_status
                        .get(&key)
                        .copied()
                        .unwrap_or(false);
                    if !complete {
                        return Some("Add the required graph before moving on.".to_string());
                    }
                }
                _ => {}
            }
        }

        None
    }

    pub fn next_page(&mut self, store: &mut ProgressStore) -> Result<PageAdvance> {
        if let Some(message) = self.advancement_gate() {
            return Ok(PageAdvance::Blocked(message));
        }
        if self.progress.page_index + 1 >= self.document.pages.len() {
            return Ok(PageAdvance::AtEnd);
        }

        self.progress.page_index += 1;
        self.persist(store)?;
        Ok(PageAdvance::Moved(self.progress.page_index))
    }

    /// Moving backwards is never gated.
    pub fn previous_page(&mut self, store: &mut ProgressStore) -> Result<bool> {
        if self.progress.page_index == 0 {
            return Ok(false);
        }

        self.progress.page_index -= 1;
        self.persist(store)?;
        Ok(true)
    }

    /// Records a keystroke-level edit to one part of a question's answer.
    pub fn update_answer(
        &mut self,
        question_id: &str,
        coordinate: Coordinate,
        value: &str,
        store: &mut ProgressStore,
    ) -> Result<()> {
        let answer = self
            .progress
            .question_answers
            .entry(question_id.to_string())
            .or_default();
        match coordinate {
            Coordinate::X => answer.x = value.to_string(),
            Coordinate::Y => answer.y = value.to_string(),
        }
        self.persist(store)
    }

    /// Checks the named question on the current page against its
    /// acceptable answers and caches the result. Returns `None` when the
    /// id does not name a question on the current page.
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        store: &mut ProgressStore,
    ) -> Result<Option<bool>> {
        let Some(question) = self.find_question(question_id).cloned() else {
            return Ok(None);
        };

        let answer = self
            .progress
            .question_answers
            .get(question_id)
            .cloned()
            .unwrap_or_default();
        let is_correct = question_answer_is_acceptable(&question, &answer);

        self.progress.question_results.insert(
            question_id.to_string(),
            QuestionResult {
                submitted: true,
                is_correct,
            },
        );
        self.persist(store)?;
        Ok(Some(is_correct))
    }

    pub fn set_hint_visible(
        &mut self,
        question_id: &str,
        visible: bool,
        store: &mut ProgressStore,
    ) -> Result<()> {
        self.progress
            .visible_hints
            .insert(question_id.to_string(), visible);
        self.persist(store)
    }

    /// Records the completion flag reported by the graphing widget.
    pub fn record_graph_status(
        &mut self,
        block_key: &str,
        complete: bool,
        store: &mut ProgressStore,
    ) -> Result<()> {
        self.progress
            .desmos_graph_status
            .insert(block_key.to_string(), complete);
        self.persist(store)
    }

    /// Stores a serialized calculator state and re-derives the completion
    /// flag from it, the same check the widget runs on every change.
    pub fn record_graph_state(
        &mut self,
        block_key: &str,
        state: Value,
        store: &mut ProgressStore,
    ) -> Result<()> {
        let complete = graph_state_marks_unit_circle(&state);
        self.progress
            .desmos_graph_states
            .insert(block_key.to_string(), state);
        self.progress
            .desmos_graph_status
            .insert(block_key.to_string(), complete);
        self.persist(store)
    }

    fn find_question(&self, question_id: &str) -> Option<&QuestionBlock> {
        self.current_page()?.blocks.iter().find_map(|block| match block {
            LessonBlock::Question(question) if question.id == question_id => Some(question),
            _ => None,
        })
    }

    fn persist(&self, store: &mut ProgressStore) -> Result<()> {
        write_lesson_progress(store, &self.storage_key, &self.progress)
    }
}

fn question_answer_is_acceptable(question: &QuestionBlock, answer: &AnswerValue) -> bool {
    if question.acceptable_answers.is_empty() {
        return answer.is_attempted();
    }
    is_answer_acceptable(&answer.combined(), &question.acceptable_answers)
}

/// Mirrors the graphing widget's check: an expression counts as the
/// student's unit circle when its latex, stripped of backslashes, braces,
/// and whitespace, contains the circle equation.
pub fn latex_is_unit_circle(latex: &str) -> bool {
    let stripped: String = latex
        .chars()
        .filter(|c| !matches!(c, '\\' | '{' | '}') && !c.is_whitespace())
        .collect();
    stripped.to_lowercase().contains("x^2+y^2=1")
}

/// Scans a serialized calculator state (`expressions.list[*].latex`) for
/// a unit-circle expression.
pub fn graph_state_marks_unit_circle(state: &Value) -> bool {
    state
        .get("expressions")
        .and_then(|expressions| expressions.get("list"))
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|expression| expression.get("latex").and_then(Value::as_str))
                .any(latex_is_unit_circle)
        })
        .unwrap_or(false)
}

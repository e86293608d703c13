use serde::Serialize;

/// One unit of lesson content. The set of block types is closed: the
/// cleaner drops anything whose tag is not one of these five.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonBlock {
    Text(TextBlock),
    Katex(KatexBlock),
    Image(ImageBlock),
    Question(QuestionBlock),
    Desmos(DesmosBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KatexBlock {
    pub expression: String,

    /// block-level (display) rendering; authors rarely set it, so it
    /// defaults to true
    pub display_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub src: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub max_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBlock {
    /// unique within the lesson; keys answers, hints, and results
    pub id: String,
    pub prompt: String,
    pub explanation: Option<String>,

    /// empty means any attempt counts
    pub acceptable_answers: Vec<String>,

    /// gates "next page" until a correct submission is cached
    pub require_correct_before_advance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesmosBlock {
    pub title: Option<String>,
    pub expressions: Vec<DesmosExpression>,
    pub viewport: Option<Viewport>,

    /// gates "next page" until the student graphs the target curve
    pub require_student_graph_before_advance: bool,
}

/// Authors write expressions as bare latex strings or as objects with a
/// label; both clean into this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesmosExpression {
    pub latex: String,
    pub label: Option<String>,
    pub show_label: bool,
}

/// Accepted only when all four bounds are present and numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

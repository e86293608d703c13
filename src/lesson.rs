mod block;
mod document;
mod markdown;
mod validate;

pub use block::{
    DesmosBlock, DesmosExpression, ImageBlock, KatexBlock, LessonBlock, QuestionBlock, TextBlock,
    Viewport,
};
pub use document::{Chapter, LessonDocument, LessonPage, LessonSection};
pub use markdown::{serialize_lesson_metadata, serialize_page, serialize_sections};
pub use validate::clean_lesson;

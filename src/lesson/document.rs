use std::fmt;

use serde::Serialize;

use super::block::LessonBlock;

/// Chapter labels are authored as either a string ("Chapter 5") or a bare
/// number (5).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Chapter {
    Label(String),
    Number(f64),
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chapter::Label(label) => f.write_str(label),
            Chapter::Number(number) if number.fract() == 0.0 => {
                write!(f, "{}", *number as i64)
            }
            Chapter::Number(number) => write!(f, "{}", number),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LessonDocument {
    /// lesson title, if the source file sets one
    pub title: Option<String>,

    /// chapter label or number
    pub chapter: Option<Chapter>,

    /// learning objectives, in authored order
    pub objectives: Vec<String>,

    /// ordered pages, insertion order = display order
    pub pages: Vec<LessonPage>,

    /// legacy heading/content sections, used only when `pages` is empty
    pub sections: Vec<LessonSection>,
}

impl LessonDocument {
    /// Older lesson files carry flat sections instead of pages.
    pub fn uses_sections(&self) -> bool {
        self.pages.is_empty() && !self.sections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonPage {
    pub id: String,
    pub title: String,

    /// content blocks, order preserved exactly as authored
    pub blocks: Vec<LessonBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LessonSection {
    pub heading: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_displays_whole_numbers_without_fraction() {
        assert_eq!(Chapter::Number(5.0).to_string(), "5");
        assert_eq!(Chapter::Number(5.5).to_string(), "5.5");
        assert_eq!(Chapter::Label("Chapter 5".to_string()).to_string(), "Chapter 5");
    }

    #[test]
    fn sections_are_a_fallback_only() {
        let mut document = LessonDocument::default();
        assert!(!document.uses_sections());

        document.sections.push(LessonSection {
            heading: Some("Intro".to_string()),
            content: None,
        });
        assert!(document.uses_sections());

        document.pages.push(LessonPage {
            id: "page-1".to_string(),
            title: "Page 1".to_string(),
            blocks: Vec::new(),
        });
        assert!(!document.uses_sections());
    }
}

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Serialize;

use super::block::LessonBlock;
use super::document::{LessonDocument, LessonPage};

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Frontmatter<'a> {
    Id(&'a str),
    Title(&'a str),
    Order(usize),
    Questions(Vec<QuestionMeta<'a>>),
}

#[derive(Serialize, Debug)]
struct QuestionMeta<'a> {
    id: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "is_false")]
    required: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum LessonFrontmatter<'a> {
    Title(Option<&'a str>),
    Chapter(Option<String>),
    Objectives(&'a [String]),
}

/// Renders one page as markdown with YAML frontmatter: page identity plus
/// question metadata up top, blocks below in display order.
pub fn serialize_page(page: &LessonPage, order: usize) -> anyhow::Result<String> {
    let mut fm: BTreeMap<&str, Frontmatter> = BTreeMap::new();
    fm.insert("id", Frontmatter::Id(page.id.as_str()));
    fm.insert("title", Frontmatter::Title(page.title.as_str()));
    fm.insert("order", Frontmatter::Order(order));

    let questions: Vec<QuestionMeta> = page
        .blocks
        .iter()
        .filter_map(|block| match block {
            LessonBlock::Question(question) => Some(QuestionMeta {
                id: &question.id,
                prompt: &question.prompt,
                required: question.require_correct_before_advance,
            }),
            _ => None,
        })
        .collect();
    fm.insert("questions", Frontmatter::Questions(questions));

    let mut body = String::with_capacity(400 * page.blocks.len());
    for block in &page.blocks {
        render_block(&mut body, block);
    }

    Ok(format!(
        r#"---
{}---

{}"#,
        serde_yaml_ng::to_string(&fm).context("failed to serialize page frontmatter")?,
        body
    ))
}

fn render_block(body: &mut String, block: &LessonBlock) {
    match block {
        LessonBlock::Text(text) => {
            body.push_str(&text.text);
            body.push_str("\n\n");
        }
        LessonBlock::Katex(katex) => {
            if katex.display_mode {
                body.push_str(&format!("$${}$$\n\n", katex.expression));
            } else {
                body.push_str(&format!("${}$\n\n", katex.expression));
            }
        }
        LessonBlock::Image(image) => {
            body.push_str(&format!(
                "![{}]({})\n\n",
                image.alt.as_deref().unwrap_or(""),
                image.src
            ));
            if let Some(caption) = &image.caption {
                body.push_str(&format!("*{}*\n\n", caption));
            }
        }
        LessonBlock::Question(question) => {
            body.push_str(&format!(
                "> **Check your understanding:** {}\n",
                question.prompt
            ));
            if let Some(explanation) = &question.explanation {
                body.push_str(&format!("> Hint: {}\n", explanation));
            }
            body.push('\n');
        }
        LessonBlock::Desmos(desmos) => {
            if let Some(title) = &desmos.title {
                body.push_str(&format!("**{}**\n\n", title));
            }
            body.push_str("```desmos\n");
            for expression in &desmos.expressions {
                body.push_str(&expression.latex);
                body.push('\n');
            }
            body.push_str("```\n\n");
        }
    }
}

/// Lesson-level metadata written alongside the pages.
pub fn serialize_lesson_metadata(document: &LessonDocument) -> anyhow::Result<String> {
    let mut fm: BTreeMap<&str, LessonFrontmatter> = BTreeMap::new();
    fm.insert("title", LessonFrontmatter::Title(document.title.as_deref()));
    fm.insert(
        "chapter",
        LessonFrontmatter::Chapter(document.chapter.as_ref().map(|chapter| chapter.to_string())),
    );
    fm.insert(
        "objectives",
        LessonFrontmatter::Objectives(&document.objectives),
    );

    serde_yaml_ng::to_string(&fm).context("failed to serialize lesson metadata")
}

/// Legacy documents carry flat heading/content sections instead of pages;
/// they render as a single markdown body.
pub fn serialize_sections(document: &LessonDocument) -> String {
    let mut body = String::new();
    for section in &document.sections {
        if let Some(heading) = &section.heading {
            body.push_str(&format!("## {}\n\n", heading));
        }
        if let Some(content) = &section.content {
            body.push_str(&format!("{}\n\n", content));
        }
    }
    body
}

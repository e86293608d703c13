use std::io::Write;
use std::{
    env,
    fs::{self, OpenOptions},
};

use anyhow::Context;
use precalc::fetch::{fetch_lesson, DEFAULT_BASE_URL};
use precalc::lesson::{
    serialize_lesson_metadata, serialize_page, serialize_sections, LessonDocument, LessonPage,
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_OUTPUT_DIR: &str = "output/lesson";

pub struct Config {
    pub lesson_path: String,
    pub output_dir: String,
}

impl Config {
    pub fn new(lesson_path: String, output_dir: &str) -> Self {
        Self {
            lesson_path,
            output_dir: output_dir.to_string(),
        }
    }
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let lesson_path = args
        .next()
        .context("lesson_path is required, e.g. precalc/chapter-5/unit-circle.json")?;
    let output_dir = args.next().unwrap_or(DEFAULT_OUTPUT_DIR.to_string());

    Ok(Config::new(lesson_path, &output_dir))
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args = env::args().skip(1);
    let config = match parse_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: cargo run --bin fetch_lesson <lesson_path> [output_dir]");
            return Err(e);
        }
    };

    let base_url = env::var("PRECALC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let document = fetch_lesson(&base_url, &config.lesson_path).context(format!(
        "could not load lesson {} from {}",
        config.lesson_path, base_url
    ))?;

    create_output_dir(&config.output_dir).context("failed to create output directory")?;

    let metadata = create_lesson_metadata(&document, &config.output_dir)
        .context("failed to create lesson metadata")?;

    let file_count = if document.uses_sections() {
        create_sections_file(&document, &config.output_dir)?;
        1
    } else {
        let mut slugger = github_slugger::Slugger::default();
        for (order, page) in document.pages.iter().enumerate() {
            let slug = slugger.slug(&page.title);
            let file_name = if slug.is_empty() { &page.id } else { &slug };
            if let Err(e) = create_page(page, order, &config.output_dir, file_name) {
                eprintln!("Error writing page {}: {}", page.id, e);
                return Err(e);
            }
        }
        document.pages.len()
    };

    println!("Fetched lesson metadata\n");
    println!("---");
    println!("{}", metadata);
    println!("---\n");

    println!(
        "created {BOLD}{}{RESET} files in {BOLD}{}{RESET}",
        file_count, &config.output_dir
    );

    Ok(())
}

fn create_lesson_metadata(document: &LessonDocument, output_dir: &str) -> anyhow::Result<String> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/lesson.yaml", output_dir))
        .context("failed to open file for lesson.yaml")?;

    let content = serialize_lesson_metadata(document)?;
    write!(file, "{}", content).context("failed to write lesson metadata")?;

    Ok(content)
}

fn create_page(
    page: &LessonPage,
    order: usize,
    output_dir: &str,
    file_name: &str,
) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/{}.md", output_dir, file_name))
        .context(format!("failed to open file for {}", page.id))?;

    let content = serialize_page(page, order).context("failed to serialize page")?;
    write!(file, "{}", content).context("failed to write page")?;

    Ok(())
}

fn create_sections_file(document: &LessonDocument, output_dir: &str) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(format!("{}/sections.md", output_dir))
        .context("failed to open file for sections.md")?;

    write!(file, "{}", serialize_sections(document)).context("failed to write sections")?;

    Ok(())
}

fn create_output_dir(output_dir: &str) -> anyhow::Result<()> {
    if fs::metadata(output_dir).is_ok() {
        fs::remove_dir_all(output_dir)?;
    }

    fs::create_dir_all(output_dir)?;
    Ok(())
}

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::lesson::{clean_lesson, LessonDocument};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Error, Debug)]
enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    Server { status: u16 },
}

/// Lesson catalog served at `/lessons/precalc/index.json`. Unlike lesson
/// files, the index is app-owned, so an unexpected shape is an error
/// rather than something to degrade around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonIndex {
    pub course: String,
    #[serde(default)]
    pub lessons: Vec<LessonIndexItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonIndexItem {
    pub id: String,
    pub title: String,
    pub chapter: u32,
    #[serde(default)]
    pub summary: String,
    pub path: String,
}

impl LessonIndex {
    /// Chapter filter plus case-insensitive title/summary search, as the
    /// lesson library page offers.
    pub fn search(&self, chapter: u32, term: &str) -> Vec<&LessonIndexItem> {
        let needle = term.trim().to_lowercase();

        self.lessons
            .iter()
            .filter(|lesson| {
                if lesson.chapter != chapter {
                    return false;
                }
                if needle.is_empty() {
                    return true;
                }
                lesson.title.to_lowercase().contains(&needle)
                    || lesson.summary.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

pub fn fetch_lesson_index(base_url: &str) -> anyhow::Result<LessonIndex> {
    let body = get_json(&lessons_url(base_url, "precalc/index.json"))?;
    serde_json::from_value(body).context("lesson index has an unexpected shape")
}

/// Fetches one lesson file and cleans it. The body's shape is never
/// trusted: whatever comes back goes through the lesson cleaner, so only
/// transport failures surface as errors.
pub fn fetch_lesson(base_url: &str, lesson_file_path: &str) -> anyhow::Result<LessonDocument> {
    let body = get_json(&lessons_url(base_url, lesson_file_path))?;
    Ok(clean_lesson(&body))
}

/// An authenticated student. The server reports the role in one of a few
/// envelope shapes; anything unrecognized is a student.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

pub fn login(base_url: &str, username: &str, password: &str) -> anyhow::Result<AuthUser> {
    let body = post_json(
        &auth_url(base_url, "login"),
        &json!({ "username": username, "password": password }),
    )
    .context("login request failed")?;

    Ok(AuthUser {
        username: username.to_string(),
        role: extract_role(&body),
    })
}

pub fn register(base_url: &str, request: &RegisterRequest) -> anyhow::Result<AuthUser> {
    let body = post_json(&auth_url(base_url, "register"), request)
        .context("register request failed")?;

    Ok(AuthUser {
        username: request.username.clone(),
        role: extract_role(&body),
    })
}

// role lives at the top level, under data, or under user, depending on
// the server version
fn extract_role(body: &Value) -> String {
    body.get("role")
        .or_else(|| body.get("data").and_then(|data| data.get("role")))
        .or_else(|| body.get("user").and_then(|user| user.get("role")))
        .and_then(Value::as_str)
        .unwrap_or("student")
        .to_string()
}

fn get_json(url: &str) -> anyhow::Result<Value> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => RequestError::Server { status: code },
            other => RequestError::Http(other),
        })
        .context(format!("Failed to send request to {}", url))?;

    let body = response
        .into_json()
        .map_err(RequestError::Io)
        .context("Failed to read response body")?;

    Ok(body)
}

fn post_json(url: &str, payload: &impl Serialize) -> anyhow::Result<Value> {
    let response = ureq::post(url)
        .send_json(payload)
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => RequestError::Server { status: code },
            other => RequestError::Http(other),
        })
        .context(format!("Failed to send request to {}", url))?;

    let body = response
        .into_json()
        .map_err(RequestError::Io)
        .context("Failed to read response body")?;

    Ok(body)
}

fn lessons_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/lessons/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn auth_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

//! Read-only access to the book list and quiz item documents.

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::logger;
use crate::models::{BookTitle, QuizItem};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const BOOKS_SOURCE: &str = "books list";
pub const QUIZ_SOURCE: &str = "quiz questions";

/// Strips a Markdown fence and any chatter around the outermost JSON value.
///
/// Only slices when the first bracket found is `open`; anything else is left
/// for the parser to reject with the right shape error.
fn clean_json_payload(raw: &str, open: char, close: char) -> String {
    let mut cleaned = raw.trim().to_string();

    if cleaned.starts_with("```") {
        let mut lines: Vec<&str> = cleaned.lines().skip(1).collect();
        if lines.last().is_some_and(|line| line.trim_start().starts_with("```")) {
            lines.pop();
        }
        cleaned = lines.join("\n");
    }

    if let Some(start) = cleaned.find(['[', '{'])
        && cleaned[start..].starts_with(open)
        && let Some(end) = cleaned.rfind(close)
        && end > start
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

fn parse_document(raw: &str, source_name: &str) -> Result<Value, QuizError> {
    serde_json::from_str(raw)
        .map_err(|e| QuizError::data_format(source_name, format!("invalid JSON: {}", e)))
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn item_from_value(value: &Value) -> QuizItem {
    let options = value
        .get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .map(|option| option.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    QuizItem {
        question: string_field(value, "question"),
        options,
        correct_answer: string_field(value, "correct_answer"),
        explanation: value
            .get("explanation")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Parses `{"books": [...]}`. A missing `books` array reads as no books.
pub fn parse_book_titles(raw: &str) -> Result<Vec<BookTitle>, QuizError> {
    let doc = parse_document(raw, BOOKS_SOURCE)?;
    if !doc.is_object() {
        return Err(QuizError::data_format(BOOKS_SOURCE, "expected a JSON object"));
    }

    Ok(doc
        .get("books")
        .and_then(Value::as_array)
        .map(|books| {
            books
                .iter()
                .map(|book| BookTitle::new(book.as_str().unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default())
}

/// Parses a JSON array of quiz items. Fields that are missing or of the wrong
/// type become empty rather than failing the batch.
pub fn parse_quiz_items(raw: &str, source_name: &str) -> Result<Vec<QuizItem>, QuizError> {
    items_from_document(parse_document(raw, source_name)?, source_name)
}

/// Like `parse_quiz_items`, but first unwraps a Markdown fence or chatter
/// around the array. Only for text captured from a generator's stdout.
pub fn parse_generator_output(raw: &str, source_name: &str) -> Result<Vec<QuizItem>, QuizError> {
    parse_quiz_items(&clean_json_payload(raw, '[', ']'), source_name)
}

fn items_from_document(doc: Value, source_name: &str) -> Result<Vec<QuizItem>, QuizError> {
    let entries = doc
        .as_array()
        .ok_or_else(|| QuizError::data_format(source_name, "expected a JSON array"))?;
    Ok(entries.iter().map(item_from_value).collect())
}

fn read_source(path: &Path, source_name: &str) -> Result<String, QuizError> {
    fs::read_to_string(path).map_err(|e| {
        logger::log(&format!("Unable to open {}: {}", path.display(), e));
        QuizError::data_format(source_name, e.to_string())
    })
}

pub fn load_quiz_items_from(path: &Path) -> Result<Vec<QuizItem>, QuizError> {
    let raw = read_source(path, QUIZ_SOURCE)?;
    parse_quiz_items(&raw, QUIZ_SOURCE).inspect_err(|e| {
        logger::log(&format!("Invalid quiz file {}: {}", path.display(), e));
    })
}

#[derive(Debug, Clone)]
pub struct QuizRepository {
    books_path: PathBuf,
    items_path: PathBuf,
}

impl QuizRepository {
    pub fn new(books_path: impl Into<PathBuf>, items_path: impl Into<PathBuf>) -> Self {
        Self {
            books_path: books_path.into(),
            items_path: items_path.into(),
        }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(&config.books_path, &config.quiz_items_path)
    }

    pub fn load_book_titles(&self) -> Result<Vec<BookTitle>, QuizError> {
        let raw = read_source(&self.books_path, BOOKS_SOURCE)?;
        let titles = parse_book_titles(&raw).inspect_err(|e| {
            logger::log(&format!("Invalid books file {}: {}", self.books_path.display(), e));
        })?;
        logger::log(&format!("Loaded {} book titles", titles.len()));
        Ok(titles)
    }

    pub fn load_quiz_items(&self) -> Result<Vec<QuizItem>, QuizError> {
        load_quiz_items_from(&self.items_path)
    }
}

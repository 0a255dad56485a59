use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizItem {
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer: correct_answer.into(),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BookTitle(String);

impl BookTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookTitle {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for BookTitle {
    fn from(title: String) -> Self {
        Self(title)
    }
}

impl fmt::Display for BookTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The record of one quiz attempt.
///
/// `answers.len() == current_index` at all times, so a session is finished
/// exactly when every item has an answer. Only the scoring module appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) title: BookTitle,
    pub(crate) items: Vec<QuizItem>,
    pub(crate) current_index: usize,
    pub(crate) answers: Vec<Option<String>>,
    pub(crate) score: usize,
}

impl Session {
    pub fn new(title: BookTitle, items: Vec<QuizItem>) -> Self {
        Self {
            title,
            items,
            current_index: 0,
            answers: Vec::new(),
            score: 0,
        }
    }

    pub fn title(&self) -> &BookTitle {
        &self.title
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_item(&self) -> Option<&QuizItem> {
        self.items.get(self.current_index)
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.items.len()
    }
}

/// Identity of one generation invocation, used to drop stale completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub request_id: RequestId,
    pub title: BookTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub request_id: RequestId,
    pub result: Result<Vec<QuizItem>, QuizError>,
}

/// Token for a running book-list refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest;

#[derive(Debug)]
pub enum WorkerRequest {
    Generate(GenerationRequest),
    RefreshBooks(RefreshRequest),
}

#[derive(Debug)]
pub enum WorkerResponse {
    Generated(GenerationOutcome),
    BooksRefreshed(Result<(), QuizError>),
}

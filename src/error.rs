//! Error type shared by the repository, generation, and controller layers.

use thiserror::Error;

const CONNECTIVITY_HINT: &str =
    "Failed to generate quiz questions. Check your internet connection and try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuizError {
    /// A JSON source was unreadable or not shaped like the document we expect.
    #[error("{source_name}: {detail}")]
    DataFormat { source_name: String, detail: String },
    #[error("no book selected")]
    NoSelection,
    /// The external generator failed or produced output we could not use.
    #[error("quiz generation failed: {0}")]
    Generation(String),
    #[error("quiz generation produced no questions")]
    EmptyResult,
    #[error("a quiz is already being generated")]
    GenerationInProgress,
    #[error("the book list is already being refreshed")]
    RefreshInProgress,
    #[error("{event} is not accepted while {phase}")]
    NotAccepted {
        event: &'static str,
        phase: &'static str,
    },
}

impl QuizError {
    pub fn data_format(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        QuizError::DataFormat {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    /// Text shown to the reader. Internal detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            QuizError::DataFormat { source_name, .. } => {
                format!("Unable to read {}.", source_name)
            }
            QuizError::NoSelection => "Please select a book.".to_string(),
            QuizError::Generation(_) | QuizError::EmptyResult => CONNECTIVITY_HINT.to_string(),
            QuizError::GenerationInProgress => "Still generating quiz questions...".to_string(),
            QuizError::RefreshInProgress => "Book list update already running.".to_string(),
            QuizError::NotAccepted { .. } => "That action is not available right now.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_errors_suggest_connectivity() {
        let failed = QuizError::Generation("exit status 1".to_string());
        assert_eq!(failed.user_message(), CONNECTIVITY_HINT);
        assert_eq!(QuizError::EmptyResult.user_message(), CONNECTIVITY_HINT);
    }

    #[test]
    fn test_data_format_message_names_source() {
        let err = QuizError::data_format("books list", "expected a JSON object");
        assert_eq!(err.user_message(), "Unable to read books list.");
        assert_eq!(err.to_string(), "books list: expected a JSON object");
    }

    #[test]
    fn test_not_accepted_display() {
        let err = QuizError::NotAccepted {
            event: "submit",
            phase: "generating",
        };
        assert_eq!(err.to_string(), "submit is not accepted while generating");
    }
}

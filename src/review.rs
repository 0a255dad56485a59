//! Read-only annotation of a finished session for the review walk.

use crate::models::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    Correct,
    IncorrectSelected,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedOption {
    pub text: String,
    pub role: OptionRole,
    /// The reader picked this option.
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub index: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<AnnotatedOption>,
    pub answer: Option<String>,
    pub explanation: String,
}

impl ReviewCard {
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

pub fn annotate(session: &Session, index: usize) -> Option<ReviewCard> {
    let item = session.items().get(index)?;
    let answer = session.answers().get(index).cloned().flatten();
    let correct = item.correct_answer.as_str();

    let options = item
        .options
        .iter()
        .map(|text| {
            let selected = answer.as_deref() == Some(text.as_str());
            let role = if text == correct {
                OptionRole::Correct
            } else if selected {
                OptionRole::IncorrectSelected
            } else {
                OptionRole::Plain
            };
            AnnotatedOption {
                text: text.clone(),
                role,
                selected,
            }
        })
        .collect();

    Some(ReviewCard {
        index,
        total: session.len(),
        question: item.question.clone(),
        options,
        answer,
        explanation: item.explanation.clone().unwrap_or_default(),
    })
}

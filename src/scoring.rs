//! Answer recording and scoring. Everything here is a pure function of the
//! session it is given.

use crate::models::{QuizItem, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub answer: Option<String>,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
}

impl ScoreSummary {
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 * 100.0 / self.total as f32
        }
    }
}

/// An empty or missing answer never counts, even against an empty correct answer.
pub fn is_correct(item: &QuizItem, answer: Option<&str>) -> bool {
    matches!(answer, Some(a) if !a.is_empty() && a == item.correct_answer)
}

/// Maps an option index to its text; `None` for no choice or an index past the options.
pub fn resolve_selection(item: &QuizItem, choice: Option<usize>) -> Option<String> {
    choice.and_then(|i| item.options.get(i)).cloned()
}

/// Records the answer for the current question and advances the cursor.
///
/// A session that is already past its last item comes back unchanged.
pub fn record_answer(mut session: Session, choice: Option<usize>) -> Session {
    let Some(item) = session.items.get(session.current_index) else {
        return session;
    };

    let chosen = resolve_selection(item, choice);
    if is_correct(item, chosen.as_deref()) {
        session.score += 1;
    }
    session.answers.push(chosen);
    session.current_index += 1;
    session
}

pub fn score_answers(items: &[QuizItem], answers: &[Option<String>]) -> usize {
    items
        .iter()
        .zip(answers)
        .filter(|(item, answer)| is_correct(item, answer.as_deref()))
        .count()
}

pub fn question_results(session: &Session) -> Vec<QuestionResult> {
    session
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let answer = session.answers.get(index).cloned().flatten();
            QuestionResult {
                index,
                correct: is_correct(item, answer.as_deref()),
                answer,
            }
        })
        .collect()
}

pub fn summarize(session: &Session) -> ScoreSummary {
    ScoreSummary {
        correct: session.score,
        total: session.items.len(),
    }
}

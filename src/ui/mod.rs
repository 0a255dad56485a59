pub mod layout;
mod books;
mod quiz;
mod review;
mod summary;

pub use books::{draw_book_selection, draw_error, draw_generating};
pub use layout::{calculate_quiz_chunks, calculate_summary_chunks};
pub use quiz::draw_quiz;
pub use review::draw_review;
pub use summary::draw_summary;

use crate::controller::{QuizState, SessionController};
use crate::input::UiCursor;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}

fn help_bar(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn header(title: &str) -> Paragraph<'static> {
    Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

/// Draws whichever screen the controller is on.
pub fn draw(f: &mut Frame, controller: &SessionController, cursor: &UiCursor) {
    match controller.state() {
        QuizState::BookSelection {
            books,
            status,
            refreshing,
        } => draw_book_selection(f, books, status.as_ref(), *refreshing, cursor.book_index),
        QuizState::Generating { request } => draw_generating(f, request),
        QuizState::Answering { session } => draw_quiz(f, session, cursor.option_index),
        QuizState::Finished { session } => draw_summary(f, session),
        QuizState::Reviewing { .. } => {
            if let Some(card) = controller.review_card() {
                draw_review(f, &card);
            }
        }
        QuizState::Error { message, recovery } => draw_error(f, message, *recovery),
        QuizState::Closed => {}
    }
}

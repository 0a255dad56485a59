use crate::models::Session;
use crate::scoring::{question_results, summarize};
use crate::ui::layout::calculate_summary_chunks;
use crate::ui::{header, help_bar, key_hint};
use crate::utils::truncate_string;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_summary(f: &mut Frame, session: &Session) {
    let layout = calculate_summary_chunks(f.area());
    f.render_widget(
        header(&format!("Quiz Complete - {}", session.title())),
        layout.header_area,
    );

    let score = summarize(session);
    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        format!(
            "Score: {} / {} ({:.0}%)",
            score.correct,
            score.total,
            score.percentage()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(""));

    let width = layout.content_area.width.saturating_sub(8) as usize;
    for result in question_results(session) {
        let (mark, color) = if result.correct {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        let question = session
            .items()
            .get(result.index)
            .map(|item| item.question.as_str())
            .unwrap_or_default();
        text.push_line(Line::from(vec![
            Span::styled(format!("[{}] ", mark), Style::default().fg(color)),
            Span::from(truncate_string(
                &format!("{}. {}", result.index + 1, question),
                width,
            )),
        ]));
        let answer = result.answer.as_deref().unwrap_or("(no answer)");
        text.push_line(Line::from(format!(
            "    Your Answer: {}",
            truncate_string(answer, width.saturating_sub(13))
        )));
    }

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.content_area);

    let mut spans = Vec::new();
    spans.extend(key_hint("Enter", " Review Answers  "));
    spans.extend(key_hint("Esc", " Quit"));
    f.render_widget(help_bar(vec![Line::from(spans)]), layout.footer_area);
}

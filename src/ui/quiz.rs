use crate::models::Session;
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{help_bar, key_hint};
use crate::utils::numbered;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_quiz(f: &mut Frame, session: &Session, highlighted: Option<usize>) {
    let Some(item) = session.current_item() else {
        return;
    };
    let layout = calculate_quiz_chunks(f.area());

    let progress = format!(
        "Question {} / {} - {}",
        session.current_index() + 1,
        session.len(),
        session.title()
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question = Paragraph::new(Text::from(item.question.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let mut options = Text::default();
    for (i, option) in item.options.iter().enumerate() {
        let line = if highlighted == Some(i) {
            Line::from(Span::styled(
                format!("> {}", numbered(i, option)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(format!("  {}", numbered(i, option)))
        };
        options.push_line(line);
    }
    let answers = Paragraph::new(options)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(answers, layout.answer_area);

    let mut spans = Vec::new();
    spans.extend(key_hint("↑/↓", " Choose  "));
    spans.extend(key_hint("1-9", " Pick  "));
    spans.extend(key_hint("Enter", " Submit  "));
    spans.extend(key_hint("Esc", " Quit"));
    f.render_widget(help_bar(vec![Line::from(spans)]), layout.help_area);
}

use crate::review::{OptionRole, ReviewCard};
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{help_bar, key_hint};
use crate::utils::{numbered, render_explanation};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn option_style(role: OptionRole) -> Style {
    match role {
        OptionRole::Correct => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        OptionRole::IncorrectSelected => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        OptionRole::Plain => Style::default(),
    }
}

pub fn draw_review(f: &mut Frame, card: &ReviewCard) {
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new(format!("Review {} / {}", card.index + 1, card.total))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question = Paragraph::new(card.question.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let mut text = Text::default();
    for (i, option) in card.options.iter().enumerate() {
        let marker = if option.selected { "> " } else { "  " };
        text.push_line(Line::from(Span::styled(
            format!("{}{}", marker, numbered(i, &option.text)),
            option_style(option.role),
        )));
    }
    if card.answer.is_none() {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Not answered",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    if !card.explanation.is_empty() {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Explanation:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.extend(render_explanation(&card.explanation));
    }
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Answers"));
    f.render_widget(body, layout.answer_area);

    let next_label = if card.is_last() { " Finish  " } else { " Next  " };
    let mut spans = Vec::new();
    spans.extend(key_hint("Enter", next_label));
    spans.extend(key_hint("Esc", " Quit"));
    f.render_widget(help_bar(vec![Line::from(spans)]), layout.help_area);
}

use crate::controller::{ErrorRecovery, StatusKind, StatusMessage};
use crate::models::{BookTitle, GenerationRequest};
use crate::ui::layout::calculate_summary_chunks;
use crate::ui::{header, help_bar, key_hint};
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw_book_selection(
    f: &mut Frame,
    books: &[BookTitle],
    status: Option<&StatusMessage>,
    refreshing: bool,
    selected: usize,
) {
    let layout = calculate_summary_chunks(f.area());
    f.render_widget(header("Book Quiz"), layout.header_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(layout.content_area);

    let width = chunks[0].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if books.is_empty() {
        vec![ListItem::new("No books found").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        books
            .iter()
            .map(|title| ListItem::new(truncate_string(title.as_str(), width)))
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Select a book"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !books.is_empty() {
        state.select(Some(selected.min(books.len() - 1)));
    }
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(status) = status {
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        let line = Paragraph::new(status.text.as_str())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center);
        f.render_widget(line, chunks[1]);
    }

    let mut spans = Vec::new();
    spans.extend(key_hint("↑/↓", " Navigate  "));
    spans.extend(key_hint("Enter", " Generate Quiz  "));
    if refreshing {
        spans.push(Span::styled(
            "Updating books...  ",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.extend(key_hint("r", " Update Books  "));
    }
    spans.extend(key_hint("Esc", " Quit"));
    f.render_widget(help_bar(vec![Line::from(spans)]), layout.footer_area);
}

pub fn draw_generating(f: &mut Frame, request: &GenerationRequest) {
    let layout = calculate_summary_chunks(f.area());
    f.render_widget(header("Book Quiz"), layout.header_area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Generating quiz questions...",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(request.title.as_str().to_string()),
    ];
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.content_area);

    f.render_widget(
        help_bar(vec![Line::from(key_hint("Esc", " Cancel and Quit").to_vec())]),
        layout.footer_area,
    );
}

pub fn draw_error(f: &mut Frame, message: &str, recovery: ErrorRecovery) {
    let layout = calculate_summary_chunks(f.area());
    let title = Paragraph::new("Error")
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.content_area);

    let label = match recovery {
        ErrorRecovery::BookSelection => " Back to Books",
        ErrorRecovery::Close => " Quit",
    };
    f.render_widget(
        help_bar(vec![Line::from(key_hint("Enter", label).to_vec())]),
        layout.footer_area,
    );
}

use lazy_static::lazy_static;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static! {
    static ref NUMBERED_ITEM: Option<Regex> = Regex::new(r"^(\d+)[.)]\s+(.*)$").ok();
    static ref INLINE: Option<Regex> =
        Regex::new(r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>[^*\s][^*]*?)\*|`(?P<code>[^`]+)`").ok();
}

/// Renders a generated explanation for the review screen.
/// Generators sometimes answer in light Markdown, so this understands
/// **bold**, *italic*, `code`, headings and bulleted or numbered lists.
/// Anything else passes through as plain text.
pub fn render_explanation(content: &str) -> Vec<Line<'static>> {
    content.lines().map(render_line).collect()
}

fn render_line(line: &str) -> Line<'static> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::from("");
    }

    let heading = trimmed.trim_start_matches('#');
    if heading.len() < trimmed.len() && heading.starts_with(' ') {
        return Line::from(Span::styled(
            heading.trim().to_string(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    }

    if let Some(item) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        let mut spans = vec![Span::from("  • ")];
        spans.extend(parse_inline(item));
        return Line::from(spans);
    }

    if let Some(re) = NUMBERED_ITEM.as_ref()
        && let Some(caps) = re.captures(trimmed)
        && let (Some(num), Some(item)) = (caps.get(1), caps.get(2))
    {
        let mut spans = vec![Span::from(format!("  {}. ", num.as_str()))];
        spans.extend(parse_inline(item.as_str()));
        return Line::from(spans);
    }

    Line::from(parse_inline(line))
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let Some(re) = INLINE.as_ref() else {
        return vec![Span::from(text.to_string())];
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }

        let (content, modifier) = if let Some(bold) = caps.name("bold") {
            (bold.as_str(), Modifier::BOLD)
        } else if let Some(italic) = caps.name("italic") {
            (italic.as_str(), Modifier::ITALIC)
        } else if let Some(code) = caps.name("code") {
            (code.as_str(), Modifier::DIM)
        } else {
            (whole.as_str(), Modifier::empty())
        };
        spans.push(Span::styled(
            content.to_string(),
            Style::default().add_modifier(modifier),
        ));
        last = whole.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::from(text[last..].to_string()));
    }
    spans
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::input::Input;

/// Splits a screen into header, body and footer rows.
pub(in crate::tui_shell) fn split(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

pub(in crate::tui_shell) fn render_header(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    loading: bool,
    filter: Option<&Input>,
) {
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("loading…", Style::default().fg(Color::Cyan)));
    }
    let prefix_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    if let Some(input) = filter {
        spans.push(Span::raw("  "));
        if input.buf.is_empty() {
            spans.push(Span::styled(
                "Search...",
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            ));
        } else {
            spans.push(Span::raw(input.buf.clone()));
        }
        let x = area.x + (prefix_len + 2) as u16 + input.cursor_col();
        if x < area.x + area.width {
            frame.set_cursor_position((x, area.y));
        }
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

pub(in crate::tui_shell) fn render_footer(
    frame: &mut ratatui::Frame,
    area: Rect,
    label: &str,
    hints: &[(&str, &str)],
) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
        inner,
    );

    let mut spans = Vec::new();
    for (i, (key, what)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(what.to_string(), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Right),
        inner,
    );
}

/// Header and footer around an empty body, shown while a command runs.
pub(in crate::tui_shell) fn render_loading(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    label: &str,
) {
    let (header, _, footer) = split(area);
    render_header(frame, header, title, true, None);
    render_footer(frame, footer, label, &[("esc", "back")]);
}

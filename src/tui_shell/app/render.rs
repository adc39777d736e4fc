use super::*;

/// Centers the top screen in a rounded border sized to the content area.
pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(top) = app.top() else {
        return;
    };

    let (w, h) = app.content_size();
    let outer = centered(area, w.saturating_add(2), h.saturating_add(2));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(outer);
    frame.render_widget(block, outer);
    top.render(frame, inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

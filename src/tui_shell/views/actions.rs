use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use crate::model::Action;

use super::super::keys;

/// Index of the action bound to `key`: an explicit shortcut wins, otherwise enter
/// runs the first action.
pub(in crate::tui_shell) fn action_for_key(actions: &[Action], key: &KeyEvent) -> Option<usize> {
    if let Some(i) = actions
        .iter()
        .position(|a| a.shortcut.as_deref().is_some_and(|s| keys::matches(s, key)))
    {
        return Some(i);
    }
    if key.code == KeyCode::Enter && key.modifiers == KeyModifiers::NONE && !actions.is_empty() {
        return Some(0);
    }
    None
}

pub(in crate::tui_shell) enum PanelOutcome {
    None,
    Close,
    Chosen(usize),
}

/// Overlay listing every action of the focused item (toggled with tab).
#[derive(Debug, Default)]
pub(in crate::tui_shell) struct ActionPanel {
    pub(in crate::tui_shell) open: bool,
    selected: usize,
}

impl ActionPanel {
    pub(in crate::tui_shell) fn toggle(&mut self, actions: &[Action]) {
        self.open = !self.open && !actions.is_empty();
        self.selected = 0;
    }

    pub(in crate::tui_shell) fn close(&mut self) {
        self.open = false;
        self.selected = 0;
    }

    pub(in crate::tui_shell) fn handle_key(
        &mut self,
        key: KeyEvent,
        actions: &[Action],
    ) -> PanelOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => PanelOutcome::Close,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PanelOutcome::None
            }
            KeyCode::Down => {
                if self.selected + 1 < actions.len() {
                    self.selected += 1;
                }
                PanelOutcome::None
            }
            KeyCode::Enter if !actions.is_empty() => {
                PanelOutcome::Chosen(self.selected.min(actions.len() - 1))
            }
            _ => match action_for_key(actions, &key) {
                Some(i) => PanelOutcome::Chosen(i),
                None => PanelOutcome::None,
            },
        }
    }

    pub(in crate::tui_shell) fn render(
        &self,
        frame: &mut ratatui::Frame,
        area: Rect,
        actions: &[Action],
    ) {
        if !self.open || actions.is_empty() {
            return;
        }
        let rows: Vec<ListItem> = actions
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let shortcut = match (i, a.shortcut.as_deref()) {
                    (_, Some(s)) => s.to_string(),
                    (0, None) => "enter".to_string(),
                    _ => String::new(),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(a.title().to_string()),
                    Span::raw("  "),
                    Span::styled(shortcut, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let width = actions
            .iter()
            .map(|a| a.title().chars().count() + 16)
            .max()
            .unwrap_or(20)
            .min(area.width as usize) as u16;
        let height = (actions.len() as u16 + 2).min(area.height);
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y + area.height.saturating_sub(height),
            width,
            height,
        };

        let mut state = ListState::default();
        state.select(Some(self.selected.min(actions.len() - 1)));
        frame.render_widget(Clear, rect);
        frame.render_stateful_widget(
            List::new(rows)
                .block(Block::default().borders(Borders::ALL).title("Actions"))
                .highlight_style(Style::default().bg(Color::DarkGray)),
            rect,
            &mut state,
        );
    }
}

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem as ListRow, ListState, Paragraph, Wrap};

use crate::model::{Action, ListItem, Preview, PreviewSpec};

use super::super::input::Input;
use super::super::keys;
use super::super::suggest::filter_indices;
use super::actions::{ActionPanel, PanelOutcome, action_for_key};
use super::chrome;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum PreviewState {
    Pending,
    Ready(String),
}

#[derive(Debug)]
pub(in crate::tui_shell) enum ListEvent {
    None,
    Back,
    Trigger { item_id: String, action: Action },
    SelectionChanged,
    QueryChanged,
}

#[derive(Debug)]
pub(in crate::tui_shell) struct ListView {
    pub(in crate::tui_shell) title: String,
    pub(in crate::tui_shell) footer: String,
    items: Vec<ListItem>,
    filtered: Vec<usize>,
    selected: usize,
    filter: Input,
    pub(in crate::tui_shell) show_preview: bool,
    empty_text: Option<String>,
    previews: HashMap<String, PreviewState>,
    panel: ActionPanel,
    pub(in crate::tui_shell) loading: bool,
}

impl ListView {
    pub(in crate::tui_shell) fn new(title: &str, footer: &str) -> Self {
        Self {
            title: title.to_string(),
            footer: footer.to_string(),
            items: Vec::new(),
            filtered: Vec::new(),
            selected: 0,
            filter: Input::default(),
            show_preview: false,
            empty_text: None,
            previews: HashMap::new(),
            panel: ActionPanel::default(),
            loading: false,
        }
    }

    /// Replaces the items. Items are expected to carry ids; cached previews are dropped.
    pub(in crate::tui_shell) fn set_items(&mut self, items: Vec<ListItem>) {
        self.items = items;
        self.previews.clear();
        self.panel.close();
        self.refilter();
    }

    pub(in crate::tui_shell) fn set_empty_text(&mut self, text: Option<String>) {
        self.empty_text = text.filter(|t| !t.is_empty());
    }

    #[cfg(test)]
    pub(in crate::tui_shell) fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Items that pass the current filter, in display order.
    pub(in crate::tui_shell) fn visible(&self) -> impl Iterator<Item = &ListItem> {
        self.filtered.iter().map(|&i| &self.items[i])
    }

    pub(in crate::tui_shell) fn selected_item(&self) -> Option<&ListItem> {
        self.filtered
            .get(self.selected)
            .and_then(|&i| self.items.get(i))
    }

    pub(in crate::tui_shell) fn query(&self) -> &str {
        &self.filter.buf
    }

    #[cfg(test)]
    pub(in crate::tui_shell) fn preview_state(&self, item_id: &str) -> Option<&PreviewState> {
        self.previews.get(item_id)
    }

    /// Stores preview text for an item. The latest result for an id wins; results for
    /// ids no longer listed are refused.
    pub(in crate::tui_shell) fn set_preview(&mut self, item_id: String, text: String) -> bool {
        if !self
            .items
            .iter()
            .any(|item| item.id.as_deref() == Some(item_id.as_str()))
        {
            return false;
        }
        self.previews.insert(item_id, PreviewState::Ready(text));
        true
    }

    /// Claims the preview of the selected item when it still has to be fetched.
    pub(in crate::tui_shell) fn take_preview_request(&mut self) -> Option<(String, PreviewSpec)> {
        if !self.show_preview {
            return None;
        }
        let item = self.selected_item()?;
        let Some(Preview::Command(spec)) = &item.preview else {
            return None;
        };
        let id = item.id.clone()?;
        if self.previews.contains_key(&id) {
            return None;
        }
        let spec = spec.clone();
        self.previews.insert(id.clone(), PreviewState::Pending);
        Some((id, spec))
    }

    fn refilter(&mut self) {
        self.filtered = filter_indices(
            &self.filter.buf,
            self.items
                .iter()
                .map(|i| (i.title.as_str(), i.subtitle.as_deref())),
        );
        self.selected = self.selected.min(self.filtered.len().saturating_sub(1));
    }

    fn selected_actions(&self) -> &[Action] {
        self.selected_item()
            .map(|i| i.actions.as_slice())
            .unwrap_or(&[])
    }

    fn trigger(&mut self, index: usize) -> ListEvent {
        self.panel.close();
        let Some(item) = self.selected_item() else {
            return ListEvent::None;
        };
        match (item.id.clone(), item.actions.get(index)) {
            (Some(item_id), Some(action)) => ListEvent::Trigger {
                item_id,
                action: action.clone(),
            },
            _ => ListEvent::None,
        }
    }

    pub(in crate::tui_shell) fn move_up(&mut self) -> ListEvent {
        if self.selected == 0 {
            return ListEvent::None;
        }
        self.selected -= 1;
        ListEvent::SelectionChanged
    }

    pub(in crate::tui_shell) fn move_down(&mut self) -> ListEvent {
        if self.selected + 1 >= self.filtered.len() {
            return ListEvent::None;
        }
        self.selected += 1;
        ListEvent::SelectionChanged
    }

    pub(in crate::tui_shell) fn handle_key(&mut self, key: KeyEvent) -> ListEvent {
        if self.panel.open {
            let actions = self.selected_actions().to_vec();
            return match self.panel.handle_key(key, &actions) {
                PanelOutcome::None => ListEvent::None,
                PanelOutcome::Close => {
                    self.panel.close();
                    ListEvent::None
                }
                PanelOutcome::Chosen(i) => self.trigger(i),
            };
        }

        match key.code {
            KeyCode::Tab => {
                let actions = self.selected_actions().to_vec();
                self.panel.toggle(&actions);
                return ListEvent::None;
            }
            KeyCode::Esc => {
                if self.filter.buf.is_empty() {
                    return ListEvent::Back;
                }
                self.filter.clear();
                self.refilter();
                self.selected = 0;
                return ListEvent::QueryChanged;
            }
            KeyCode::Up => return self.move_up(),
            KeyCode::Down => return self.move_down(),
            _ => {}
        }
        if keys::is_ctrl(&key, 'p') || keys::is_ctrl(&key, 'k') {
            return self.move_up();
        }
        if keys::is_ctrl(&key, 'n') || keys::is_ctrl(&key, 'j') {
            return self.move_down();
        }

        if keys::is_command_key(&key)
            && let Some(i) = action_for_key(self.selected_actions(), &key)
        {
            return self.trigger(i);
        }

        match key.code {
            KeyCode::Backspace => self.filter.backspace(),
            KeyCode::Delete => self.filter.delete(),
            KeyCode::Left => {
                self.filter.move_left();
                return ListEvent::None;
            }
            KeyCode::Right => {
                self.filter.move_right();
                return ListEvent::None;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.filter.insert_char(c)
            }
            _ => return ListEvent::None,
        }
        self.selected = 0;
        self.refilter();
        ListEvent::QueryChanged
    }

    fn preview_text(&self, item: &ListItem) -> String {
        match &item.preview {
            None => String::new(),
            Some(Preview::Text { text }) => text.clone(),
            Some(Preview::Command(_)) => match item.id.as_deref().and_then(|id| self.previews.get(id)) {
                Some(PreviewState::Ready(text)) => text.clone(),
                Some(PreviewState::Pending) | None => "loading…".to_string(),
            },
        }
    }

    pub(in crate::tui_shell) fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let (header, body, footer) = chrome::split(area);
        chrome::render_header(frame, header, &self.title, self.loading, Some(&self.filter));

        let (list_area, preview_area) = if self.show_preview {
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(body);
            (parts[0], Some(parts[1]))
        } else {
            (body, None)
        };

        if self.filtered.is_empty() {
            let text = self.empty_text.as_deref().unwrap_or("No items");
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray)))
                    .alignment(ratatui::layout::Alignment::Center),
                list_area,
            );
        } else {
            let rows: Vec<ListRow> = self
                .visible()
                .map(|item| {
                    let mut spans = vec![Span::raw(item.title.clone())];
                    if let Some(sub) = &item.subtitle {
                        spans.push(Span::raw("  "));
                        spans.push(Span::styled(sub.clone(), Style::default().fg(Color::Gray)));
                    }
                    for acc in &item.accessories {
                        spans.push(Span::raw("  "));
                        spans.push(Span::styled(acc.clone(), Style::default().fg(Color::Cyan)));
                    }
                    ListRow::new(Line::from(spans))
                })
                .collect();
            let mut state = ListState::default();
            state.select(Some(self.selected));
            frame.render_stateful_widget(
                List::new(rows).highlight_style(Style::default().bg(Color::DarkGray)),
                list_area,
                &mut state,
            );
        }

        if let Some(preview_area) = preview_area {
            let text = self
                .selected_item()
                .map(|item| self.preview_text(item))
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(text)
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::LEFT)),
                preview_area,
            );
        }

        let hints: &[(&str, &str)] = if self.selected_actions().is_empty() {
            &[("esc", "back")]
        } else {
            &[("enter", "run"), ("tab", "actions"), ("esc", "back")]
        };
        chrome::render_footer(frame, footer, &self.footer, hints);
        self.panel.render(frame, body, self.selected_actions());
    }
}

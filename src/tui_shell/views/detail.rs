use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::widgets::{Paragraph, Wrap};

use crate::model::Action;

use super::super::keys;
use super::actions::{ActionPanel, PanelOutcome, action_for_key};
use super::chrome;

#[derive(Debug)]
pub(in crate::tui_shell) enum DetailEvent {
    None,
    Back,
    Trigger(Action),
}

/// Scrollable text with actions. Also used for error screens.
#[derive(Debug)]
pub(in crate::tui_shell) struct DetailView {
    pub(in crate::tui_shell) title: String,
    pub(in crate::tui_shell) footer: String,
    text: String,
    scroll: u16,
    height: u16,
    actions: Vec<Action>,
    panel: ActionPanel,
    pub(in crate::tui_shell) loading: bool,
}

impl DetailView {
    pub(in crate::tui_shell) fn new(title: &str, footer: &str) -> Self {
        Self {
            title: title.to_string(),
            footer: footer.to_string(),
            text: String::new(),
            scroll: 0,
            height: 0,
            actions: Vec::new(),
            panel: ActionPanel::default(),
            loading: false,
        }
    }

    pub(in crate::tui_shell) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.scroll = 0;
    }

    pub(in crate::tui_shell) fn set_actions(&mut self, actions: Vec<Action>) {
        self.actions = actions;
        self.panel.close();
    }

    pub(in crate::tui_shell) fn set_size(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn max_scroll(&self) -> u16 {
        let lines = u16::try_from(self.text.lines().count()).unwrap_or(u16::MAX);
        let body = self.height.saturating_sub(4);
        lines.saturating_sub(body)
    }

    pub(in crate::tui_shell) fn handle_key(&mut self, key: KeyEvent) -> DetailEvent {
        if self.panel.open {
            return match self.panel.handle_key(key, &self.actions) {
                PanelOutcome::None => DetailEvent::None,
                PanelOutcome::Close => {
                    self.panel.close();
                    DetailEvent::None
                }
                PanelOutcome::Chosen(i) => {
                    self.panel.close();
                    DetailEvent::Trigger(self.actions[i].clone())
                }
            };
        }

        let page = self.height.saturating_sub(4).max(1);
        match key.code {
            KeyCode::Esc => return DetailEvent::Back,
            KeyCode::Tab => {
                self.panel.toggle(&self.actions);
                return DetailEvent::None;
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1).min(self.max_scroll()),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(page),
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(page).min(self.max_scroll())
            }
            _ if keys::is_ctrl(&key, 'k') => self.scroll = self.scroll.saturating_sub(1),
            _ if keys::is_ctrl(&key, 'j') => {
                self.scroll = self.scroll.saturating_add(1).min(self.max_scroll())
            }
            _ => {
                if let Some(i) = action_for_key(&self.actions, &key) {
                    return DetailEvent::Trigger(self.actions[i].clone());
                }
            }
        }
        DetailEvent::None
    }

    pub(in crate::tui_shell) fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let (header, body, footer) = chrome::split(area);
        chrome::render_header(frame, header, &self.title, self.loading, None);
        frame.render_widget(
            Paragraph::new(self.text.as_str())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            body,
        );
        let hints: &[(&str, &str)] = if self.actions.is_empty() {
            &[("esc", "back")]
        } else {
            &[("enter", "run"), ("tab", "actions"), ("esc", "back")]
        };
        chrome::render_footer(frame, footer, &self.footer, hints);
        self.panel.render(frame, body, &self.actions);
    }
}

#[cfg(test)]
#[path = "../../tests/tui_shell/views/detail_tests.rs"]
mod tests;

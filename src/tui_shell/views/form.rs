use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::{Map, Value};

use crate::model::{FormInput, FormInputKind};

use super::super::input::Input;
use super::super::keys;
use super::chrome;

#[derive(Debug, Clone)]
pub(in crate::tui_shell) struct FormField {
    pub(in crate::tui_shell) name: String,
    pub(in crate::tui_shell) title: String,
    pub(in crate::tui_shell) kind: FormInputKind,
    placeholder: Option<String>,
    label: Option<String>,
    pub(in crate::tui_shell) input: Input,
    pub(in crate::tui_shell) checked: bool,
}

impl FormField {
    pub(in crate::tui_shell) fn new(name: &str, spec: &FormInput) -> Self {
        let (text, checked) = match &spec.default {
            Some(Value::String(s)) => (s.clone(), false),
            Some(Value::Bool(b)) => (String::new(), *b),
            Some(Value::Null) | None => (String::new(), false),
            Some(other) => (other.to_string(), false),
        };
        Self {
            name: name.to_string(),
            title: spec.title.clone().unwrap_or_else(|| name.to_string()),
            kind: spec.kind,
            placeholder: spec.placeholder.clone(),
            label: spec.label.clone(),
            input: Input::with_value(&text),
            checked,
        }
    }

    pub(in crate::tui_shell) fn value(&self) -> Value {
        match self.kind {
            FormInputKind::Checkbox => Value::Bool(self.checked),
            FormInputKind::Textfield | FormInputKind::Textarea => {
                Value::String(self.input.buf.clone())
            }
        }
    }

    fn height(&self) -> u16 {
        match self.kind {
            FormInputKind::Textarea => 5,
            FormInputKind::Textfield | FormInputKind::Checkbox => 3,
        }
    }
}

#[derive(Debug)]
pub(in crate::tui_shell) enum FormEvent {
    None,
    Cancel,
    Submit(Map<String, Value>),
}

/// Prompts for the params a command run is still missing.
#[derive(Debug)]
pub(in crate::tui_shell) struct FormView {
    pub(in crate::tui_shell) title: String,
    pub(in crate::tui_shell) footer: String,
    pub(in crate::tui_shell) fields: Vec<FormField>,
    focus: usize,
}

impl FormView {
    pub(in crate::tui_shell) fn new(title: &str, footer: &str, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            footer: footer.to_string(),
            fields,
            focus: 0,
        }
    }

    fn submit(&self) -> FormEvent {
        let values = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value()))
            .collect();
        FormEvent::Submit(values)
    }

    fn next(&mut self) {
        if self.focus + 1 < self.fields.len() {
            self.focus += 1;
        }
    }

    fn prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub(in crate::tui_shell) fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if keys::is_ctrl(&key, 's') {
            return self.submit();
        }
        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Tab | KeyCode::Down => self.next(),
            KeyCode::BackTab | KeyCode::Up => self.prev(),
            _ => {}
        }
        let last = self.fields.len().saturating_sub(1);
        let focus = self.focus;
        let Some(field) = self.fields.get_mut(focus) else {
            return FormEvent::None;
        };
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return FormEvent::None;
        }
        match (field.kind, key.code) {
            (FormInputKind::Textarea, KeyCode::Enter) => field.input.insert_char('\n'),
            (_, KeyCode::Enter) => {
                if focus == last {
                    return self.submit();
                }
                self.next();
            }
            (FormInputKind::Checkbox, KeyCode::Char(' ')) => field.checked = !field.checked,
            (FormInputKind::Checkbox, _) => {}
            (_, KeyCode::Char(c)) => field.input.insert_char(c),
            (_, KeyCode::Backspace) => field.input.backspace(),
            (_, KeyCode::Delete) => field.input.delete(),
            (_, KeyCode::Left) => field.input.move_left(),
            (_, KeyCode::Right) => field.input.move_right(),
            _ => {}
        }
        FormEvent::None
    }

    pub(in crate::tui_shell) fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let (header, body, footer) = chrome::split(area);
        chrome::render_header(frame, header, &self.title, false, None);

        let mut constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|f| Constraint::Length(f.height()))
            .collect();
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(body);

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let border = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(field.title.clone());
            let content = match field.kind {
                FormInputKind::Checkbox => {
                    let mark = if field.checked { "[x]" } else { "[ ]" };
                    Line::from(format!("{} {}", mark, field.label.as_deref().unwrap_or("")))
                }
                FormInputKind::Textfield | FormInputKind::Textarea => {
                    if field.input.buf.is_empty() {
                        Line::from(Span::styled(
                            field.placeholder.clone().unwrap_or_default(),
                            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
                        ))
                    } else {
                        Line::from(field.input.buf.clone())
                    }
                }
            };
            let inner = block.inner(rows[i]);
            frame.render_widget(
                Paragraph::new(content).wrap(Wrap { trim: false }).block(block),
                rows[i],
            );
            if focused && field.kind == FormInputKind::Textfield {
                frame.set_cursor_position((inner.x + field.input.cursor_col(), inner.y));
            }
        }

        chrome::render_footer(
            frame,
            footer,
            &self.footer,
            &[("ctrl+s", "submit"), ("tab", "next"), ("esc", "back")],
        );
    }
}

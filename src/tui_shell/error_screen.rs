use std::any::Any;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use super::event::{Effect, ScreenId};
use super::view::Screen;
use super::views::{DetailEvent, DetailView};

/// Full-screen error detail that takes the place of the failed screen.
pub(super) struct ErrorScreen {
    id: ScreenId,
    detail: DetailView,
}

impl ErrorScreen {
    pub(super) fn new(message: &str) -> Self {
        let mut detail = DetailView::new("Error", "esc to go back");
        detail.set_text(message);
        Self {
            id: ScreenId::next(),
            detail,
        }
    }
}

impl Screen for ErrorScreen {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn id(&self) -> ScreenId {
        self.id
    }

    fn title(&self) -> &str {
        &self.detail.title
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.detail.set_size(width, height);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match self.detail.handle_key(key) {
            DetailEvent::Back => vec![Effect::Pop],
            DetailEvent::Trigger(_) | DetailEvent::None => Vec::new(),
        }
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        self.detail.render(frame, area);
    }
}

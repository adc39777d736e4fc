use std::any::Any;
use std::collections::BTreeMap;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::model::CommandInput;

use super::event::{Effect, ScreenId, TaskOutcome};

/// One entry of the navigation stack.
pub(super) trait Screen: Any {
    fn as_any(&self) -> &dyn Any;

    fn id(&self) -> ScreenId;
    fn title(&self) -> &str;

    fn set_size(&mut self, width: u16, height: u16);

    /// Called once, after the screen is sized and stacked.
    fn init(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect>;

    fn handle_task(&mut self, _generation: u64, _outcome: TaskOutcome) -> Vec<Effect> {
        Vec::new()
    }

    fn reload(&mut self, _with: BTreeMap<String, CommandInput>) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect);
}

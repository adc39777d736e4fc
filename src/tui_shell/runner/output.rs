use tracing::debug;

use crate::model::{self, DetailPage, ListPage, OnSuccess, Page, Preview};

use super::super::event::{Effect, Job, PreviewSlot};
use super::super::views::{DetailView, ListView};
use super::{CommandRunner, RunnerState};

/// Gives items without an id their position in the page.
pub(super) fn with_positional_ids(mut page: ListPage) -> ListPage {
    for (idx, item) in page.items.iter_mut().enumerate() {
        if item.id.as_deref().is_none_or(str::is_empty) {
            item.id = Some(idx.to_string());
        }
    }
    page
}

impl CommandRunner {
    /// Routes a successful dispatch according to the command's success behavior.
    pub(super) fn handle_output(&mut self, output: &[u8]) -> Vec<Effect> {
        match self.command.on_success {
            Some(OnSuccess::PushPage) => match model::parse_page(output) {
                Ok(page) => self.show_page(page),
                Err(err) => vec![Effect::Error(err.to_string())],
            },
            Some(OnSuccess::OpenUrl) => vec![Effect::Open {
                target: String::from_utf8_lossy(output).trim().to_string(),
                application: None,
            }],
            Some(OnSuccess::CopyText) => {
                vec![Effect::Copy(String::from_utf8_lossy(output).into_owned())]
            }
            Some(OnSuccess::ReloadPage) => vec![Effect::Pop, Effect::Reload(Default::default())],
            Some(OnSuccess::Quit) | None => {
                debug!(command = %self.command.name, "command finished, quitting");
                vec![Effect::Quit]
            }
        }
    }

    fn show_page(&mut self, page: Page) -> Vec<Effect> {
        let title = page.title().unwrap_or(self.extension.title()).to_string();
        match page {
            Page::List { list, .. } => self.show_list(title, list),
            Page::Detail { detail, .. } => self.show_detail(title, detail),
        }
    }

    fn show_list(&mut self, title: String, page: ListPage) -> Vec<Effect> {
        let page = with_positional_ids(page);
        let footer = self.footer();
        // Reloads keep the filter and selection of the existing list.
        let mut list = match std::mem::replace(&mut self.state, RunnerState::Loading) {
            RunnerState::List(mut list) => {
                list.title = title;
                list
            }
            _ => ListView::new(&title, &footer),
        };
        list.loading = false;
        list.show_preview = page.show_preview;
        list.set_empty_text(page.empty_text);
        list.set_items(page.items);
        self.state = RunnerState::List(list);
        self.preview_effects()
    }

    fn show_detail(&mut self, title: String, page: DetailPage) -> Vec<Effect> {
        let mut detail = DetailView::new(&title, &self.footer());
        detail.set_actions(page.actions);
        detail.set_size(self.width, self.height);

        let mut effects = Vec::new();
        match page.preview {
            Preview::Text { text } => detail.set_text(text),
            Preview::Command(spec) => {
                detail.loading = true;
                let extension = self.extension.clone();
                let query = self.query.clone();
                effects.push(Effect::Spawn(Job::new(self.id, self.generation, move || {
                    super::preview::resolve(&extension, &spec, &query, PreviewSlot::Detail)
                })));
            }
        }
        self.state = RunnerState::Detail(detail);
        effects
    }

    /// Preview jobs for the selected list item, if it still needs one.
    pub(super) fn preview_effects(&mut self) -> Vec<Effect> {
        let RunnerState::List(list) = &mut self.state else {
            return Vec::new();
        };
        let Some((item_id, spec)) = list.take_preview_request() else {
            return Vec::new();
        };
        let extension = self.extension.clone();
        let query = self.query.clone();
        vec![Effect::Spawn(Job::new(self.id, self.generation, move || {
            super::preview::resolve(&extension, &spec, &query, PreviewSlot::Item(item_id))
        }))]
    }

    /// Applies a preview result to its slot. Previews are not tied to a dispatch
    /// generation: whichever result for a slot arrives last wins, and results for
    /// slots the current view no longer has are dropped.
    pub(super) fn set_preview(&mut self, slot: PreviewSlot, text: String) {
        match (&mut self.state, slot) {
            (RunnerState::List(list), PreviewSlot::Item(id)) => {
                if !list.set_preview(id.clone(), text) {
                    debug!(item = %id, "preview for an item that is gone");
                }
            }
            (RunnerState::Detail(detail), PreviewSlot::Detail) => {
                detail.set_text(text);
                if !self.in_flight {
                    detail.loading = false;
                }
            }
            (_, slot) => debug!(?slot, "preview for a view that is gone"),
        }
    }
}

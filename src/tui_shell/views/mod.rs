pub(super) mod actions;
pub(super) mod chrome;
pub(super) mod detail;
pub(super) mod form;
pub(super) mod list;

pub(in crate::tui_shell) use detail::{DetailEvent, DetailView};
pub(in crate::tui_shell) use form::{FormEvent, FormField, FormView};
pub(in crate::tui_shell) use list::{ListEvent, ListView};

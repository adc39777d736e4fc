pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod model;
pub mod tui;

mod tui_shell;

//! Terminal user interface for the wizard.
//!
//! The layout mirrors the five wizard screens:
//! - Header with the product name and step indicator
//! - A body pane per screen (welcome, goal, skills, confirm, result)
//! - Footer with keybindings
//! - Transient toast line for undoable removals

mod app;
mod events;
mod theme;
mod ui;
mod widgets;

pub use app::{App, AppMsg, ServiceStatus};
pub use events::run;
pub use theme::Theme;

//! Wizard flow for the career copilot: the screen sequence, a
//! browser-style navigation ledger, the session controller that keeps
//! screen, state and storage in step, per-step validation gates, and
//! the debounced skill autocomplete.

pub mod autocomplete;
pub mod history;
pub mod screen;
pub mod validate;
pub mod wizard;

pub use autocomplete::{Autocomplete, FetchRequest, DEBOUNCE, MIN_QUERY_CHARS};
pub use history::{NavEvent, NavHistory};
pub use screen::Screen;
pub use validate::{validate_goal, validate_skills, ValidationError};
pub use wizard::Wizard;

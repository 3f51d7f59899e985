//! Session persistence for Career Copilot.
//!
//! Mirrors the in-memory wizard session onto disk: two JSON storage
//! keys under a state directory, written atomically after every
//! change, rehydrated leniently at startup.

pub mod atomic;
pub mod error;
pub mod session_store;

pub use atomic::{atomic_write, atomic_write_json, read_json_optional};
pub use error::{PersistenceError, Result};
pub use session_store::{SessionStore, PLAN_KEY, STATE_KEY};

//! Remote data gateway for Career Copilot.
//!
//! Wraps the planning backend's REST API behind a typed async client
//! with cooperative cancellation. Screens talk to [`ApiClient`] and
//! never touch HTTP details directly.

pub mod cancel;
pub mod client;
pub mod error;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use client::{is_pdf_filename, ApiClient, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};

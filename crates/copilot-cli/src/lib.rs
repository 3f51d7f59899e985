//! Career Copilot CLI library.
//!
//! This crate provides the command-line interface and the interactive
//! terminal wizard for Career Copilot.

pub mod cli;
pub mod commands;
pub mod tui;

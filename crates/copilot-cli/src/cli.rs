//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Career Copilot - interactive career planning wizard
#[derive(Parser, Debug)]
#[command(name = "copilot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the Career Copilot backend
    #[arg(short, long, env = "CAREER_COPILOT_API")]
    pub api_base: Option<String>,

    /// Path to state directory
    #[arg(short, long, env = "CAREER_COPILOT_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Color theme (light, dark)
    #[arg(long, value_enum, default_value_t = ThemeChoice::Dark)]
    pub theme: ThemeChoice,

    /// Screen to open on start (welcome, goal, skills, confirm, result)
    #[arg(long)]
    pub screen: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete the saved session and start from scratch
    Reset,

    /// Check that the backend is reachable
    Health,
}

/// Color theme for the interface
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ThemeChoice {
    Light,
    #[default]
    Dark,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".career-copilot"))
                .unwrap_or_else(|| PathBuf::from(".career-copilot"))
        })
    }

    /// Returns the backend base URL, using default if not specified.
    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| copilot_api::DEFAULT_BASE_URL.to_string())
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

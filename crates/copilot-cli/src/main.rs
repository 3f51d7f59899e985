//! Career Copilot CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use copilot_cli::cli::Cli;
use copilot_cli::{commands, tui};

fn main() {
    // Load .env.local if it exists (for CAREER_COPILOT_API etc.)
    let _ = dotenvy::from_filename(".env.local");

    let mut cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    // Handle subcommand or open the wizard
    let result = match cli.command.take() {
        Some(command) => commands::execute(command, &cli.state_dir(), &cli.api_base()),
        None => tui::run(&cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Event handling for the TUI.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::cli::{Cli, ThemeChoice};

use super::app::App;
use super::theme::Theme;
use super::ui;

/// Result type for TUI operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Initialize the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave the alternate screen before the default panic report so the
/// message stays readable.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

/// Run the TUI event loop.
pub fn run(cli: &Cli) -> Result<()> {
    let theme = match cli.theme {
        ThemeChoice::Light => Theme::light(),
        ThemeChoice::Dark => Theme::dark(),
    };

    // Create app (rehydrates the saved session, honors --screen)
    let mut app = App::new(&cli.state_dir(), &cli.api_base(), cli.screen.as_deref())?;

    install_panic_hook();

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Run event loop
    let result = run_loop(&mut terminal, &mut app, &theme);

    // Restore terminal
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    theme: &Theme,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        let now = Instant::now();

        // Drain request results, fire due suggestion fetches, expire toasts
        app.tick(now);

        // Draw UI
        terminal.draw(|f| ui::draw(f, app, theme, now))?;

        // Poll for events with timeout
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                app.handle_key(key, Instant::now());
            }
        }

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

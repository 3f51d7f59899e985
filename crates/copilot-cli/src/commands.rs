//! Command handlers for CLI subcommands.

use std::path::Path;

use copilot_api::ApiClient;
use copilot_persistence::SessionStore;
use tracing::info;

use crate::cli::Commands;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI subcommand.
pub fn execute(command: Commands, state_dir: &Path, api_base: &str) -> Result<()> {
    match command {
        Commands::Reset => cmd_reset(state_dir),
        Commands::Health => cmd_health(api_base),
    }
}

fn cmd_reset(state_dir: &Path) -> Result<()> {
    let store = SessionStore::new(state_dir);
    store.clear()?;

    info!(dir = %state_dir.display(), "Session cleared");
    println!("Session cleared: {}", state_dir.display());
    Ok(())
}

fn cmd_health(base_url: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let client = ApiClient::new(base_url);

    if runtime.block_on(client.health()) {
        println!("ok: {}", client.base_url());
        Ok(())
    } else {
        Err(format!("service unreachable: {}", client.base_url()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_models::WizardState;
    use tempfile::tempdir;

    #[test]
    fn test_cmd_reset_removes_session_files() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let mut state = WizardState::default();
        state.profession = "Аналитик данных".to_string();
        store.save_state(&state).unwrap();

        cmd_reset(dir.path()).unwrap();

        assert!(!dir.path().join("wizard_state.json").exists());
    }

    #[test]
    fn test_cmd_reset_without_session() {
        let dir = tempdir().unwrap();

        // Nothing saved yet; reset is still fine
        cmd_reset(&dir.path().join("empty")).unwrap();
    }

    #[test]
    fn test_cmd_health_unreachable() {
        // Port 9 (discard) is not listening
        assert!(cmd_health("http://127.0.0.1:9").is_err());
    }
}

//! Disk store for the wizard session.
//!
//! Two fixed storage keys mirror the in-memory session: the
//! accumulated [`WizardState`] and the generated [`PlanResponse`].
//! Each key is a JSON file in the state directory, written atomically
//! after every change. Reads never fail the caller: a missing or
//! malformed key rehydrates to its default so a damaged file can not
//! wedge the wizard at startup.

use std::path::{Path, PathBuf};

use tracing::warn;

use copilot_models::{PlanResponse, WizardState};

use crate::atomic;
use crate::error::Result;

/// Storage key holding the serialized wizard state.
pub const STATE_KEY: &str = "wizard_state";

/// Storage key holding the generated plan, present only when one
/// exists.
pub const PLAN_KEY: &str = "plan_result";

/// Persistent store for one wizard session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store over the given state directory. The directory
    /// is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory this store writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Persists the wizard state. Called after every state change.
    pub fn save_state(&self, state: &WizardState) -> Result<()> {
        atomic::atomic_write_json(&self.key_path(STATE_KEY), state)
    }

    /// Rehydrates the wizard state, merging stored fields over
    /// defaults. Missing or unreadable storage yields the default
    /// state.
    pub fn load_state(&self) -> WizardState {
        let path = self.key_path(STATE_KEY);
        match atomic::read_json_optional(&path) {
            Ok(Some(state)) => state,
            Ok(None) => WizardState::default(),
            Err(err) => {
                warn!("ignoring unreadable wizard state: {err}");
                WizardState::default()
            }
        }
    }

    /// Persists the plan, or deletes the key when called with `None`:
    /// an absent plan is stored as an absent key rather than `null`.
    pub fn save_plan(&self, plan: Option<&PlanResponse>) -> Result<()> {
        let path = self.key_path(PLAN_KEY);
        match plan {
            Some(plan) => atomic::atomic_write_json(&path, plan),
            None => atomic::remove_if_exists(&path),
        }
    }

    /// Rehydrates the stored plan, if a readable one exists.
    pub fn load_plan(&self) -> Option<PlanResponse> {
        let path = self.key_path(PLAN_KEY);
        match atomic::read_json_optional(&path) {
            Ok(plan) => plan,
            Err(err) => {
                warn!("ignoring unreadable plan: {err}");
                None
            }
        }
    }

    /// Removes both storage keys. Used by the reset flow.
    pub fn clear(&self) -> Result<()> {
        atomic::remove_if_exists(&self.key_path(STATE_KEY))?;
        atomic::remove_if_exists(&self.key_path(PLAN_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_models::{Scenario, SkillLevel, StatePatch};
    use std::fs;
    use tempfile::tempdir;

    fn sample_state() -> WizardState {
        let mut state = WizardState::default();
        state.apply(StatePatch::profession("Аналитик данных"));
        state.apply(StatePatch::scenario(Scenario::NextGrade));
        state.add_skill("SQL", SkillLevel::Advanced);
        state
    }

    fn sample_plan() -> PlanResponse {
        PlanResponse {
            markdown: "# План развития".to_string(),
            role_titles: None,
            analysis: None,
        }
    }

    #[test]
    fn test_state_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let state = sample_state();
        store.save_state(&state).unwrap();

        assert_eq!(store.load_state(), state);
    }

    #[test]
    fn test_load_state_missing_yields_default() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        assert_eq!(store.load_state(), WizardState::default());
    }

    #[test]
    fn test_load_state_malformed_yields_default() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(dir.path().join("wizard_state.json"), "{broken").unwrap();

        assert_eq!(store.load_state(), WizardState::default());
    }

    #[test]
    fn test_load_state_merges_partial_payload() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(
            dir.path().join("wizard_state.json"),
            r#"{"profession":"Аналитик данных"}"#,
        )
        .unwrap();

        let state = store.load_state();

        assert_eq!(state.profession, "Аналитик данных");
        assert_eq!(state.grade, copilot_models::Grade::Middle);
        assert!(state.skills.is_empty());
    }

    #[test]
    fn test_plan_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_plan(Some(&sample_plan())).unwrap();

        assert_eq!(store.load_plan(), Some(sample_plan()));
    }

    #[test]
    fn test_save_plan_none_deletes_key() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_plan(Some(&sample_plan())).unwrap();
        assert!(dir.path().join("plan_result.json").exists());

        store.save_plan(None).unwrap();
        assert!(!dir.path().join("plan_result.json").exists());
        assert_eq!(store.load_plan(), None);
    }

    #[test]
    fn test_save_plan_none_without_existing_key() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_plan(None).unwrap();
        assert_eq!(store.load_plan(), None);
    }

    #[test]
    fn test_load_plan_malformed_yields_none() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::write(dir.path().join("plan_result.json"), "[1,2").unwrap();

        assert_eq!(store.load_plan(), None);
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_state(&sample_state()).unwrap();
        store.save_plan(Some(&sample_plan())).unwrap();

        store.clear().unwrap();

        assert_eq!(store.load_state(), WizardState::default());
        assert_eq!(store.load_plan(), None);
        assert!(!dir.path().join("wizard_state.json").exists());
        assert!(!dir.path().join("plan_result.json").exists());
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.save_state(&sample_state()).unwrap();

        let mut updated = sample_state();
        updated.apply(StatePatch::profession("Продуктовый менеджер"));
        store.save_state(&updated).unwrap();

        assert_eq!(store.load_state().profession, "Продуктовый менеджер");
    }
}

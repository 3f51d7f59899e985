//! Accumulated wizard state.
//!
//! `WizardState` is the single record the screens read and patch as
//! the user moves through the flow. It is persisted verbatim between
//! runs, so every field carries a serde default: rehydrating an older
//! payload merges the stored fields over a fresh default state.

use serde::{Deserialize, Serialize};

use crate::goal::{Grade, Scenario};
use crate::skill::{Skill, SkillLevel};

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WizardState {
    /// Current profession, empty until chosen.
    pub profession: String,

    /// Chosen development scenario, if any.
    pub scenario: Option<Scenario>,

    /// Current grade.
    pub grade: Grade,

    /// Target profession for the switch scenario.
    #[serde(rename = "targetProfession")]
    pub target_profession: String,

    /// Skill inventory, in insertion order.
    pub skills: Vec<Skill>,
}

/// Partial update to a [`WizardState`].
///
/// Fields left as `None` keep their previous value when the patch is
/// applied. The scenario field is doubly optional so a patch can also
/// clear an already chosen scenario.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub profession: Option<String>,
    pub scenario: Option<Option<Scenario>>,
    pub grade: Option<Grade>,
    pub target_profession: Option<String>,
    pub skills: Option<Vec<Skill>>,
}

impl StatePatch {
    /// Patch that sets the profession.
    pub fn profession(value: impl Into<String>) -> Self {
        Self {
            profession: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch that sets the scenario.
    pub fn scenario(value: Scenario) -> Self {
        Self {
            scenario: Some(Some(value)),
            ..Self::default()
        }
    }

    /// Patch that sets the grade.
    pub fn grade(value: Grade) -> Self {
        Self {
            grade: Some(value),
            ..Self::default()
        }
    }

    /// Patch that sets the target profession.
    pub fn target_profession(value: impl Into<String>) -> Self {
        Self {
            target_profession: Some(value.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces the whole skill list.
    pub fn skills(value: Vec<Skill>) -> Self {
        Self {
            skills: Some(value),
            ..Self::default()
        }
    }
}

/// A skill taken out of the list, remembering where it was.
///
/// Produced by [`WizardState::remove_skill`] and consumed by
/// [`WizardState::restore_skill`] to implement undo.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedSkill {
    /// The removed skill.
    pub skill: Skill,
    /// Index the skill occupied before removal.
    pub index: usize,
}

impl WizardState {
    /// Applies a partial update; unset patch fields keep their values.
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(value) = patch.profession {
            self.profession = value;
        }
        if let Some(value) = patch.scenario {
            self.scenario = value;
        }
        if let Some(value) = patch.grade {
            self.grade = value;
        }
        if let Some(value) = patch.target_profession {
            self.target_profession = value;
        }
        if let Some(value) = patch.skills {
            self.skills = value;
        }
    }

    /// True if a skill with this name already exists, ignoring case.
    pub fn has_skill(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.skills.iter().any(|s| s.name.to_lowercase() == lowered)
    }

    /// Adds a skill unless its trimmed name is empty or already
    /// present under any capitalization. Returns whether it was added.
    pub fn add_skill(&mut self, name: &str, level: SkillLevel) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.has_skill(trimmed) {
            return false;
        }
        self.skills.push(Skill::new(trimmed, level));
        true
    }

    /// Removes the skill at `index`, returning it with its position so
    /// the removal can be undone. Out-of-range indices are a no-op.
    pub fn remove_skill(&mut self, index: usize) -> Option<RemovedSkill> {
        if index >= self.skills.len() {
            return None;
        }
        Some(RemovedSkill {
            skill: self.skills.remove(index),
            index,
        })
    }

    /// Puts a removed skill back at its original position.
    pub fn restore_skill(&mut self, removed: RemovedSkill) {
        let index = removed.index.min(self.skills.len());
        self.skills.insert(index, removed.skill);
    }

    /// Changes the level of the skill at `index`. Returns whether the
    /// index was valid.
    pub fn set_skill_level(&mut self, index: usize, level: SkillLevel) -> bool {
        match self.skills.get_mut(index) {
            Some(skill) => {
                skill.level = level;
                true
            }
            None => false,
        }
    }

    /// Appends extracted skills that are not already present, keeping
    /// the incoming order. Returns how many were added.
    pub fn merge_skills(&mut self, incoming: &[Skill]) -> usize {
        let mut added = 0;
        for skill in incoming {
            if self.add_skill(&skill.name, skill.level) {
                added += 1;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = WizardState::default();

        assert_eq!(state.profession, "");
        assert_eq!(state.scenario, None);
        assert_eq!(state.grade, Grade::Middle);
        assert_eq!(state.target_profession, "");
        assert!(state.skills.is_empty());
    }

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let mut state = WizardState {
            profession: "Аналитик данных".to_string(),
            scenario: Some(Scenario::NextGrade),
            grade: Grade::Senior,
            target_profession: String::new(),
            skills: vec![Skill::basic("SQL")],
        };

        state.apply(StatePatch::profession("Продуктовый менеджер"));

        assert_eq!(state.profession, "Продуктовый менеджер");
        assert_eq!(state.scenario, Some(Scenario::NextGrade));
        assert_eq!(state.grade, Grade::Senior);
        assert_eq!(state.skills.len(), 1);
    }

    #[test]
    fn test_patch_can_clear_scenario() {
        let mut state = WizardState::default();
        state.apply(StatePatch::scenario(Scenario::Explore));
        assert_eq!(state.scenario, Some(Scenario::Explore));

        state.apply(StatePatch {
            scenario: Some(None),
            ..StatePatch::default()
        });
        assert_eq!(state.scenario, None);
    }

    #[test]
    fn test_add_skill_trims_and_defaults() {
        let mut state = WizardState::default();

        assert!(state.add_skill("  SQL  ", SkillLevel::Basic));
        assert_eq!(state.skills, vec![Skill::new("SQL", SkillLevel::Basic)]);
    }

    #[test]
    fn test_add_skill_rejects_empty() {
        let mut state = WizardState::default();

        assert!(!state.add_skill("", SkillLevel::Basic));
        assert!(!state.add_skill("   ", SkillLevel::Basic));
        assert!(state.skills.is_empty());
    }

    #[test]
    fn test_add_skill_is_idempotent_ignoring_case() {
        let mut state = WizardState::default();

        assert!(state.add_skill("SQL", SkillLevel::Basic));
        assert!(!state.add_skill("sql", SkillLevel::Expert));
        assert!(!state.add_skill("SQL", SkillLevel::Basic));

        assert_eq!(state.skills.len(), 1);
        assert_eq!(state.skills[0].name, "SQL");
        assert_eq!(state.skills[0].level, SkillLevel::Basic);
    }

    #[test]
    fn test_add_skill_dedupes_cyrillic_case() {
        let mut state = WizardState::default();

        assert!(state.add_skill("Коммуникации", SkillLevel::Basic));
        assert!(!state.add_skill("коммуникации", SkillLevel::Basic));
        assert_eq!(state.skills.len(), 1);
    }

    #[test]
    fn test_remove_and_restore_keeps_order() {
        let mut state = WizardState::default();
        state.add_skill("SQL", SkillLevel::Basic);
        state.add_skill("Python", SkillLevel::Advanced);
        state.add_skill("Roadmap", SkillLevel::Basic);

        let removed = state.remove_skill(1).unwrap();
        assert_eq!(removed.skill.name, "Python");
        assert_eq!(removed.index, 1);
        assert_eq!(state.skills.len(), 2);

        state.restore_skill(removed);

        let names: Vec<&str> = state.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SQL", "Python", "Roadmap"]);
        assert_eq!(state.skills[1].level, SkillLevel::Advanced);
    }

    #[test]
    fn test_restore_clamps_index_after_shrink() {
        let mut state = WizardState::default();
        state.add_skill("SQL", SkillLevel::Basic);
        state.add_skill("Python", SkillLevel::Basic);

        let removed = state.remove_skill(1).unwrap();
        state.remove_skill(0);

        state.restore_skill(removed);
        assert_eq!(state.skills.len(), 1);
        assert_eq!(state.skills[0].name, "Python");
    }

    #[test]
    fn test_remove_skill_out_of_range() {
        let mut state = WizardState::default();
        assert!(state.remove_skill(0).is_none());
    }

    #[test]
    fn test_set_skill_level() {
        let mut state = WizardState::default();
        state.add_skill("SQL", SkillLevel::Basic);

        assert!(state.set_skill_level(0, SkillLevel::Expert));
        assert_eq!(state.skills[0].level, SkillLevel::Expert);
        assert!(!state.set_skill_level(5, SkillLevel::Basic));
    }

    #[test]
    fn test_merge_skills_skips_existing() {
        let mut state = WizardState::default();
        state.add_skill("SQL", SkillLevel::Basic);

        let extracted = vec![
            Skill::new("sql", SkillLevel::Expert),
            Skill::new("Python", SkillLevel::Advanced),
            Skill::new("Excel", SkillLevel::Basic),
        ];
        let added = state.merge_skills(&extracted);

        assert_eq!(added, 2);
        assert_eq!(state.skills.len(), 3);
        assert_eq!(state.skills[0].level, SkillLevel::Basic);
    }

    #[test]
    fn test_serialization_uses_camel_case_target() {
        let state = WizardState {
            target_profession: "Продуктовый менеджер".to_string(),
            ..WizardState::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"targetProfession\""));
        assert!(!json.contains("\"target_profession\""));
    }

    #[test]
    fn test_rehydration_merges_over_defaults() {
        // Older payload with only a subset of fields.
        let json = r#"{"profession":"Аналитик данных","skills":[{"name":"SQL","level":1.5}]}"#;

        let state: WizardState = serde_json::from_str(json).unwrap();

        assert_eq!(state.profession, "Аналитик данных");
        assert_eq!(state.grade, Grade::Middle);
        assert_eq!(state.scenario, None);
        assert_eq!(state.skills, vec![Skill::new("SQL", SkillLevel::Advanced)]);
    }

    #[test]
    fn test_full_roundtrip() {
        let mut state = WizardState::default();
        state.apply(StatePatch::profession("Аналитик данных"));
        state.apply(StatePatch::scenario(Scenario::SwitchProfession));
        state.apply(StatePatch::target_profession("Продуктовый менеджер"));
        state.add_skill("SQL", SkillLevel::Basic);

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: WizardState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}

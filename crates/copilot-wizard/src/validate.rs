//! Per-step validation gates.
//!
//! Each forward transition out of a data-entry screen runs its gate
//! before navigating. Messages are the user-facing inline errors, so
//! the `Display` text is part of the contract.

use thiserror::Error;

use copilot_models::WizardState;

/// A failed validation gate, carrying the inline message to show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Выберите профессию — без неё мы не сможем сопоставить требования роли.")]
    MissingProfession,

    #[error("Выберите сценарий развития.")]
    MissingScenario,

    #[error("Выберите целевую профессию для перехода.")]
    MissingTargetProfession,

    #[error("Добавьте хотя бы один навык — иначе план не собрать.")]
    NoSkills,
}

/// Gate for leaving the goal screen: profession, then scenario, then
/// (for a profession switch) the target profession. Checked in that
/// order so the topmost incomplete field gets the message.
pub fn validate_goal(state: &WizardState) -> Result<(), ValidationError> {
    if state.profession.is_empty() {
        return Err(ValidationError::MissingProfession);
    }
    let scenario = state.scenario.ok_or(ValidationError::MissingScenario)?;
    if scenario.requires_target() && state.target_profession.is_empty() {
        return Err(ValidationError::MissingTargetProfession);
    }
    Ok(())
}

/// Gate for leaving the skills screen: at least one skill.
pub fn validate_skills(state: &WizardState) -> Result<(), ValidationError> {
    if state.skills.is_empty() {
        return Err(ValidationError::NoSkills);
    }
    Ok(())
}

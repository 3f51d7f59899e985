//! Skill types for Career Copilot.
//!
//! A skill pairs a free-form name with a discrete proficiency level.
//! Levels travel over the wire as the numbers 0, 0.5, 1, 1.5 and 2,
//! so the enum converts through `f64` when serialized.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a number does not map onto the level scale.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("not a valid skill level: {0} (expected 0, 0.5, 1, 1.5 or 2)")]
pub struct InvalidSkillLevel(pub f64);

/// Proficiency level of a skill, on the five-step 0..2 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "f64", into = "f64")]
pub enum SkillLevel {
    /// Wire value 0: the skill is explicitly absent.
    None,
    /// Wire value 0.5: first steps.
    Beginner,
    /// Wire value 1: working knowledge. Default for manually added
    /// skills.
    #[default]
    Basic,
    /// Wire value 1.5: confident, independent use.
    Advanced,
    /// Wire value 2: expert level.
    Expert,
}

impl SkillLevel {
    /// All levels, in ascending order.
    pub const ALL: [SkillLevel; 5] = [
        SkillLevel::None,
        SkillLevel::Beginner,
        SkillLevel::Basic,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    /// Numeric wire value of the level.
    pub fn value(self) -> f64 {
        f64::from(self)
    }

    /// Human-readable label of the level.
    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::None => "Нет навыка",
            SkillLevel::Beginner => "Начальный",
            SkillLevel::Basic => "Базовый",
            SkillLevel::Advanced => "Продвинутый",
            SkillLevel::Expert => "Эксперт",
        }
    }
}

impl From<SkillLevel> for f64 {
    fn from(level: SkillLevel) -> f64 {
        match level {
            SkillLevel::None => 0.0,
            SkillLevel::Beginner => 0.5,
            SkillLevel::Basic => 1.0,
            SkillLevel::Advanced => 1.5,
            SkillLevel::Expert => 2.0,
        }
    }
}

impl TryFrom<f64> for SkillLevel {
    type Error = InvalidSkillLevel;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        // Half-steps only: twice the value must be an integer in 0..=4.
        let doubled = value * 2.0;
        if doubled.fract() != 0.0 || !(0.0..=4.0).contains(&doubled) {
            return Err(InvalidSkillLevel(value));
        }
        Ok(match doubled as u8 {
            0 => SkillLevel::None,
            1 => SkillLevel::Beginner,
            2 => SkillLevel::Basic,
            3 => SkillLevel::Advanced,
            _ => SkillLevel::Expert,
        })
    }
}

/// A single skill in the wizard's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Display name, e.g. "SQL" or "Коммуникации".
    pub name: String,

    /// Current proficiency level.
    pub level: SkillLevel,
}

impl Skill {
    /// Creates a skill with the given name and level.
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    /// Creates a skill at the default level for manual entry.
    pub fn basic(name: impl Into<String>) -> Self {
        Self::new(name, SkillLevel::Basic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_default() {
        assert_eq!(SkillLevel::default(), SkillLevel::Basic);
    }

    #[test]
    fn test_level_values_ascend() {
        let values: Vec<f64> = SkillLevel::ALL.iter().map(|l| l.value()).collect();
        assert_eq!(values, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(serde_json::to_string(&SkillLevel::Basic).unwrap(), "1.0");
        assert_eq!(serde_json::to_string(&SkillLevel::Advanced).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&SkillLevel::None).unwrap(), "0.0");
    }

    #[test]
    fn test_level_deserializes_integers_and_halves() {
        let level: SkillLevel = serde_json::from_str("1").unwrap();
        assert_eq!(level, SkillLevel::Basic);

        let level: SkillLevel = serde_json::from_str("0.5").unwrap();
        assert_eq!(level, SkillLevel::Beginner);

        let level: SkillLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, SkillLevel::Expert);
    }

    #[test]
    fn test_level_rejects_off_scale_numbers() {
        assert!(serde_json::from_str::<SkillLevel>("0.75").is_err());
        assert!(serde_json::from_str::<SkillLevel>("3").is_err());
        assert!(serde_json::from_str::<SkillLevel>("-0.5").is_err());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(SkillLevel::None.label(), "Нет навыка");
        assert_eq!(SkillLevel::Expert.label(), "Эксперт");
    }

    #[test]
    fn test_skill_serialization_roundtrip() {
        let skill = Skill::new("SQL", SkillLevel::Advanced);

        let json = serde_json::to_string(&skill).unwrap();
        assert_eq!(json, r#"{"name":"SQL","level":1.5}"#);

        let deserialized: Skill = serde_json::from_str(&json).unwrap();
        assert_eq!(skill, deserialized);
    }

    #[test]
    fn test_skill_basic_constructor() {
        let skill = Skill::basic("Python");
        assert_eq!(skill.level, SkillLevel::Basic);
    }
}

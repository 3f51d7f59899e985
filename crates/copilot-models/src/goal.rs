//! Goal taxonomy for Career Copilot.
//!
//! Grades and scenarios are closed vocabularies shared with the
//! backend; their wire representation is the exact Russian label the
//! planning API expects, so both enums serialize through renames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Career grade of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Grade {
    /// Junior grade.
    #[serde(rename = "Младший (Junior)")]
    Junior,
    /// Middle grade. Default for a fresh wizard.
    #[default]
    #[serde(rename = "Специалист (Middle)")]
    Middle,
    /// Senior grade.
    #[serde(rename = "Старший (Senior)")]
    Senior,
    /// Lead grade.
    #[serde(rename = "Ведущий (Lead)")]
    Lead,
    /// Expert grade.
    #[serde(rename = "Эксперт (Expert)")]
    Expert,
}

impl Grade {
    /// All grades, in ascending seniority order.
    pub const ALL: [Grade; 5] = [
        Grade::Junior,
        Grade::Middle,
        Grade::Senior,
        Grade::Lead,
        Grade::Expert,
    ];

    /// Wire label of the grade.
    pub fn label(self) -> &'static str {
        match self {
            Grade::Junior => "Младший (Junior)",
            Grade::Middle => "Специалист (Middle)",
            Grade::Senior => "Старший (Senior)",
            Grade::Lead => "Ведущий (Lead)",
            Grade::Expert => "Эксперт (Expert)",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Development scenario chosen on the goal screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Grow to the next grade within the current profession.
    #[serde(rename = "Следующий грейд")]
    NextGrade,
    /// Switch to a different profession.
    #[serde(rename = "Смена профессии")]
    SwitchProfession,
    /// Explore which roles fit the current skill set.
    #[serde(rename = "Исследование возможностей")]
    Explore,
}

impl Scenario {
    /// All scenarios, in presentation order.
    pub const ALL: [Scenario; 3] = [
        Scenario::NextGrade,
        Scenario::SwitchProfession,
        Scenario::Explore,
    ];

    /// Wire label of the scenario.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::NextGrade => "Следующий грейд",
            Scenario::SwitchProfession => "Смена профессии",
            Scenario::Explore => "Исследование возможностей",
        }
    }

    /// One-line description shown on the scenario card.
    pub fn description(self) -> &'static str {
        match self {
            Scenario::NextGrade => "Хочу вырасти в рамках текущей профессии",
            Scenario::SwitchProfession => "Хочу перейти в другую роль",
            Scenario::Explore => "Хочу понять, какие роли мне подходят",
        }
    }

    /// True for the profession-switch scenario, which requires a
    /// target profession before the goal step validates.
    pub fn requires_target(self) -> bool {
        matches!(self, Scenario::SwitchProfession)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

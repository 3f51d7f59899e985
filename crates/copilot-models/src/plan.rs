//! Planning API envelopes.
//!
//! Request bodies are built from [`WizardState`]; responses carry the
//! markdown plan plus an optional structured analysis whose shape
//! depends on the chosen scenario (the `scenario` field tags it on the
//! wire). Response fields the backend may omit all default, so partial
//! payloads still deserialize.

use serde::{Deserialize, Serialize};

use crate::goal::{Grade, Scenario};
use crate::skill::Skill;
use crate::state::WizardState;

/// Body of `POST /api/plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Current profession.
    pub profession: String,

    /// Current grade.
    pub grade: Grade,

    /// Skill inventory to analyze.
    pub skills: Vec<Skill>,

    /// Chosen scenario.
    pub scenario: Scenario,

    /// Target profession; the key is present only for the
    /// profession-switch scenario.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_profession: Option<String>,
}

impl PlanRequest {
    /// Builds the request for the current goal, or `None` while no
    /// scenario is chosen yet.
    pub fn from_state(state: &WizardState) -> Option<Self> {
        let scenario = state.scenario?;
        Some(Self {
            profession: state.profession.clone(),
            grade: state.grade,
            skills: state.skills.clone(),
            scenario,
            target_profession: scenario
                .requires_target()
                .then(|| state.target_profession.clone()),
        })
    }
}

/// Body of `POST /api/focused-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusedPlanRequest {
    /// Current profession.
    pub profession: String,

    /// Current grade.
    pub grade: Grade,

    /// Chosen scenario.
    pub scenario: Scenario,

    /// Target profession, omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_profession: Option<String>,

    /// Gap skills the user selected for the focused plan.
    pub selected_skills: Vec<String>,
}

impl FocusedPlanRequest {
    /// Builds the request for the selected gap skills, or `None` while
    /// no scenario is chosen yet.
    pub fn from_state(state: &WizardState, selected_skills: Vec<String>) -> Option<Self> {
        let scenario = state.scenario?;
        Some(Self {
            profession: state.profession.clone(),
            grade: state.grade,
            scenario,
            target_profession: (!state.target_profession.is_empty())
                .then(|| state.target_profession.clone()),
            selected_skills,
        })
    }
}

/// Response of `POST /api/plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// The generated plan as markdown.
    pub markdown: String,

    /// Matched role titles, present for the explore scenario.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_titles: Option<Vec<String>>,

    /// Structured analysis for the visual views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

/// Scenario-specific analysis payload, tagged by its `scenario` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum Analysis {
    /// Next-grade growth within the current profession.
    Growth(GrowthAnalysis),
    /// Switch to another profession.
    Switch(SwitchAnalysis),
    /// Exploration of matching roles.
    Explore(ExploreAnalysis),
}

/// Analysis for the next-grade scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAnalysis {
    /// Internal key of the current grade, e.g. "Middle".
    pub current_grade: String,

    /// Internal key of the next grade.
    pub target_grade: String,

    /// Overall requirement match, 0..=100.
    #[serde(default)]
    pub match_percent: u32,

    /// Per-parameter current/target pairs for the radar view.
    #[serde(default)]
    pub radar_data: Vec<RadarPoint>,

    /// Skills below the target bar.
    #[serde(default)]
    pub skill_gaps: Vec<SkillGap>,

    /// Skills already at or above the bar.
    #[serde(default)]
    pub skill_strong: Vec<StrongSkill>,
}

/// One axis of the growth radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    /// Parameter name.
    pub param: String,

    /// Current ordinal level.
    pub current: u32,

    /// Required ordinal level.
    pub target: u32,

    /// Label of the current level.
    #[serde(default)]
    pub current_label: String,

    /// Label of the required level.
    #[serde(default)]
    pub target_label: String,
}

/// A skill whose level falls short of the target grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Skill name.
    pub name: String,

    /// Current internal level.
    pub current: u32,

    /// Required internal level.
    pub required: u32,

    /// required − current.
    pub delta: i32,

    /// Short key of the required level, e.g. "продвинутый".
    #[serde(default)]
    pub level_key: String,

    /// Description of what the required level looks like.
    #[serde(default)]
    pub description: String,

    /// Suggested development tasks.
    #[serde(default)]
    pub tasks: String,
}

/// A skill already at the required level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongSkill {
    /// Skill name.
    pub name: String,

    /// Internal level.
    pub level: u32,
}

/// Analysis for the profession-switch scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchAnalysis {
    /// Profession the user is leaving.
    pub from_role: String,

    /// Profession the user is moving to.
    pub to_role: String,

    /// Overall requirement match, 0..=100.
    #[serde(default)]
    pub match_percent: u32,

    /// Baseline grade the comparison starts from.
    #[serde(default)]
    pub baseline_level: String,

    /// Skills that transfer to the new role.
    #[serde(default)]
    pub transferable: Vec<TransferableSkill>,

    /// Skills the new role still requires.
    #[serde(default)]
    pub gaps: Vec<SwitchGap>,

    /// Recommended preparation tracks.
    #[serde(default)]
    pub suggested_tracks: Vec<String>,
}

/// A transferable skill with an evidence snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferableSkill {
    /// Skill name.
    pub name: String,

    /// Why it transfers.
    #[serde(default)]
    pub snippet: String,
}

/// A missing skill for the target role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchGap {
    /// Skill name.
    pub name: String,

    /// Importance of the skill for the target role.
    #[serde(default)]
    pub importance: String,

    /// Short key of the required level.
    #[serde(default)]
    pub level_key: String,

    /// Description of the required level.
    #[serde(default)]
    pub description: String,

    /// Suggested development tasks.
    #[serde(default)]
    pub tasks: String,
}

/// Analysis for the explore scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreAnalysis {
    /// Candidate roles, closest first.
    #[serde(default)]
    pub roles: Vec<RoleCard>,
}

/// Distance bucket of an explored role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// Reachable with the current skill set.
    Closest,
    /// Reachable with moderate investment.
    Adjacent,
    /// A longer stretch.
    Far,
}

impl RoleCategory {
    /// Short category label.
    pub fn label(self) -> &'static str {
        match self {
            RoleCategory::Closest => "Ближайшие",
            RoleCategory::Adjacent => "Смежные",
            RoleCategory::Far => "Дальние",
        }
    }
}

/// One explored role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCard {
    /// Role title.
    pub title: String,

    /// Match score, 0..=100.
    #[serde(rename = "match")]
    pub match_percent: u32,

    /// Distance bucket.
    pub category: RoleCategory,

    /// Human label for the match score.
    #[serde(default)]
    pub match_label: String,

    /// Skills to add for this role.
    #[serde(default)]
    pub missing: Vec<String>,

    /// Key skills of the role.
    #[serde(default)]
    pub key_skills: Vec<String>,

    /// Why this role matches.
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Response of `POST /api/focused-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FocusedPlan {
    /// Concrete tasks per selected skill.
    #[serde(default)]
    pub tasks: Vec<FocusedTasks>,

    /// Recommendations around mentoring and feedback.
    #[serde(default)]
    pub communication: Vec<String>,

    /// Books, courses and other resources.
    #[serde(default)]
    pub learning: Vec<String>,
}

/// Tasks for one skill inside a focused plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusedTasks {
    /// Skill name.
    pub skill: String,

    /// Task list.
    #[serde(default)]
    pub items: Vec<String>,
}

/// Response of `POST /api/analyze-resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResumeAnalysis {
    /// Extracted skills.
    #[serde(default)]
    pub skills: Vec<Skill>,

    /// Soft failure note, e.g. when no text could be extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//! Core data models for Career Copilot.
//!
//! This crate provides the fundamental data types used throughout the
//! wizard: the accumulated state, skills and their levels, the goal
//! taxonomy (grades and scenarios), and the request/response envelopes
//! of the planning backend.

pub mod goal;
pub mod plan;
pub mod skill;
pub mod state;

// Re-export main types
pub use goal::{Grade, Scenario};
pub use plan::{
    Analysis, ExploreAnalysis, FocusedPlan, FocusedPlanRequest, FocusedTasks, GrowthAnalysis,
    PlanRequest, PlanResponse, RadarPoint, ResumeAnalysis, RoleCard, RoleCategory, SkillGap,
    StrongSkill, SwitchAnalysis, SwitchGap, TransferableSkill,
};
pub use skill::{InvalidSkillLevel, Skill, SkillLevel};
pub use state::{RemovedSkill, StatePatch, WizardState};

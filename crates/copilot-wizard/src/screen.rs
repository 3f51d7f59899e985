//! Screen identifiers and the linear forward path.
//!
//! Each screen has a stable fragment string used for deep links and
//! history entries. The forward path is strictly linear; backward
//! movement is unconstrained.

use serde::{Deserialize, Serialize};

/// The five wizard screens, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Landing screen.
    #[default]
    Welcome,
    /// Goal setup: profession, scenario, grade.
    Goal,
    /// Skill inventory.
    Skills,
    /// Read-only summary before plan generation.
    Confirm,
    /// Generated plan. Reachable only while a plan exists.
    Result,
}

impl Screen {
    /// All screens, in forward order.
    pub const ALL: [Screen; 5] = [
        Screen::Welcome,
        Screen::Goal,
        Screen::Skills,
        Screen::Confirm,
        Screen::Result,
    ];

    /// Fragment string identifying the screen in deep links and
    /// history entries.
    pub fn fragment(self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Goal => "goal",
            Screen::Skills => "skills",
            Screen::Confirm => "confirm",
            Screen::Result => "result",
        }
    }

    /// Resolves a fragment back to a screen; unknown fragments yield
    /// `None` so callers can degrade to the welcome screen.
    pub fn from_fragment(fragment: &str) -> Option<Screen> {
        match fragment {
            "welcome" => Some(Screen::Welcome),
            "goal" => Some(Screen::Goal),
            "skills" => Some(Screen::Skills),
            "confirm" => Some(Screen::Confirm),
            "result" => Some(Screen::Result),
            _ => None,
        }
    }

    /// Next screen on the linear forward path.
    pub fn next(self) -> Option<Screen> {
        match self {
            Screen::Welcome => Some(Screen::Goal),
            Screen::Goal => Some(Screen::Skills),
            Screen::Skills => Some(Screen::Confirm),
            Screen::Confirm => Some(Screen::Result),
            Screen::Result => None,
        }
    }

    /// Previous screen on the linear path.
    pub fn prev(self) -> Option<Screen> {
        match self {
            Screen::Welcome => None,
            Screen::Goal => Some(Screen::Welcome),
            Screen::Skills => Some(Screen::Goal),
            Screen::Confirm => Some(Screen::Skills),
            Screen::Result => Some(Screen::Confirm),
        }
    }

    /// Position in the three-step progress strip, when the screen is
    /// part of it.
    pub fn step(self) -> Option<u8> {
        match self {
            Screen::Goal => Some(1),
            Screen::Skills => Some(2),
            Screen::Confirm => Some(3),
            _ => None,
        }
    }

    /// Step label shown next to the progress strip.
    pub fn step_label(self) -> &'static str {
        match self {
            Screen::Goal => "Цель",
            Screen::Skills => "Навыки",
            Screen::Confirm => "Подтверждение",
            _ => "",
        }
    }
}

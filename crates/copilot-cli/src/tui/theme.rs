//! Color palettes for the TUI.
//!
//! A `Theme` is built once at startup from the `--theme` flag and
//! passed by reference into every draw function. There is no global
//! theme state.

use ratatui::style::Color;

/// Resolved color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Primary accent, used for titles and active elements.
    pub accent: Color,
    /// Dimmed accent for secondary highlights.
    pub accent_soft: Color,
    /// Regular text.
    pub text: Color,
    /// De-emphasized text (helpers, hints).
    pub muted: Color,
    /// Panel and popup background.
    pub surface: Color,
    /// Borders and separators.
    pub border: Color,
    /// Positive accents (extracted skills, strong sides).
    pub success: Color,
    /// Warnings (validation alerts, gaps).
    pub warning: Color,
    /// Errors.
    pub error: Color,
}

impl Theme {
    /// Dark palette, the default.
    pub fn dark() -> Self {
        Self {
            accent: Color::Indexed(105),
            accent_soft: Color::Indexed(61),
            text: Color::Indexed(253),
            muted: Color::Indexed(245),
            surface: Color::Indexed(236),
            border: Color::Indexed(240),
            success: Color::Indexed(78),
            warning: Color::Indexed(214),
            error: Color::Indexed(203),
        }
    }

    /// Light palette for bright terminals.
    pub fn light() -> Self {
        Self {
            accent: Color::Indexed(62),
            accent_soft: Color::Indexed(104),
            text: Color::Indexed(235),
            muted: Color::Indexed(243),
            surface: Color::Indexed(255),
            border: Color::Indexed(250),
            success: Color::Indexed(29),
            warning: Color::Indexed(130),
            error: Color::Indexed(160),
        }
    }
}

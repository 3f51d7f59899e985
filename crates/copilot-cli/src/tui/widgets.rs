//! Reusable interaction models for the TUI views.
//!
//! These hold no rendering code: `ui` draws them, `app` feeds them
//! keys. Keeping them as plain state machines makes the keyboard
//! contracts testable without a terminal.

use std::time::{Duration, Instant};

use copilot_models::{RemovedSkill, SkillLevel};

/// How long an undo toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Levels offered by the inline picker on skill rows, with the labels
/// the picker shows for them.
pub const PICKER_LEVELS: [(SkillLevel, &str); 3] = [
    (SkillLevel::Basic, "Базовый"),
    (SkillLevel::Advanced, "Уверенный"),
    (SkillLevel::Expert, "Продвинутый"),
];

/// Picker label for a level. Levels the picker does not offer keep
/// their wire label.
pub fn picker_level_label(level: SkillLevel) -> &'static str {
    match PICKER_LEVELS.iter().find(|(l, _)| *l == level) {
        Some((_, label)) => label,
        None => level.label(),
    }
}

/// Lowercase level label for the confirmation summary.
pub fn confirm_level_label(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::None => "нет навыка",
        SkillLevel::Beginner => "начальный",
        SkillLevel::Basic => "базовый",
        SkillLevel::Advanced => "уверенный",
        SkillLevel::Expert => "продвинутый",
    }
}

/// A filterable option picker: a closed field that opens into a list
/// with a local search line. The filter is a case-insensitive
/// substring match over the full option set; the highlight indexes
/// into the filtered list and commits only when it points at an entry.
#[derive(Debug, Default)]
pub struct SearchSelect {
    options: Vec<String>,
    query: String,
    open: bool,
    highlighted: Option<usize>,
}

impl SearchSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the option set, keeping the picker closed.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.highlighted = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Options matching the current query. An empty query shows all.
    pub fn filtered(&self) -> Vec<&str> {
        if self.query.is_empty() {
            return self.options.iter().map(String::as_str).collect();
        }
        let needle = self.query.to_lowercase();
        self.options
            .iter()
            .filter(|o| o.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Opens the picker with a fresh search line.
    pub fn open(&mut self) {
        self.open = true;
        self.query.clear();
        self.highlighted = None;
    }

    /// Appends a character to the search line. Typing resets the
    /// highlight.
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.highlighted = None;
    }

    /// Deletes the last search character.
    pub fn pop_char(&mut self) {
        self.query.pop();
        self.highlighted = None;
    }

    /// Moves the highlight down, clamped to the last filtered entry.
    pub fn key_down(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Moves the highlight up, clamped to the first filtered entry.
    pub fn key_up(&mut self) {
        if self.filtered().is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => i.saturating_sub(1),
        });
    }

    /// Commits the highlighted entry, closing the picker. Without a
    /// highlight nothing is committed (free text is not a value here).
    pub fn commit(&mut self) -> Option<String> {
        let choice = self
            .highlighted
            .and_then(|i| self.filtered().get(i).map(|s| s.to_string()))?;
        self.close();
        Some(choice)
    }

    /// Escape: closes and discards the search text.
    pub fn escape(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.highlighted = None;
    }
}

/// A transient notification, optionally carrying an undoable removal.
#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub undo: Option<RemovedSkill>,
    expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            undo: None,
            expires_at: now + TOAST_TTL,
        }
    }

    /// Toast for a skill removal, keeping the removed entry around so
    /// the undo action can restore it at its original index.
    pub fn with_undo(message: impl Into<String>, removed: RemovedSkill, now: Instant) -> Self {
        Self {
            message: message.into(),
            undo: Some(removed),
            expires_at: now + TOAST_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Advisory progress for a long request: creeps toward 90% of the
/// expected duration and holds there. Purely cosmetic, it never
/// affects the request it shadows.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTimer {
    started: Instant,
    expected: Duration,
}

impl ProgressTimer {
    pub fn new(now: Instant, expected: Duration) -> Self {
        Self {
            started: now,
            expected,
        }
    }

    /// Ratio in `0.0..=0.9` for the gauge.
    pub fn ratio(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.expected.as_secs_f64() * 0.9).min(0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_models::{Skill, SkillLevel};

    fn select(options: &[&str]) -> SearchSelect {
        let mut select = SearchSelect::new();
        select.set_options(options.iter().map(|s| s.to_string()).collect());
        select
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut select = select(&["Аналитик данных", "Продуктовый менеджер", "Дата-сайентист"]);
        select.open();
        for c in "аналитик".chars() {
            select.push_char(c);
        }

        assert_eq!(select.filtered(), vec!["Аналитик данных"]);
    }

    #[test]
    fn test_empty_query_shows_all_options() {
        let mut select = select(&["A", "B"]);
        select.open();

        assert_eq!(select.filtered().len(), 2);
    }

    #[test]
    fn test_highlight_clamps_to_filtered_list() {
        let mut select = select(&["SQL", "Python"]);
        select.open();

        select.key_down();
        select.key_down();
        select.key_down();
        assert_eq!(select.highlighted(), Some(1));

        select.key_up();
        select.key_up();
        assert_eq!(select.highlighted(), Some(0));
    }

    #[test]
    fn test_commit_requires_a_highlight() {
        let mut select = select(&["SQL"]);
        select.open();

        assert_eq!(select.commit(), None);
        assert!(select.is_open());

        select.key_down();
        assert_eq!(select.commit(), Some("SQL".to_string()));
        assert!(!select.is_open());
        assert_eq!(select.query(), "");
    }

    #[test]
    fn test_typing_resets_the_highlight() {
        let mut select = select(&["SQL", "Python"]);
        select.open();
        select.key_down();

        select.push_char('p');

        assert_eq!(select.highlighted(), None);
    }

    #[test]
    fn test_escape_closes_and_clears() {
        let mut select = select(&["SQL"]);
        select.open();
        select.push_char('s');

        select.escape();

        assert!(!select.is_open());
        assert_eq!(select.query(), "");
    }

    #[test]
    fn test_toast_expires_after_ttl() {
        let now = Instant::now();
        let removed = RemovedSkill {
            skill: Skill::new("SQL", SkillLevel::Basic),
            index: 0,
        };
        let toast = Toast::with_undo("Навык удалён", removed, now);

        assert!(!toast.is_expired(now + Duration::from_millis(3_999)));
        assert!(toast.is_expired(now + TOAST_TTL));
    }

    #[test]
    fn test_picker_labels_differ_from_wire_labels() {
        assert_eq!(picker_level_label(SkillLevel::Advanced), "Уверенный");
        assert_eq!(picker_level_label(SkillLevel::Expert), "Продвинутый");
        // Not offered by the picker, falls back to the wire label
        assert_eq!(picker_level_label(SkillLevel::Beginner), "Начальный");
        assert_eq!(confirm_level_label(SkillLevel::Advanced), "уверенный");
    }

    #[test]
    fn test_progress_creeps_and_caps_at_ninety_percent() {
        let now = Instant::now();
        let timer = ProgressTimer::new(now, Duration::from_secs(30));

        assert_eq!(timer.ratio(now), 0.0);
        let halfway = timer.ratio(now + Duration::from_secs(15));
        assert!((halfway - 0.45).abs() < 1e-9);
        assert_eq!(timer.ratio(now + Duration::from_secs(120)), 0.9);
    }
}

//! In-process navigation history.
//!
//! The wizard mirrors every transition into this ledger the way a
//! browser SPA mirrors screens into session history: forward
//! transitions push entries, replacing transitions swap the current
//! one, and moving the cursor emits a [`NavEvent`] that the controller
//! consumes like a pop event. Keeping the ledger explicit makes the
//! pop path (and its guards) testable without any UI.

use crate::screen::Screen;

/// Inbound navigation event produced by cursor movement.
///
/// Carries the state attached to the target entry plus the fragment
/// string. Synthesized events (deep links) may carry no state, in
/// which case the controller re-derives the target from the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEvent {
    /// Screen attached to the history entry, if any.
    pub state: Option<Screen>,
    /// Fragment string of the entry.
    pub fragment: String,
}

impl NavEvent {
    /// Event carrying attached state, as ledger entries produce.
    pub fn with_state(screen: Screen) -> Self {
        Self {
            state: Some(screen),
            fragment: screen.fragment().to_string(),
        }
    }

    /// Stateless event carrying only a fragment, as a deep link would.
    pub fn fragment_only(fragment: impl Into<String>) -> Self {
        Self {
            state: None,
            fragment: fragment.into(),
        }
    }
}

/// Navigation ledger with a movable cursor.
#[derive(Debug, Clone, Default)]
pub struct NavHistory {
    entries: Vec<Screen>,
    cursor: usize,
}

impl NavHistory {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry after the cursor, dropping any forward
    /// entries, and moves the cursor onto it.
    pub fn push(&mut self, screen: Screen) {
        if self.entries.is_empty() {
            self.entries.push(screen);
            self.cursor = 0;
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(screen);
        self.cursor += 1;
    }

    /// Replaces the entry under the cursor without growing the ledger.
    /// On an empty ledger this seeds the first entry, which is how the
    /// startup screen is recorded without becoming navigable history.
    pub fn replace(&mut self, screen: Screen) {
        if self.entries.is_empty() {
            self.entries.push(screen);
            self.cursor = 0;
        } else {
            self.entries[self.cursor] = screen;
        }
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<Screen> {
        self.entries.get(self.cursor).copied()
    }

    /// True when an earlier entry exists.
    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// True when a later entry exists.
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Moves the cursor one entry back and emits the pop event.
    pub fn back(&mut self) -> Option<NavEvent> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.current().map(NavEvent::with_state)
    }

    /// Moves the cursor one entry forward and emits the pop event.
    pub fn forward(&mut self) -> Option<NavEvent> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.current().map(NavEvent::with_state)
    }

    /// Number of entries in the ledger.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_and_moves_cursor() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);
        history.push(Screen::Goal);

        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), Some(Screen::Goal));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_replace_swaps_current_entry() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);
        history.push(Screen::Goal);

        history.replace(Screen::Skills);

        assert_eq!(history.len(), 2);
        assert_eq!(history.current(), Some(Screen::Skills));
    }

    #[test]
    fn test_replace_seeds_empty_ledger() {
        let mut history = NavHistory::new();
        history.replace(Screen::Goal);

        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(Screen::Goal));
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_back_emits_event_with_state() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);
        history.push(Screen::Goal);

        let event = history.back().unwrap();

        assert_eq!(event.state, Some(Screen::Welcome));
        assert_eq!(event.fragment, "welcome");
        assert_eq!(history.current(), Some(Screen::Welcome));
    }

    #[test]
    fn test_back_at_first_entry_is_none() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);

        assert!(history.back().is_none());
        assert_eq!(history.current(), Some(Screen::Welcome));
    }

    #[test]
    fn test_forward_after_back() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);
        history.push(Screen::Goal);
        history.back();

        let event = history.forward().unwrap();

        assert_eq!(event.state, Some(Screen::Goal));
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = NavHistory::new();
        history.push(Screen::Welcome);
        history.push(Screen::Goal);
        history.push(Screen::Skills);
        history.back();
        history.back();

        history.push(Screen::Goal);

        assert_eq!(history.len(), 2);
        assert!(!history.can_go_forward());
        assert_eq!(history.current(), Some(Screen::Goal));
    }
}

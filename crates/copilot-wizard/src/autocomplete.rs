//! Debounced skill suggestions.
//!
//! `Autocomplete` models the suggestion box on the skills screen:
//! keystrokes schedule a fetch that only fires after a quiet period,
//! every keystroke bumps a generation counter, and responses carrying
//! a stale generation are discarded so a slow reply can never
//! overwrite suggestions for a newer query. Time is passed in
//! explicitly, which keeps the debounce testable without sleeping.

use std::time::{Duration, Instant};

/// Quiet period between the last keystroke and the suggestion fetch.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// Minimum trimmed query length before suggestions are requested.
pub const MIN_QUERY_CHARS: usize = 2;

/// A due suggestion fetch, handed to the caller by [`Autocomplete::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation the response must carry to be applied.
    pub generation: u64,
    /// Trimmed query text to search for.
    pub query: String,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    query: String,
    due_at: Instant,
}

/// Debounced, generation-stamped suggestion state.
#[derive(Debug)]
pub struct Autocomplete {
    query: String,
    suggestions: Vec<String>,
    highlighted: Option<usize>,
    open: bool,
    generation: u64,
    pending: Option<Pending>,
    debounce: Duration,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl Autocomplete {
    pub fn new() -> Self {
        Self::with_debounce(DEBOUNCE)
    }

    /// Custom quiet period, used by tests to keep clocks synthetic.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            highlighted: None,
            open: false,
            generation: 0,
            pending: None,
            debounce,
        }
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Suggestions from the last applied response.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Index of the highlighted suggestion, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// True while the suggestion list is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True while a fetch is scheduled but not yet due.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a keystroke at `now`. Every call bumps the generation,
    /// so responses to earlier queries become stale immediately.
    /// Queries shorter than [`MIN_QUERY_CHARS`] clear the list and
    /// cancel any scheduled fetch without touching the network.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();
        self.generation += 1;
        self.highlighted = None;

        let trimmed = self.query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.pending = None;
            self.suggestions.clear();
            self.open = false;
            return;
        }

        self.pending = Some(Pending {
            generation: self.generation,
            query: trimmed.to_string(),
            due_at: now + self.debounce,
        });
    }

    /// Returns the fetch that became due by `now`, at most once per
    /// scheduled keystroke. Callers drive this from their tick loop.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        let due = matches!(&self.pending, Some(p) if now >= p.due_at);
        if !due {
            return None;
        }
        self.pending.take().map(|p| FetchRequest {
            generation: p.generation,
            query: p.query,
        })
    }

    /// Applies a fetched suggestion list. Responses stamped with an
    /// old generation are discarded and `false` is returned.
    pub fn apply(&mut self, generation: u64, suggestions: Vec<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.open = !suggestions.is_empty();
        self.suggestions = suggestions;
        self.highlighted = None;
        true
    }

    /// Moves the highlight down, clamped to the last suggestion.
    pub fn key_down(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    /// Moves the highlight up, clamped to the first suggestion. Once
    /// a highlight exists it never goes back to none.
    pub fn key_up(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => i.saturating_sub(1),
        });
    }

    /// The value a commit should add: the highlighted suggestion when
    /// one is selected, else the trimmed query. Does not mutate;
    /// callers clear the session after the commit attempt whether or
    /// not the add went through.
    pub fn commit_candidate(&self) -> Option<String> {
        if self.open {
            if let Some(choice) = self.highlighted.and_then(|i| self.suggestions.get(i)) {
                return Some(choice.clone());
            }
        }
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Clears query, suggestions and any scheduled fetch. The
    /// generation bump makes in-flight responses stale.
    pub fn clear_session(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.highlighted = None;
        self.open = false;
        self.pending = None;
        self.generation += 1;
    }

    /// Escape: identical to a session clear.
    pub fn escape(&mut self) {
        self.clear_session();
    }

    /// Closes the list without touching the query.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.highlighted = None;
    }

    /// Reopens the list when cached suggestions exist.
    pub fn focus(&mut self) {
        if !self.suggestions.is_empty() {
            self.open = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_short_query_never_schedules() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();

        ac.input("S", t0);

        assert!(!ac.has_pending());
        assert_eq!(ac.poll(at(t0, 10_000)), None);
        assert!(!ac.is_open());
    }

    #[test]
    fn test_whitespace_padding_does_not_count() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();

        ac.input("  S  ", t0);

        assert!(!ac.has_pending());
    }

    #[test]
    fn test_fetch_fires_only_after_quiet_period() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("SQ", t0);

        assert_eq!(ac.poll(t0), None);
        assert_eq!(ac.poll(at(t0, 249)), None);

        let request = ac.poll(at(t0, 250)).unwrap();
        assert_eq!(request.query, "SQ");
        // Drained: the same keystroke never fires twice.
        assert_eq!(ac.poll(at(t0, 500)), None);
    }

    #[test]
    fn test_retyping_supersedes_the_scheduled_fetch() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("SQ", t0);
        ac.input("SQL", at(t0, 100));

        // The first keystroke's deadline passes without a fetch.
        assert_eq!(ac.poll(at(t0, 260)), None);

        let request = ac.poll(at(t0, 350)).unwrap();
        assert_eq!(request.query, "SQL");
        assert_eq!(ac.poll(at(t0, 10_000)), None);
    }

    #[test]
    fn test_query_is_trimmed_for_the_fetch() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("  SQL  ", t0);

        let request = ac.poll(at(t0, 250)).unwrap();
        assert_eq!(request.query, "SQL");
        assert_eq!(ac.query(), "  SQL  ");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("SQ", t0);
        let request = ac.poll(at(t0, 250)).unwrap();

        // User keeps typing while the fetch is in flight.
        ac.input("SQL", at(t0, 300));

        assert!(!ac.apply(request.generation, vec!["SQL".to_string()]));
        assert!(ac.suggestions().is_empty());
        assert!(!ac.is_open());
    }

    #[test]
    fn test_fresh_response_opens_the_list() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("SQ", t0);
        let request = ac.poll(at(t0, 250)).unwrap();

        assert!(ac.apply(
            request.generation,
            vec!["SQL".to_string(), "SQLAlchemy".to_string()]
        ));
        assert!(ac.is_open());
        assert_eq!(ac.suggestions().len(), 2);
        assert_eq!(ac.highlighted(), None);
    }

    #[test]
    fn test_empty_response_keeps_the_list_closed() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("zz", t0);
        let request = ac.poll(at(t0, 250)).unwrap();

        assert!(ac.apply(request.generation, Vec::new()));
        assert!(!ac.is_open());
    }

    fn opened(suggestions: &[&str]) -> Autocomplete {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("qu", t0);
        let request = ac.poll(at(t0, 250)).unwrap();
        ac.apply(
            request.generation,
            suggestions.iter().map(|s| s.to_string()).collect(),
        );
        ac
    }

    #[test]
    fn test_key_down_clamps_to_last() {
        let mut ac = opened(&["SQL", "Python"]);

        ac.key_down();
        assert_eq!(ac.highlighted(), Some(0));
        ac.key_down();
        assert_eq!(ac.highlighted(), Some(1));
        ac.key_down();
        assert_eq!(ac.highlighted(), Some(1));
    }

    #[test]
    fn test_key_up_clamps_to_first_and_never_unhighlights() {
        let mut ac = opened(&["SQL", "Python"]);

        ac.key_up();
        assert_eq!(ac.highlighted(), Some(0));
        ac.key_up();
        assert_eq!(ac.highlighted(), Some(0));
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut ac = Autocomplete::new();

        ac.key_down();
        ac.key_up();

        assert_eq!(ac.highlighted(), None);
    }

    #[test]
    fn test_typing_resets_the_highlight() {
        let mut ac = opened(&["SQL", "Python"]);
        ac.key_down();

        ac.input("que", Instant::now());

        assert_eq!(ac.highlighted(), None);
    }

    #[test]
    fn test_commit_prefers_the_highlighted_suggestion() {
        let mut ac = opened(&["SQL", "Python"]);
        ac.key_down();
        ac.key_down();

        assert_eq!(ac.commit_candidate(), Some("Python".to_string()));
    }

    #[test]
    fn test_commit_falls_back_to_the_typed_query() {
        let mut ac = Autocomplete::new();
        ac.input("  Kafka  ", Instant::now());

        assert_eq!(ac.commit_candidate(), Some("Kafka".to_string()));
    }

    #[test]
    fn test_commit_with_nothing_typed_is_none() {
        let ac = Autocomplete::new();

        assert_eq!(ac.commit_candidate(), None);
    }

    #[test]
    fn test_clear_session_invalidates_in_flight_responses() {
        let mut ac = Autocomplete::new();
        let t0 = Instant::now();
        ac.input("SQ", t0);
        let request = ac.poll(at(t0, 250)).unwrap();

        ac.clear_session();

        assert!(!ac.apply(request.generation, vec!["SQL".to_string()]));
        assert_eq!(ac.query(), "");
        assert!(ac.suggestions().is_empty());
        assert!(!ac.has_pending());
    }

    #[test]
    fn test_dismiss_keeps_query_and_focus_reopens() {
        let mut ac = opened(&["SQL"]);

        ac.dismiss();
        assert!(!ac.is_open());
        assert_eq!(ac.query(), "qu");

        ac.focus();
        assert!(ac.is_open());
    }

    #[test]
    fn test_escape_clears_everything() {
        let mut ac = opened(&["SQL"]);

        ac.escape();

        assert_eq!(ac.query(), "");
        assert!(!ac.is_open());
        assert!(ac.suggestions().is_empty());
    }
}

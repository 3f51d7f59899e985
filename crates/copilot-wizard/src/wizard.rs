//! The history-synchronized screen controller.
//!
//! `Wizard` owns the current screen, the navigation ledger, the
//! accumulated [`WizardState`] and the generated plan, and keeps the
//! on-disk session in step with every change. Screens drive it through
//! a small set of operations; it enforces the one global navigation
//! guard (no result screen without a plan) in every path that can
//! reach the result: deep links, pop events and explicit transitions
//! all funnel through the same check.

use tracing::{debug, warn};

use copilot_models::{PlanResponse, RemovedSkill, Skill, SkillLevel, StatePatch, WizardState};
use copilot_persistence::SessionStore;

use crate::history::{NavEvent, NavHistory};
use crate::screen::Screen;

/// Screen controller and session owner.
#[derive(Debug)]
pub struct Wizard {
    screen: Screen,
    history: NavHistory,
    state: WizardState,
    plan: Option<PlanResponse>,
    store: SessionStore,
}

impl Wizard {
    /// Builds the wizard: rehydrates state and plan from the store,
    /// resolves the initial screen from the deep-link fragment (any
    /// unknown fragment degrades to welcome), and seeds the ledger
    /// with replace semantics so startup leaves no extra entry behind.
    pub fn new(store: SessionStore, fragment: Option<&str>) -> Self {
        let state = store.load_state();
        let plan = store.load_plan();

        let requested = fragment
            .and_then(Screen::from_fragment)
            .unwrap_or_default();
        let screen = if requested == Screen::Result && plan.is_none() {
            debug!("deep link to result without a plan, starting on confirm");
            Screen::Confirm
        } else {
            requested
        };

        let mut history = NavHistory::new();
        history.replace(screen);

        Self {
            screen,
            history,
            state,
            plan,
            store,
        }
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Accumulated state.
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Generated plan, if one exists.
    pub fn plan(&self) -> Option<&PlanResponse> {
        self.plan.as_ref()
    }

    /// True once a plan has been generated (or rehydrated).
    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }

    /// Navigation ledger, read-only.
    pub fn history(&self) -> &NavHistory {
        &self.history
    }

    /// Moves to a screen, recording the transition. `replace` swaps
    /// the current ledger entry instead of pushing a new one.
    pub fn go_to(&mut self, screen: Screen, replace: bool) {
        let screen = self.guard(screen);
        debug!(
            "navigate {} -> {} (replace={replace})",
            self.screen.fragment(),
            screen.fragment()
        );
        self.screen = screen;
        if replace {
            self.history.replace(screen);
        } else {
            self.history.push(screen);
        }
    }

    /// Applies an inbound navigation event: the target comes from the
    /// attached state, else from the fragment, else welcome. Returns
    /// the screen actually landed on.
    pub fn handle_nav(&mut self, event: &NavEvent) -> Screen {
        let target = event
            .state
            .or_else(|| Screen::from_fragment(&event.fragment))
            .unwrap_or_default();
        let target = self.guard(target);
        self.screen = target;
        // The guard may have rewritten the entry the cursor points at.
        self.history.replace(target);
        target
    }

    /// Redirects a result target to confirm while no plan exists. The
    /// redirect is silent and uses replace semantics everywhere.
    fn guard(&self, target: Screen) -> Screen {
        if target == Screen::Result && self.plan.is_none() {
            debug!("redirecting result -> confirm (no plan)");
            Screen::Confirm
        } else {
            target
        }
    }

    /// Browser-back equivalent: pops the ledger when an earlier entry
    /// exists, else degrades to a replacing transition to the linear
    /// predecessor (covers deep-link starts with a bare ledger).
    pub fn back(&mut self) -> Screen {
        if let Some(event) = self.history.back() {
            self.handle_nav(&event)
        } else if let Some(prev) = self.screen.prev() {
            self.go_to(prev, true);
            prev
        } else {
            self.screen
        }
    }

    /// Browser-forward equivalent. `None` when already at the newest
    /// entry.
    pub fn forward(&mut self) -> Option<Screen> {
        let event = self.history.forward()?;
        Some(self.handle_nav(&event))
    }

    /// Applies a partial state update and persists the result.
    pub fn update(&mut self, patch: StatePatch) {
        self.state.apply(patch);
        self.persist_state();
    }

    /// Adds a skill (trimmed, case-insensitively deduplicated) and
    /// persists on success.
    pub fn add_skill(&mut self, name: &str, level: SkillLevel) -> bool {
        let added = self.state.add_skill(name, level);
        if added {
            self.persist_state();
        }
        added
    }

    /// Removes the skill at `index`, persisting the change. The
    /// returned value feeds the undo toast.
    pub fn remove_skill(&mut self, index: usize) -> Option<RemovedSkill> {
        let removed = self.state.remove_skill(index);
        if removed.is_some() {
            self.persist_state();
        }
        removed
    }

    /// Undoes a removal, restoring the skill at its original position.
    pub fn restore_skill(&mut self, removed: RemovedSkill) {
        self.state.restore_skill(removed);
        self.persist_state();
    }

    /// Changes a skill's level and persists.
    pub fn set_skill_level(&mut self, index: usize, level: SkillLevel) -> bool {
        let changed = self.state.set_skill_level(index, level);
        if changed {
            self.persist_state();
        }
        changed
    }

    /// Merges extracted skills into the inventory, persisting when
    /// anything was added. Returns the number of new skills.
    pub fn merge_skills(&mut self, incoming: &[Skill]) -> usize {
        let added = self.state.merge_skills(incoming);
        if added > 0 {
            self.persist_state();
        }
        added
    }

    /// Stores a freshly generated plan and persists it. The result
    /// screen becomes reachable from here on.
    pub fn set_plan(&mut self, plan: PlanResponse) {
        if let Err(err) = self.store.save_plan(Some(&plan)) {
            warn!("failed to persist plan: {err}");
        }
        self.plan = Some(plan);
    }

    /// Returns the wizard to a blank welcome: clears state, plan and
    /// both storage keys, with a replacing transition so a following
    /// back does not land on the pre-reset screen.
    pub fn reset(&mut self) {
        debug!("resetting session");
        self.state = WizardState::default();
        self.plan = None;
        if let Err(err) = self.store.clear() {
            warn!("failed to clear stored session: {err}");
        }
        self.go_to(Screen::Welcome, true);
    }

    fn persist_state(&self) {
        if let Err(err) = self.store.save_state(&self.state) {
            warn!("failed to persist wizard state: {err}");
        }
    }
}

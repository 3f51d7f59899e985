//! Application state for the wizard TUI.
//!
//! `App` owns the wizard core, the async runtime and every per-screen
//! view detail. Keyboard routing happens here; background requests run
//! on the runtime and report back through an in-process channel that
//! [`App::tick`] drains once per frame.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use copilot_api::{cancel_pair, is_pdf_filename, ApiClient, CancelHandle, ClientError};
use copilot_models::{
    Analysis, FocusedPlan, FocusedPlanRequest, Grade, PlanRequest, PlanResponse, ResumeAnalysis,
    Scenario, SkillLevel, StatePatch,
};
use copilot_persistence::SessionStore;
use copilot_wizard::{
    validate_goal, validate_skills, Autocomplete, FetchRequest, Screen, ValidationError, Wizard,
};

use super::widgets::{ProgressTimer, SearchSelect, Toast, PICKER_LEVELS};

/// Shared message for connectivity failures.
pub const CONNECTION_ERROR: &str =
    "Не получилось загрузить данные. Проверьте соединение и попробуйте ещё раз.";

/// Advisory duration of the full plan build, for the gauge.
const PLAN_BUILD_EXPECTED: Duration = Duration::from_secs(30);

/// Advisory duration of the focused plan build.
const FOCUSED_PLAN_EXPECTED: Duration = Duration::from_secs(20);

/// How many quick-add chips to offer at most.
const QUICK_ADD_LIMIT: usize = 20;

/// Result of a background request, delivered to the UI thread.
#[derive(Debug)]
pub enum AppMsg {
    Health(bool),
    Professions(Result<Vec<String>, ClientError>),
    RoleSkills {
        generation: u64,
        result: Result<Vec<String>, ClientError>,
    },
    Suggestions {
        generation: u64,
        result: Result<Vec<String>, ClientError>,
    },
    ResumeParsed(Result<ResumeAnalysis, ClientError>),
    PlanBuilt(Result<PlanResponse, ClientError>),
    FocusedPlanBuilt(Result<FocusedPlan, ClientError>),
}

/// Backend availability, checked once on startup and on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Checking,
    Up,
    Down,
}

/// Focusable fields on the goal screen, in tab order. Target only
/// participates for the profession-switch scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Profession,
    Scenario,
    Target,
    Grade,
    Continue,
}

/// Focusable sections on the skills screen, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillsFocus {
    Input,
    QuickAdd,
    List,
    Resume,
    Continue,
}

/// Banner shown under the resume section after an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadNotice {
    Success(String),
    Info(String),
    Error { title: String, text: String },
}

/// All runtime state of the TUI.
pub struct App {
    /// Wizard core: screen, history, state, plan.
    pub wizard: Wizard,
    /// Backend client, shared with background tasks.
    pub api: Arc<ApiClient>,
    /// Runtime the requests run on.
    pub runtime: Runtime,
    pub tx: UnboundedSender<AppMsg>,
    pub rx: UnboundedReceiver<AppMsg>,
    pub should_quit: bool,
    pub service: ServiceStatus,

    // Goal screen
    pub professions: Vec<String>,
    pub professions_loading: bool,
    pub goal_focus: GoalField,
    pub scenario_cursor: usize,
    pub profession_select: SearchSelect,
    pub target_select: SearchSelect,
    pub goal_error: Option<String>,

    // Skills screen
    pub skills_focus: SkillsFocus,
    pub autocomplete: Autocomplete,
    pub role_skills: Vec<String>,
    /// Profession the chips were last requested for.
    pub role_skills_for: String,
    pub role_skills_generation: u64,
    pub quick_cursor: usize,
    pub skill_cursor: usize,
    pub resume_path: String,
    pub resume_loading: bool,
    pub upload_notice: Option<UploadNotice>,
    pub skills_error: Option<String>,
    pub toast: Option<Toast>,

    // Confirm screen
    pub building: bool,
    pub build_progress: Option<ProgressTimer>,
    pub confirm_error: Option<String>,

    // Result screen
    pub result_scroll: u16,
    pub gap_cursor: usize,
    pub selected_gaps: Vec<String>,
    pub focused_plan: Option<FocusedPlan>,
    pub focused_loading: bool,
    pub focused_progress: Option<ProgressTimer>,
    pub focused_error: Option<String>,
    pub export_notice: Option<String>,

    // In-flight request handles; dropping one cancels the request
    pub professions_request: Option<CancelHandle>,
    pub role_request: Option<CancelHandle>,
    pub suggest_request: Option<CancelHandle>,
    pub resume_request: Option<CancelHandle>,
    pub plan_request: Option<CancelHandle>,
    pub focused_request: Option<CancelHandle>,
}

impl App {
    /// Creates the app, rehydrating the saved session and honoring a
    /// start screen request.
    pub fn new(state_dir: &Path, api_base: &str, screen: Option<&str>) -> io::Result<Self> {
        let store = SessionStore::new(state_dir);
        let wizard = Wizard::new(store, screen);
        let runtime = Runtime::new()?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            wizard,
            api: Arc::new(ApiClient::new(api_base)),
            runtime,
            tx,
            rx,
            should_quit: false,
            service: ServiceStatus::Checking,
            professions: Vec::new(),
            professions_loading: false,
            goal_focus: GoalField::Profession,
            scenario_cursor: 0,
            profession_select: SearchSelect::new(),
            target_select: SearchSelect::new(),
            goal_error: None,
            skills_focus: SkillsFocus::Input,
            autocomplete: Autocomplete::new(),
            role_skills: Vec::new(),
            role_skills_for: String::new(),
            role_skills_generation: 0,
            quick_cursor: 0,
            skill_cursor: 0,
            resume_path: String::new(),
            resume_loading: false,
            upload_notice: None,
            skills_error: None,
            toast: None,
            building: false,
            build_progress: None,
            confirm_error: None,
            result_scroll: 0,
            gap_cursor: 0,
            selected_gaps: Vec::new(),
            focused_plan: None,
            focused_loading: false,
            focused_progress: None,
            focused_error: None,
            export_notice: None,
            professions_request: None,
            role_request: None,
            suggest_request: None,
            resume_request: None,
            plan_request: None,
            focused_request: None,
        };

        app.scenario_cursor = app
            .wizard
            .state()
            .scenario
            .and_then(|s| Scenario::ALL.iter().position(|v| *v == s))
            .unwrap_or(0);

        app.check_health();
        app.enter_screen(app.wizard.screen());
        Ok(app)
    }

    /// Pings the backend; the answer flips the availability gate.
    pub fn check_health(&mut self) {
        self.service = ServiceStatus::Checking;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let up = api.health().await;
            let _ = tx.send(AppMsg::Health(up));
        });
    }

    /// Advances time-driven work: drains request results, fires due
    /// suggestion fetches, expires the toast.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_msg(msg);
        }
        if let Some(request) = self.autocomplete.poll(now) {
            self.fetch_suggestions(request);
        }
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    /// Routes a key press to the active screen.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Until the backend answers, only retry and quit work
        if self.service != ServiceStatus::Up {
            match key.code {
                KeyCode::Enter | KeyCode::Char('r') => {
                    if self.service == ServiceStatus::Down {
                        self.check_health();
                    }
                }
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
            return;
        }

        // History shortcuts work on every screen
        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Left => {
                    self.go_back();
                    return;
                }
                KeyCode::Right => {
                    self.go_forward();
                    return;
                }
                _ => {}
            }
        }

        match self.wizard.screen() {
            Screen::Welcome => self.handle_welcome_key(key),
            Screen::Goal => self.handle_goal_key(key),
            Screen::Skills => self.handle_skills_key(key, now),
            Screen::Confirm => self.handle_confirm_key(key, now),
            Screen::Result => self.handle_result_key(key, now),
        }
    }

    fn handle_welcome_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.navigate(Screen::Goal, false),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_goal_key(&mut self, key: KeyEvent) {
        // An open picker captures the keyboard
        if self.profession_select.is_open() {
            if let Some(choice) = route_select_key(&mut self.profession_select, key) {
                self.wizard.update(StatePatch::profession(choice));
                self.goal_error = None;
                // The skills screen refetches its chips for the new role
                self.role_skills_for.clear();
            }
            return;
        }
        if self.target_select.is_open() {
            if let Some(choice) = route_select_key(&mut self.target_select, key) {
                self.wizard.update(StatePatch::target_profession(choice));
                self.goal_error = None;
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.goal_focus = self.next_goal_field(self.goal_focus);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.goal_focus = self.prev_goal_field(self.goal_focus);
            }
            KeyCode::Enter => match self.goal_focus {
                GoalField::Profession => self.profession_select.open(),
                GoalField::Target => self.target_select.open(),
                GoalField::Scenario => self.apply_scenario(),
                GoalField::Grade => {}
                GoalField::Continue => self.try_advance_goal(),
            },
            KeyCode::Left => match self.goal_focus {
                GoalField::Scenario => {
                    self.scenario_cursor = self.scenario_cursor.saturating_sub(1);
                }
                GoalField::Grade => self.cycle_grade(false),
                _ => {}
            },
            KeyCode::Right => match self.goal_focus {
                GoalField::Scenario => {
                    self.scenario_cursor =
                        (self.scenario_cursor + 1).min(Scenario::ALL.len() - 1);
                }
                GoalField::Grade => self.cycle_grade(true),
                _ => {}
            },
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_skills_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+Z restores the last removed skill while the toast lives
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('z') {
            self.undo_removal();
            return;
        }

        match self.skills_focus {
            SkillsFocus::Input => self.handle_skill_input_key(key, now),
            SkillsFocus::QuickAdd => self.handle_quick_add_key(key),
            SkillsFocus::List => self.handle_skill_list_key(key, now),
            SkillsFocus::Resume => self.handle_resume_key(key),
            SkillsFocus::Continue => match key.code {
                KeyCode::Enter => self.try_advance_skills(),
                KeyCode::Tab => {
                    self.skills_focus = SkillsFocus::Input;
                    self.autocomplete.focus();
                }
                KeyCode::BackTab => self.skills_focus = SkillsFocus::Resume,
                KeyCode::Esc => self.go_back(),
                _ => {}
            },
        }
    }

    fn handle_skill_input_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) => {
                let mut query = self.autocomplete.query().to_string();
                query.push(c);
                self.autocomplete.input(query, now);
            }
            KeyCode::Backspace => {
                let mut query = self.autocomplete.query().to_string();
                query.pop();
                self.autocomplete.input(query, now);
            }
            KeyCode::Down => self.autocomplete.key_down(),
            KeyCode::Up => self.autocomplete.key_up(),
            KeyCode::Enter => self.commit_skill_entry(),
            KeyCode::Esc => {
                if self.autocomplete.is_open() || !self.autocomplete.query().is_empty() {
                    self.autocomplete.escape();
                } else {
                    self.go_back();
                }
            }
            KeyCode::Tab => {
                self.autocomplete.dismiss();
                self.skills_focus = SkillsFocus::QuickAdd;
            }
            KeyCode::BackTab => {
                self.autocomplete.dismiss();
                self.skills_focus = SkillsFocus::Continue;
            }
            _ => {}
        }
    }

    /// Enter in the skill input: a highlighted suggestion wins, else
    /// the typed text is added as is. The entry session ends either
    /// way, even when the skill was already present.
    fn commit_skill_entry(&mut self) {
        if let Some(name) = self.autocomplete.commit_candidate() {
            self.wizard.add_skill(&name, SkillLevel::Basic);
            self.skills_error = None;
        }
        self.autocomplete.clear_session();
    }

    fn handle_quick_add_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.quick_cursor = self.quick_cursor.saturating_sub(1),
            KeyCode::Right => {
                let chips = self.quick_add().len();
                if chips > 0 {
                    self.quick_cursor = (self.quick_cursor + 1).min(chips - 1);
                }
            }
            KeyCode::Enter => self.add_quick_skill(),
            KeyCode::Tab => self.skills_focus = SkillsFocus::List,
            KeyCode::BackTab => {
                self.skills_focus = SkillsFocus::Input;
                self.autocomplete.focus();
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn add_quick_skill(&mut self) {
        let name = match self.quick_add().get(self.quick_cursor).map(|s| s.to_string()) {
            Some(name) => name,
            None => return,
        };
        self.wizard.add_skill(&name, SkillLevel::Basic);
        self.skills_error = None;
        let chips = self.quick_add().len();
        self.quick_cursor = if chips == 0 {
            0
        } else {
            self.quick_cursor.min(chips - 1)
        };
    }

    fn handle_skill_list_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up => self.skill_cursor = self.skill_cursor.saturating_sub(1),
            KeyCode::Down => {
                let count = self.wizard.state().skills.len();
                if count > 0 {
                    self.skill_cursor = (self.skill_cursor + 1).min(count - 1);
                }
            }
            KeyCode::Left => self.cycle_skill_level(false),
            KeyCode::Right => self.cycle_skill_level(true),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_skill(now),
            KeyCode::Tab => self.skills_focus = SkillsFocus::Resume,
            KeyCode::BackTab => self.skills_focus = SkillsFocus::QuickAdd,
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn cycle_skill_level(&mut self, forward: bool) {
        let level = match self.wizard.state().skills.get(self.skill_cursor) {
            Some(skill) => skill.level,
            None => return,
        };
        let position = PICKER_LEVELS
            .iter()
            .position(|(l, _)| *l == level)
            .unwrap_or(0);
        let next = if forward {
            (position + 1).min(PICKER_LEVELS.len() - 1)
        } else {
            position.saturating_sub(1)
        };
        self.wizard.set_skill_level(self.skill_cursor, PICKER_LEVELS[next].0);
    }

    fn remove_selected_skill(&mut self, now: Instant) {
        if let Some(removed) = self.wizard.remove_skill(self.skill_cursor) {
            let message = format!("Навык «{}» удалён", removed.skill.name);
            self.toast = Some(Toast::with_undo(message, removed, now));
            let count = self.wizard.state().skills.len();
            self.skill_cursor = if count == 0 {
                0
            } else {
                self.skill_cursor.min(count - 1)
            };
        }
    }

    fn undo_removal(&mut self) {
        if let Some(toast) = self.toast.take() {
            if let Some(removed) = toast.undo {
                self.wizard.restore_skill(removed);
            }
        }
    }

    fn handle_resume_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.resume_path.push(c),
            KeyCode::Backspace => {
                self.resume_path.pop();
            }
            KeyCode::Enter => self.upload_resume(),
            KeyCode::Tab => self.skills_focus = SkillsFocus::Continue,
            KeyCode::BackTab => self.skills_focus = SkillsFocus::List,
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, now: Instant) {
        // While the plan is building the screen does not react
        if self.building {
            return;
        }
        match key.code {
            KeyCode::Enter => self.build_plan(now),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up => self.result_scroll = self.result_scroll.saturating_sub(1),
            KeyCode::Down => self.result_scroll = self.result_scroll.saturating_add(1),
            KeyCode::PageUp => self.result_scroll = self.result_scroll.saturating_sub(10),
            KeyCode::PageDown => self.result_scroll = self.result_scroll.saturating_add(10),
            KeyCode::Left => self.gap_cursor = self.gap_cursor.saturating_sub(1),
            KeyCode::Right => {
                let gaps = self.gap_names().len();
                if gaps > 0 {
                    self.gap_cursor = (self.gap_cursor + 1).min(gaps - 1);
                }
            }
            KeyCode::Char(' ') => self.toggle_gap(),
            KeyCode::Enter => self.build_focused_plan(now),
            KeyCode::Char('s') => self.export_plan(),
            KeyCode::Char('r') => self.reset_session(),
            KeyCode::Char('n') => self.navigate(Screen::Skills, false),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn apply_scenario(&mut self) {
        let scenario = Scenario::ALL[self.scenario_cursor.min(Scenario::ALL.len() - 1)];
        self.wizard.update(StatePatch::scenario(scenario));
        self.goal_error = None;
        // Dropping the switch scenario removes Target from the ring
        if self.goal_focus == GoalField::Target && !scenario.requires_target() {
            self.goal_focus = GoalField::Scenario;
        }
    }

    fn cycle_grade(&mut self, forward: bool) {
        let grades = Grade::ALL;
        let current = grades
            .iter()
            .position(|g| *g == self.wizard.state().grade)
            .unwrap_or(0);
        let next = if forward {
            (current + 1).min(grades.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.wizard.update(StatePatch::grade(grades[next]));
    }

    /// Tab order on the goal screen for the current scenario.
    fn goal_fields(&self) -> Vec<GoalField> {
        let needs_target = self
            .wizard
            .state()
            .scenario
            .map(|s| s.requires_target())
            .unwrap_or(false);
        let mut fields = vec![GoalField::Profession, GoalField::Scenario];
        if needs_target {
            fields.push(GoalField::Target);
        }
        fields.push(GoalField::Grade);
        fields.push(GoalField::Continue);
        fields
    }

    fn next_goal_field(&self, current: GoalField) -> GoalField {
        let fields = self.goal_fields();
        let index = fields.iter().position(|f| *f == current).unwrap_or(0);
        fields[(index + 1) % fields.len()]
    }

    fn prev_goal_field(&self, current: GoalField) -> GoalField {
        let fields = self.goal_fields();
        let index = fields.iter().position(|f| *f == current).unwrap_or(0);
        fields[(index + fields.len() - 1) % fields.len()]
    }

    fn try_advance_goal(&mut self) {
        match validate_goal(self.wizard.state()) {
            Ok(()) => {
                self.goal_error = None;
                self.navigate(Screen::Skills, false);
            }
            Err(err) => self.goal_error = Some(err.to_string()),
        }
    }

    fn try_advance_skills(&mut self) {
        match validate_skills(self.wizard.state()) {
            Ok(()) => {
                self.skills_error = None;
                self.navigate(Screen::Confirm, false);
            }
            Err(err) => self.skills_error = Some(err.to_string()),
        }
    }

    /// Switches screens, cancelling requests the old screen owns.
    pub fn navigate(&mut self, screen: Screen, replace: bool) {
        self.cancel_screen_requests(self.wizard.screen());
        self.wizard.go_to(screen, replace);
        self.enter_screen(self.wizard.screen());
    }

    /// Alt+Left: pops the navigation ledger.
    pub fn go_back(&mut self) {
        self.cancel_screen_requests(self.wizard.screen());
        let screen = self.wizard.back();
        self.enter_screen(screen);
    }

    /// Alt+Right: redo after back.
    pub fn go_forward(&mut self) {
        if !self.wizard.history().can_go_forward() {
            return;
        }
        self.cancel_screen_requests(self.wizard.screen());
        if let Some(screen) = self.wizard.forward() {
            self.enter_screen(screen);
        }
    }

    fn enter_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Goal => self.fetch_professions(),
            Screen::Skills => self.fetch_role_skills(),
            _ => {}
        }
    }

    fn cancel_screen_requests(&mut self, screen: Screen) {
        match screen {
            Screen::Welcome => {}
            Screen::Goal => {
                self.professions_request = None;
                self.professions_loading = false;
            }
            Screen::Skills => {
                self.role_request = None;
                self.suggest_request = None;
                self.resume_request = None;
                self.resume_loading = false;
            }
            Screen::Confirm => {
                self.plan_request = None;
                self.building = false;
                self.build_progress = None;
            }
            Screen::Result => {
                self.focused_request = None;
                self.focused_loading = false;
                self.focused_progress = None;
            }
        }
    }

    fn fetch_professions(&mut self) {
        if self.professions_loading || !self.professions.is_empty() {
            return;
        }
        self.professions_loading = true;
        let (handle, token) = cancel_pair();
        self.professions_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.professions(&token).await;
            let _ = tx.send(AppMsg::Professions(result));
        });
    }

    fn fetch_role_skills(&mut self) {
        let profession = self.wizard.state().profession.clone();
        if profession.is_empty() || profession == self.role_skills_for {
            return;
        }
        self.role_skills_generation += 1;
        let generation = self.role_skills_generation;
        self.role_skills_for = profession.clone();
        self.role_skills.clear();
        self.quick_cursor = 0;
        let (handle, token) = cancel_pair();
        self.role_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.skills_for_role(&profession, &token).await;
            let _ = tx.send(AppMsg::RoleSkills { generation, result });
        });
    }

    fn fetch_suggestions(&mut self, request: FetchRequest) {
        let (handle, token) = cancel_pair();
        self.suggest_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.suggest_skills(&request.query, &token).await;
            let _ = tx.send(AppMsg::Suggestions {
                generation: request.generation,
                result,
            });
        });
    }

    fn upload_resume(&mut self) {
        let path_text = self.resume_path.trim().to_string();
        if path_text.is_empty() || self.resume_loading {
            return;
        }
        let file_name = Path::new(&path_text)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        // Wrong extensions are rejected before any I/O happens
        if !is_pdf_filename(&file_name) {
            self.upload_notice = Some(UploadNotice::Error {
                title: "Нужен PDF-файл".to_string(),
                text: "Если резюме в другом формате — сохраните его как PDF и попробуйте снова."
                    .to_string(),
            });
            return;
        }
        let bytes = match std::fs::read(&path_text) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path_text, error = %err, "Resume read failed");
                self.upload_notice = Some(UploadNotice::Error {
                    title: "Не получилось прочитать файл".to_string(),
                    text: "Проверьте путь и попробуйте ещё раз.".to_string(),
                });
                return;
            }
        };
        self.resume_loading = true;
        self.upload_notice = None;
        let (handle, token) = cancel_pair();
        self.resume_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.analyze_resume(&file_name, bytes, &token).await;
            let _ = tx.send(AppMsg::ResumeParsed(result));
        });
    }

    fn build_plan(&mut self, now: Instant) {
        if self.building {
            return;
        }
        self.confirm_error = None;
        if let Err(err) = validate_goal(self.wizard.state()) {
            self.confirm_error = Some(err.to_string());
            return;
        }
        if let Err(err) = validate_skills(self.wizard.state()) {
            self.confirm_error = Some(err.to_string());
            return;
        }
        let request = match PlanRequest::from_state(self.wizard.state()) {
            Some(request) => request,
            None => {
                self.confirm_error = Some(ValidationError::MissingScenario.to_string());
                return;
            }
        };
        self.building = true;
        self.build_progress = Some(ProgressTimer::new(now, PLAN_BUILD_EXPECTED));
        let (handle, token) = cancel_pair();
        self.plan_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.build_plan(&request, &token).await;
            let _ = tx.send(AppMsg::PlanBuilt(result));
        });
    }

    fn build_focused_plan(&mut self, now: Instant) {
        if self.focused_loading || self.focused_plan.is_some() || self.selected_gaps.is_empty() {
            return;
        }
        self.focused_error = None;
        let request =
            match FocusedPlanRequest::from_state(self.wizard.state(), self.selected_gaps.clone()) {
                Some(request) => request,
                None => return,
            };
        self.focused_loading = true;
        self.focused_progress = Some(ProgressTimer::new(now, FOCUSED_PLAN_EXPECTED));
        let (handle, token) = cancel_pair();
        self.focused_request = Some(handle);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.focused_plan(&request, &token).await;
            let _ = tx.send(AppMsg::FocusedPlanBuilt(result));
        });
    }

    /// Applies a background result to the view state.
    pub fn handle_msg(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::Health(up) => {
                self.service = if up {
                    ServiceStatus::Up
                } else {
                    ServiceStatus::Down
                };
            }
            AppMsg::Professions(result) => {
                self.professions_loading = false;
                self.professions_request = None;
                match result {
                    Ok(options) => {
                        self.professions = options.clone();
                        self.profession_select.set_options(options.clone());
                        self.target_select.set_options(options);
                        self.goal_error = None;
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        warn!(error = %err, "Profession list failed");
                        self.goal_error = Some(CONNECTION_ERROR.to_string());
                    }
                }
            }
            AppMsg::RoleSkills { generation, result } => {
                // A newer profession superseded this request
                if generation != self.role_skills_generation {
                    return;
                }
                self.role_request = None;
                match result {
                    Ok(skills) => {
                        self.role_skills = skills;
                        self.quick_cursor = 0;
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => warn!(error = %err, "Role skills failed"),
                }
            }
            AppMsg::Suggestions { generation, result } => {
                self.suggest_request = None;
                match result {
                    Ok(suggestions) => {
                        self.autocomplete.apply(generation, suggestions);
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => warn!(error = %err, "Suggestions failed"),
                }
            }
            AppMsg::ResumeParsed(result) => {
                self.resume_loading = false;
                self.resume_request = None;
                match result {
                    Ok(analysis) => self.apply_resume(analysis),
                    Err(err) if err.is_cancelled() => {}
                    Err(err) => {
                        warn!(error = %err, "Resume analysis failed");
                        self.upload_notice = Some(upload_error_notice(&err));
                    }
                }
            }
            AppMsg::PlanBuilt(result) => {
                self.building = false;
                self.build_progress = None;
                self.plan_request = None;
                match result {
                    Ok(plan) => {
                        self.wizard.set_plan(plan);
                        self.prepare_result_view();
                        self.navigate(Screen::Result, false);
                    }
                    Err(err) if err.is_cancelled() => {}
                    Err(ClientError::Api { message, .. }) if !message.is_empty() => {
                        self.confirm_error = Some(message);
                    }
                    Err(err) => {
                        warn!(error = %err, "Plan build failed");
                        self.confirm_error = Some(CONNECTION_ERROR.to_string());
                    }
                }
            }
            AppMsg::FocusedPlanBuilt(result) => {
                self.focused_loading = false;
                self.focused_progress = None;
                self.focused_request = None;
                match result {
                    Ok(plan) => self.focused_plan = Some(plan),
                    Err(err) if err.is_cancelled() => {}
                    Err(ClientError::Api { message, .. }) if !message.is_empty() => {
                        self.focused_error = Some(message);
                    }
                    Err(err) => {
                        warn!(error = %err, "Focused plan failed");
                        self.focused_error =
                            Some("Не удалось сформировать план. Попробуйте ещё раз.".to_string());
                    }
                }
            }
        }
    }

    fn apply_resume(&mut self, analysis: ResumeAnalysis) {
        if let Some(message) = &analysis.error {
            warn!(message = %message, "Resume parser reported an error");
        }
        if analysis.skills.is_empty() {
            self.upload_notice = Some(UploadNotice::Info(
                "Мы не нашли навыки в тексте. Попробуйте другой файл или добавьте навыки вручную."
                    .to_string(),
            ));
            return;
        }
        let extracted = analysis.skills.len();
        self.wizard.merge_skills(&analysis.skills);
        self.upload_notice = Some(UploadNotice::Success(format!(
            "Извлечено навыков: {}",
            extracted
        )));
        self.resume_path.clear();
    }

    /// Resets the result view for a freshly built plan.
    fn prepare_result_view(&mut self) {
        self.result_scroll = 0;
        self.gap_cursor = 0;
        self.selected_gaps.clear();
        self.focused_plan = None;
        self.focused_loading = false;
        self.focused_progress = None;
        self.focused_error = None;
        self.export_notice = None;
    }

    fn toggle_gap(&mut self) {
        let name = match self.gap_names().get(self.gap_cursor).cloned() {
            Some(name) => name,
            None => return,
        };
        if let Some(index) = self.selected_gaps.iter().position(|n| *n == name) {
            self.selected_gaps.remove(index);
        } else {
            self.selected_gaps.push(name);
        }
    }

    fn export_plan(&mut self) {
        let markdown = match self.wizard.plan() {
            Some(plan) => plan.markdown.clone(),
            None => return,
        };
        let path = Path::new("career-plan.md");
        match copilot_persistence::atomic_write(path, markdown.as_bytes()) {
            Ok(()) => self.export_notice = Some("Сохранено: career-plan.md".to_string()),
            Err(err) => {
                warn!(error = %err, "Plan export failed");
                self.export_notice = Some("Не получилось сохранить файл".to_string());
            }
        }
    }

    /// Wipes the session and every view remnant, landing on welcome.
    pub fn reset_session(&mut self) {
        self.wizard.reset();

        self.goal_focus = GoalField::Profession;
        self.scenario_cursor = 0;
        self.profession_select.escape();
        self.target_select.escape();
        self.goal_error = None;

        self.skills_focus = SkillsFocus::Input;
        self.autocomplete.clear_session();
        self.role_skills.clear();
        self.role_skills_for.clear();
        self.quick_cursor = 0;
        self.skill_cursor = 0;
        self.resume_path.clear();
        self.resume_loading = false;
        self.upload_notice = None;
        self.skills_error = None;
        self.toast = None;

        self.building = false;
        self.build_progress = None;
        self.confirm_error = None;

        self.prepare_result_view();

        self.professions_request = None;
        self.role_request = None;
        self.suggest_request = None;
        self.resume_request = None;
        self.plan_request = None;
        self.focused_request = None;
    }

    /// Names of the development gaps offered as focus chips.
    pub fn gap_names(&self) -> Vec<String> {
        match self.wizard.plan().and_then(|p| p.analysis.as_ref()) {
            Some(Analysis::Growth(growth)) => {
                growth.skill_gaps.iter().map(|g| g.name.clone()).collect()
            }
            Some(Analysis::Switch(switch)) => {
                switch.gaps.iter().map(|g| g.name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Role skills not yet in the inventory, offered as one-key chips.
    pub fn quick_add(&self) -> Vec<&str> {
        self.role_skills
            .iter()
            .filter(|name| !self.wizard.state().has_skill(name))
            .take(QUICK_ADD_LIMIT)
            .map(String::as_str)
            .collect()
    }
}

/// Feeds a key to an open picker. Returns the committed choice, if any.
fn route_select_key(select: &mut SearchSelect, key: KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(c) => {
            select.push_char(c);
            None
        }
        KeyCode::Backspace => {
            select.pop_char();
            None
        }
        KeyCode::Down => {
            select.key_down();
            None
        }
        KeyCode::Up => {
            select.key_up();
            None
        }
        KeyCode::Enter => select.commit(),
        KeyCode::Esc => {
            select.escape();
            None
        }
        _ => None,
    }
}

/// Maps an upload failure to the banner under the resume section.
fn upload_error_notice(err: &ClientError) -> UploadNotice {
    let (title, text) = match err {
        ClientError::Api { status: 400, .. } => (
            "Нужен PDF-файл",
            "Если резюме в другом формате — сохраните его как PDF и попробуйте снова.",
        ),
        ClientError::Api { status: 503, .. } => (
            "Авторазбор резюме временно недоступен",
            "Сейчас сервис не подключён к модели. Вы можете продолжить: добавьте навыки вручную.",
        ),
        ClientError::Api { .. } => (
            "Не получилось загрузить данные",
            "Проверьте соединение и попробуйте ещё раз. Если ошибка повторяется — откройте страницу позже.",
        ),
        _ => (
            "Не получилось загрузить данные",
            "Проверьте соединение и попробуйте ещё раз.",
        ),
    };
    UploadNotice::Error {
        title: title.to_string(),
        text: text.to_string(),
    }
}

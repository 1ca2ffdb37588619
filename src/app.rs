use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::metrics::TestResult;
use crate::personal_best::{Decision, FileStore, KeyValueStore, PersonalBest, PersonalBestTracker};
use crate::settings::Difficulty;
use crate::timer::{Clock, SystemClock};
use crate::typing_test::TypingTest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// overlay shown before the first attempt
    Start,
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// What the results screen shows for a finished attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultReport {
    pub result: TestResult,
    pub decision: Decision,
}

pub struct App<S: KeyValueStore = FileStore, C: Clock = SystemClock> {
    pub test: TypingTest<C>,
    pub state: AppState,
    report: Option<ResultReport>,
    tracker: PersonalBestTracker<S>,
    best: Option<PersonalBest>,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(test: TypingTest<C>, store: S) -> Self {
        let tracker = PersonalBestTracker::new(store);
        let best = tracker.load();
        Self {
            test,
            state: AppState::Start,
            report: None,
            tracker,
            best,
        }
    }

    /// Personal best as last read from the store
    pub fn best(&self) -> Option<&PersonalBest> {
        self.best.as_ref()
    }

    pub fn report(&self) -> Option<&ResultReport> {
        self.report.as_ref()
    }

    pub fn config(&self) -> Config {
        Config {
            difficulty: self.test.difficulty(),
            mode: self.test.mode(),
        }
    }

    /// Whether the event loop should keep ticking
    pub fn needs_ticks(&self) -> bool {
        self.test.is_running()
    }

    pub fn on_tick(&mut self) {
        self.test.on_tick();
        self.complete_if_finished();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            _ => {}
        }

        match self.state {
            // dismissing the overlay does not type anything
            AppState::Start => self.state = AppState::Typing,
            AppState::Typing => self.on_typing_key(key.code, ctrl),
            AppState::Results => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Tab | KeyCode::Char('r')) {
                    self.go_again();
                }
            }
        }
        Action::Continue
    }

    fn on_typing_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Char(c) if !ctrl => {
                self.test.type_char(c);
            }
            KeyCode::Backspace => {
                self.test.backspace();
            }
            KeyCode::Tab => self.go_again(),
            KeyCode::Up => self.change_difficulty(self.test.difficulty().next()),
            KeyCode::Down => self.change_difficulty(self.test.difficulty().previous()),
            KeyCode::Left | KeyCode::Right => self.test.set_mode(self.test.mode().toggle()),
            _ => {}
        }
        self.complete_if_finished();
    }

    fn change_difficulty(&mut self, difficulty: Difficulty) {
        if let Err(err) = self.test.set_difficulty(difficulty) {
            tracing::warn!(error = %err, %difficulty, "unable to change difficulty");
        }
    }

    fn complete_if_finished(&mut self) {
        if self.state != AppState::Typing || self.report.is_some() {
            return;
        }
        let Some(result) = self.test.result().copied() else {
            return;
        };

        let decision = self.tracker.record(&result);
        self.best = self.tracker.load().or_else(|| Some(decision.best.clone()));
        self.report = Some(ResultReport { result, decision });
        self.show_results();
    }

    /// Switches to the results screen, or back to typing when there is nothing to show
    pub fn show_results(&mut self) {
        let has_result = self.test.result().is_some() && self.report.is_some();
        self.state = if has_result {
            AppState::Results
        } else {
            AppState::Typing
        };
    }

    /// New passage, new attempt
    pub fn go_again(&mut self) {
        if let Err(err) = self.test.restart() {
            tracing::warn!(error = %err, "unable to load a new passage");
            return;
        }
        self.report = None;
        self.state = AppState::Typing;
    }
}

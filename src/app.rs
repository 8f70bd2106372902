use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{info, warn};
use tokio::sync::mpsc;

use crate::QuizError;
use crate::data::QuestionSource;
use crate::models::{CATEGORIES, Difficulty, MAX_NUM_QUESTIONS, MIN_NUM_QUESTIONS, Question, Settings};
use crate::screen::{Screen, ScreenController};
use crate::session::{Advance, AdvanceToken, AnswerOutcome, LoadOutcome, LoadTicket, Phase, Session};
use crate::store::{BestTimes, KeyValueStore};

/// How long the correct/incorrect reveal stays up before the next question.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load quiz questions. Please try again!";

/// Results of background work, delivered back to the UI loop.
#[derive(Debug)]
pub enum AppMessage {
    QuestionsLoaded {
        ticket: LoadTicket,
        result: Result<Vec<Question>, QuizError>,
    },
    Advance(AdvanceToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingField {
    Category,
    Difficulty,
    Amount,
    Start,
}

impl LandingField {
    const ORDER: [LandingField; 4] = [
        LandingField::Category,
        LandingField::Difficulty,
        LandingField::Amount,
        LandingField::Start,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Editable settings on the landing screen.
#[derive(Debug, Clone)]
pub struct LandingForm {
    pub settings: Settings,
    pub focus: LandingField,
}

impl Default for LandingForm {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl LandingForm {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            focus: LandingField::Category,
        }
    }

    fn category_index(&self) -> Option<usize> {
        CATEGORIES
            .iter()
            .position(|(id, _)| *id == self.settings.category)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn increase(&mut self) {
        match self.focus {
            LandingField::Category => {
                let next = self
                    .category_index()
                    .map_or(0, |i| (i + 1) % CATEGORIES.len());
                self.settings.category = CATEGORIES[next].0.to_string();
            }
            LandingField::Difficulty => {
                self.settings.difficulty = self.settings.difficulty.next();
            }
            LandingField::Amount => {
                self.settings.num_questions =
                    (self.settings.num_questions + 1).min(MAX_NUM_QUESTIONS);
            }
            LandingField::Start => {}
        }
    }

    pub fn decrease(&mut self) {
        match self.focus {
            LandingField::Category => {
                let previous = self
                    .category_index()
                    .map_or(CATEGORIES.len() - 1, |i| {
                        (i + CATEGORIES.len() - 1) % CATEGORIES.len()
                    });
                self.settings.category = CATEGORIES[previous].0.to_string();
            }
            LandingField::Difficulty => {
                self.settings.difficulty = self.settings.difficulty.previous();
            }
            LandingField::Amount => {
                self.settings.num_questions = self
                    .settings
                    .num_questions
                    .saturating_sub(1)
                    .max(MIN_NUM_QUESTIONS);
            }
            LandingField::Start => {}
        }
    }
}

/// The answer currently being revealed.
#[derive(Debug, Clone)]
pub struct Reveal {
    pub selected: usize,
    pub outcome: AnswerOutcome,
}

/// Owns the session and wires keyboard input, background fetches and the
/// reveal timer into it.
pub struct App<Q, K: KeyValueStore> {
    session: Session,
    best_times: BestTimes<K>,
    source: Q,
    form: LandingForm,
    screens: ScreenController,
    selected_option: usize,
    reveal: Option<Reveal>,
    confirm_exit: bool,
    held_advance: Option<AdvanceToken>,
    status: Option<String>,
    pub should_quit: bool,
    tx: mpsc::UnboundedSender<AppMessage>,
    rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl<Q, K: KeyValueStore> App<Q, K> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn form(&self) -> &LandingForm {
        &self.form
    }

    pub fn screen(&self) -> Screen {
        self.screens.active()
    }

    pub fn scroll(&self) -> u16 {
        self.screens.scroll()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn reveal(&self) -> Option<&Reveal> {
        self.reveal.as_ref()
    }

    pub fn confirming_exit(&self) -> bool {
        self.confirm_exit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.session.phase() == Phase::Loading
    }

    pub fn best_time(&self, difficulty: Difficulty) -> Option<u64> {
        self.best_times.get_best(difficulty)
    }
}

impl<Q, K> App<Q, K>
where
    Q: QuestionSource + Clone + Send + Sync + 'static,
    K: KeyValueStore,
{
    pub fn new(source: Q, best_times: BestTimes<K>, initial: Settings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            best_times,
            source,
            form: LandingForm::new(initial),
            screens: ScreenController::new(),
            selected_option: 0,
            reveal: None,
            confirm_exit: false,
            held_advance: None,
            status: None,
            should_quit: false,
            tx,
            rx,
        }
    }

    /// Applies all messages that have arrived since the last call.
    pub fn poll_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    /// Waits for the next background message.
    pub async fn next_message(&mut self) -> Option<AppMessage> {
        self.rx.recv().await
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::QuestionsLoaded { ticket, result } => {
                match self.session.complete_loading(ticket, result, Instant::now()) {
                    Ok(LoadOutcome::Installed) => {
                        self.selected_option = 0;
                        self.reveal = None;
                        self.status = None;
                    }
                    Ok(LoadOutcome::Stale) => {}
                    Err(e) => {
                        warn!("Error fetching quiz: {e}");
                        self.status = Some(format!("{LOAD_FAILED_MESSAGE} ({e})"));
                    }
                }
            }
            // The exit prompt is modal: the reveal waits until it is answered.
            AppMessage::Advance(token) if self.confirm_exit => {
                self.held_advance = Some(token);
            }
            AppMessage::Advance(token) => self.apply_advance(token),
        }
        self.screens.sync(self.session.phase());
    }

    fn apply_advance(&mut self, token: AdvanceToken) {
        match self.session.advance(token, &mut self.best_times) {
            Advance::Stale => {}
            Advance::Next { .. } | Advance::Finished(_) => {
                self.reveal = None;
                self.selected_option = 0;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screens.active() {
            Screen::Landing => self.handle_landing_key(key),
            Screen::Quiz => self.handle_quiz_key(key),
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_landing_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
            self.should_quit = true;
            return;
        }
        if self.is_loading() {
            return;
        }
        match key {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.form.focus_previous(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.form.focus_next(),
            KeyCode::Left | KeyCode::Char('h') => self.form.decrease(),
            KeyCode::Right | KeyCode::Char('l') => self.form.increase(),
            KeyCode::Enter => self.start_quiz(),
            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        if self.confirm_exit {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.return_to_landing(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_exit = false;
                    if let Some(token) = self.held_advance.take() {
                        self.apply_advance(token);
                        self.screens.sync(self.session.phase());
                    }
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.confirm_exit = true,
            _ if self.reveal.is_some() => {}
            KeyCode::Up | KeyCode::Char('k') => self.select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_option(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.option_count() {
                    self.selected_option = index;
                    self.submit_answer();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.submit_answer(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.session.history().len().saturating_sub(1);
                self.screens.scroll_down(u16::try_from(max).unwrap_or(u16::MAX));
            }
            KeyCode::Up | KeyCode::Char('k') => self.screens.scroll_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.retry(),
            KeyCode::Char('h') | KeyCode::Char('H') => self.return_to_landing(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn option_count(&self) -> usize {
        self.session
            .current_question()
            .map_or(0, |q| q.presented_answers().len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Validates the form and kicks off the question fetch in the background.
    pub fn start_quiz(&mut self) {
        let settings = self.form.settings.clone();
        let ticket = match self.session.begin_loading(settings) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };
        self.status = None;

        let source = self.source.clone();
        let settings = self.session.settings().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_questions(&settings).await;
            let _ = tx.send(AppMessage::QuestionsLoaded { ticket, result });
        });
        self.screens.sync(self.session.phase());
    }

    pub fn submit_answer(&mut self) {
        let Some(answer) = self
            .session
            .current_question()
            .and_then(|q| q.presented_answers().get(self.selected_option))
            .cloned()
        else {
            return;
        };

        match self.session.submit_answer(&answer) {
            Ok(outcome) => {
                let token = outcome.token;
                self.reveal = Some(Reveal {
                    selected: self.selected_option,
                    outcome,
                });
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(REVEAL_DELAY).await;
                    let _ = tx.send(AppMessage::Advance(token));
                });
            }
            Err(e) => warn!("Answer rejected: {e}"),
        }
    }

    /// Drops the current session and shows a fresh landing form.
    pub fn return_to_landing(&mut self) {
        info!("Returning to landing screen");
        self.session.reset();
        self.form = LandingForm::default();
        self.selected_option = 0;
        self.reveal = None;
        self.confirm_exit = false;
        self.held_advance = None;
        self.status = None;
        self.screens.sync(self.session.phase());
    }

    pub fn retry(&mut self) {
        self.return_to_landing();
    }
}

//! Quiz session state machine.
//!
//! `Idle -> Loading -> Active -> Finalized`, with `reset` returning to `Idle`
//! from anywhere. Answer submission opens a reveal window; the caller later
//! hands back the returned [`AdvanceToken`] to move on. Tokens (and load
//! tickets) from before a reset are ignored, so a late timer can never touch
//! a newer session.

use std::time::Instant;

use log::{debug, error, info};

use crate::QuizError;
use crate::data::QuestionSource;
use crate::models::{Difficulty, Question, Settings};
use crate::store::{BestTimes, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Active,
    Finalized,
}

/// Issued by [`Session::begin_loading`]; only the latest ticket may install questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Issued by [`Session::submit_answer`]; redeemed by [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceToken {
    generation: u64,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub selected_answer: String,
    pub correct_answer: String,
    pub token: AdvanceToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub prompt: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed,
    /// The ticket belonged to a session that has since been reset.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Token no longer matches the live session; nothing changed.
    Stale,
    Next { index: usize },
    Finished(QuizResults),
}

/// Summary computed once the last question has been advanced past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub category: String,
    pub difficulty: Difficulty,
    pub score: usize,
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
    pub completion_seconds: u64,
    pub best_seconds: Option<u64>,
    pub new_record: bool,
}

impl QuizResults {
    pub fn incorrect(&self) -> usize {
        self.answered - self.score
    }

    pub fn verdict(&self) -> &'static str {
        match self.percentage {
            80.. => "Excellent!",
            60..=79 => "Good Job!",
            40..=59 => "Not Bad!",
            _ => "Keep Trying!",
        }
    }
}

/// `round(score / answered * 100)`, or 0 when nothing was answered.
pub fn percentage(score: usize, answered: usize) -> u32 {
    if answered == 0 {
        return 0;
    }
    (score as f64 / answered as f64 * 100.0).round() as u32
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    phase: Phase,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    answered_count: usize,
    started_at: Option<Instant>,
    completion_seconds: Option<u64>,
    history: Vec<AnswerRecord>,
    generation: u64,
    pending: Option<AdvanceToken>,
    results: Option<QuizResults>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            phase: Phase::Idle,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answered_count: 0,
            started_at: None,
            completion_seconds: None,
            history: Vec::new(),
            generation: 0,
            pending: None,
            results: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Session length: the number of questions actually received.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Active => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn completion_seconds(&self) -> Option<u64> {
        self.completion_seconds
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    /// True between an answer submission and its advancement.
    pub fn is_revealing(&self) -> bool {
        self.pending.is_some()
    }

    /// Fraction of the quiz behind the current question, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.questions.len() as f64
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.answered_count)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!("Session phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Validates `settings` and enters `Loading`.
    pub fn begin_loading(&mut self, settings: Settings) -> Result<LoadTicket, QuizError> {
        if self.phase != Phase::Idle {
            return Err(QuizError::InvalidState(format!(
                "cannot start a quiz while {:?}",
                self.phase
            )));
        }
        settings.validate()?;

        self.generation += 1;
        self.settings = settings;
        self.set_phase(Phase::Loading);
        Ok(LoadTicket {
            generation: self.generation,
        })
    }

    /// Installs fetched questions, or falls back to `Idle` and returns the fetch error.
    pub fn complete_loading(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<Vec<Question>, QuizError>,
        now: Instant,
    ) -> Result<LoadOutcome, QuizError> {
        if self.phase != Phase::Loading || ticket.generation != self.generation {
            debug!("Dropping fetch result for stale ticket");
            return Ok(LoadOutcome::Stale);
        }

        let questions = match fetched {
            Ok(questions) if questions.is_empty() => {
                self.set_phase(Phase::Idle);
                return Err(QuizError::QuestionFetch(
                    "no questions returned".to_string(),
                ));
            }
            Ok(questions) => questions,
            Err(e) => {
                self.set_phase(Phase::Idle);
                return Err(e);
            }
        };

        info!(
            "Starting quiz: {} questions ({} requested), category {}, {}",
            questions.len(),
            self.settings.num_questions,
            self.settings.category,
            self.settings.difficulty
        );
        self.questions = questions;
        self.current_index = 0;
        self.score = 0;
        self.answered_count = 0;
        self.history.clear();
        self.pending = None;
        self.results = None;
        self.completion_seconds = None;
        self.started_at = Some(now);
        self.set_phase(Phase::Active);
        Ok(LoadOutcome::Installed)
    }

    /// Validates, fetches through `source` and installs the questions.
    pub async fn start<Q: QuestionSource>(
        &mut self,
        settings: Settings,
        source: &Q,
    ) -> Result<(), QuizError> {
        let ticket = self.begin_loading(settings)?;
        let fetched = source.fetch_questions(&self.settings).await;
        self.complete_loading(ticket, fetched, Instant::now())?;
        Ok(())
    }

    pub fn submit_answer(&mut self, selected_answer: &str) -> Result<AnswerOutcome, QuizError> {
        if self.phase != Phase::Active {
            return Err(QuizError::InvalidState(format!(
                "cannot submit an answer while {:?}",
                self.phase
            )));
        }
        if self.pending.is_some() {
            return Err(QuizError::InvalidState(
                "answer already submitted for this question".to_string(),
            ));
        }
        let question = self.questions.get(self.current_index).ok_or_else(|| {
            QuizError::InvalidState(format!("no question at index {}", self.current_index))
        })?;

        let correct = question.is_correct(selected_answer);
        let record = AnswerRecord {
            prompt: question.prompt().to_string(),
            selected_answer: selected_answer.to_string(),
            correct_answer: question.correct_answer().to_string(),
            correct,
        };

        self.answered_count += 1;
        if correct {
            self.score += 1;
        }
        let token = AdvanceToken {
            generation: self.generation,
            index: self.current_index,
        };
        self.pending = Some(token);
        let outcome = AnswerOutcome {
            correct,
            selected_answer: record.selected_answer.clone(),
            correct_answer: record.correct_answer.clone(),
            token,
        };
        self.history.push(record);
        Ok(outcome)
    }

    pub fn advance<K: KeyValueStore>(
        &mut self,
        token: AdvanceToken,
        best_times: &mut BestTimes<K>,
    ) -> Advance {
        self.advance_at(token, Instant::now(), best_times)
    }

    /// Ends the reveal window for `token`, finalizing after the last question.
    pub fn advance_at<K: KeyValueStore>(
        &mut self,
        token: AdvanceToken,
        now: Instant,
        best_times: &mut BestTimes<K>,
    ) -> Advance {
        if self.phase != Phase::Active || self.pending != Some(token) {
            debug!("Ignoring stale advancement for question {}", token.index);
            return Advance::Stale;
        }

        self.pending = None;
        self.current_index += 1;
        if self.current_index < self.questions.len() {
            return Advance::Next {
                index: self.current_index,
            };
        }

        let results = self.finalize(now, best_times);
        Advance::Finished(results)
    }

    fn finalize<K: KeyValueStore>(
        &mut self,
        now: Instant,
        best_times: &mut BestTimes<K>,
    ) -> QuizResults {
        let elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        let completion_seconds = elapsed.as_secs_f64().round() as u64;
        self.completion_seconds = Some(completion_seconds);

        let difficulty = self.settings.difficulty;
        let new_record = match best_times.record_if_better(difficulty, completion_seconds) {
            Ok(is_new) => is_new,
            Err(e) => {
                error!("Failed to save best time for {difficulty}: {e}");
                false
            }
        };

        let results = QuizResults {
            category: self.settings.category.clone(),
            difficulty,
            score: self.score,
            answered: self.answered_count,
            total: self.questions.len(),
            percentage: self.percentage(),
            completion_seconds,
            best_seconds: best_times.get_best(difficulty),
            new_record,
        };
        info!(
            "Quiz finished: {}/{} ({}%) in {}s, new record: {}",
            results.score,
            results.answered,
            results.percentage,
            completion_seconds,
            new_record
        );

        self.results = Some(results.clone());
        self.set_phase(Phase::Finalized);
        results
    }

    /// Discards everything and returns to `Idle` with default settings.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.settings = Settings::default();
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.answered_count = 0;
        self.started_at = None;
        self.completion_seconds = None;
        self.history.clear();
        self.pending = None;
        self.results = None;
        self.set_phase(Phase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::store::MemoryStore;

    struct FixedSource {
        questions: Option<Vec<Question>>,
    }

    impl QuestionSource for FixedSource {
        async fn fetch_questions(&self, _settings: &Settings) -> Result<Vec<Question>, QuizError> {
            self.questions
                .clone()
                .ok_or_else(|| QuizError::QuestionFetch("API response code 1".to_string()))
        }
    }

    fn questions(count: usize) -> Vec<Question> {
        let mut rng = StdRng::seed_from_u64(11);
        (0..count)
            .map(|i| {
                Question::new(
                    format!("Question {i}?"),
                    format!("right {i}"),
                    vec![
                        format!("wrong {i}a"),
                        format!("wrong {i}b"),
                        format!("wrong {i}c"),
                    ],
                    &mut rng,
                )
            })
            .collect()
    }

    fn settings(num_questions: u32) -> Settings {
        Settings {
            category: "9".to_string(),
            difficulty: Difficulty::Easy,
            num_questions,
        }
    }

    fn active_session(count: usize, t0: Instant) -> Session {
        let mut session = Session::new();
        let ticket = session.begin_loading(settings(count as u32)).unwrap();
        session
            .complete_loading(ticket, Ok(questions(count)), t0)
            .unwrap();
        session
    }

    fn assert_invariants(session: &Session) {
        assert!(session.score() <= session.answered_count());
        if !session.is_revealing() {
            assert_eq!(session.answered_count(), session.current_index());
        }
    }

    #[test]
    fn test_percentage_rounding_and_zero_guard() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn test_verdict_tiers() {
        let mut results = QuizResults {
            category: "9".to_string(),
            difficulty: Difficulty::Easy,
            score: 0,
            answered: 0,
            total: 0,
            percentage: 80,
            completion_seconds: 0,
            best_seconds: None,
            new_record: false,
        };
        assert_eq!(results.verdict(), "Excellent!");
        results.percentage = 60;
        assert_eq!(results.verdict(), "Good Job!");
        results.percentage = 40;
        assert_eq!(results.verdict(), "Not Bad!");
        results.percentage = 39;
        assert_eq!(results.verdict(), "Keep Trying!");
    }

    #[test]
    fn test_start_requires_category() {
        let mut session = Session::new();
        let err = session.begin_loading(Settings::default()).unwrap_err();
        assert!(matches!(err, QuizError::Validation(_)));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_start_installs_questions() {
        let mut session = Session::new();
        let source = FixedSource {
            questions: Some(questions(3)),
        };
        session.start(settings(3), &source).await.unwrap();

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.total(), 3);
        assert_eq!(session.current_index(), 0);
        assert!(session.started_at().is_some());
        assert_eq!(session.current_question().unwrap().prompt(), "Question 0?");
    }

    #[tokio::test]
    async fn test_start_failure_returns_to_idle_with_original_error() {
        let mut session = Session::new();
        let source = FixedSource { questions: None };
        let err = session.start(settings(3), &source).await.unwrap_err();

        match err {
            QuizError::QuestionFetch(message) => assert_eq!(message, "API response code 1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.questions().is_empty());
    }

    #[test]
    fn test_empty_fetch_is_rejected() {
        let mut session = Session::new();
        let ticket = session.begin_loading(settings(5)).unwrap();
        let err = session
            .complete_loading(ticket, Ok(Vec::new()), Instant::now())
            .unwrap_err();
        assert!(matches!(err, QuizError::QuestionFetch(_)));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_two_question_scenario() {
        let t0 = Instant::now();
        let mut session = active_session(2, t0);
        let mut best = BestTimes::new(MemoryStore::new());

        let first = session.submit_answer("right 0").unwrap();
        assert!(first.correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered_count(), 1);
        assert_invariants(&session);
        assert_eq!(
            session.advance_at(first.token, t0, &mut best),
            Advance::Next { index: 1 }
        );
        assert_invariants(&session);

        let second = session.submit_answer("wrong 1a").unwrap();
        assert!(!second.correct);
        assert_eq!(second.correct_answer, "right 1");
        assert_eq!(session.score(), 1);
        assert_eq!(session.answered_count(), 2);

        let advance = session.advance_at(second.token, t0 + Duration::from_secs(12), &mut best);
        let Advance::Finished(results) = advance else {
            panic!("expected the session to finish");
        };
        assert_eq!(session.phase(), Phase::Finalized);
        assert_eq!(results.percentage, 50);
        assert_eq!(results.score, 1);
        assert_eq!(results.answered, 2);
        assert_eq!(results.incorrect(), 1);
        assert_eq!(results.completion_seconds, 12);
        assert_eq!(session.history().len(), 2);
        assert!(!session.history()[1].correct);
        assert_invariants(&session);
    }

    #[test]
    fn test_completion_time_is_rounded() {
        let t0 = Instant::now();
        let mut session = active_session(1, t0);
        let mut best = BestTimes::new(MemoryStore::new());

        let outcome = session.submit_answer("right 0").unwrap();
        let advance = session.advance_at(outcome.token, t0 + Duration::from_millis(41_600), &mut best);
        let Advance::Finished(results) = advance else {
            panic!("expected the session to finish");
        };
        assert_eq!(results.completion_seconds, 42);
        assert_eq!(session.completion_seconds(), Some(42));
    }

    #[test]
    fn test_finalization_records_best_time() {
        let t0 = Instant::now();
        let mut best = BestTimes::new(MemoryStore::new());

        let mut session = active_session(1, t0);
        let outcome = session.submit_answer("right 0").unwrap();
        let Advance::Finished(results) =
            session.advance_at(outcome.token, t0 + Duration::from_secs(42), &mut best)
        else {
            panic!("expected the session to finish");
        };
        assert!(results.new_record);
        assert_eq!(results.best_seconds, Some(42));
        assert_eq!(best.store().get("bestTime_easy").as_deref(), Some("42"));

        let mut session = active_session(1, t0);
        let outcome = session.submit_answer("right 0").unwrap();
        let Advance::Finished(results) =
            session.advance_at(outcome.token, t0 + Duration::from_secs(50), &mut best)
        else {
            panic!("expected the session to finish");
        };
        assert!(!results.new_record);
        assert_eq!(results.best_seconds, Some(42));
        assert_eq!(best.store().get("bestTime_easy").as_deref(), Some("42"));
    }

    #[test]
    fn test_short_fetch_sets_session_length() {
        let mut session = Session::new();
        let ticket = session.begin_loading(settings(10)).unwrap();
        session
            .complete_loading(ticket, Ok(questions(7)), Instant::now())
            .unwrap();

        assert_eq!(session.settings().num_questions, 10);
        assert_eq!(session.total(), 7);

        let mut best = BestTimes::new(MemoryStore::new());
        for i in 0..6 {
            let outcome = session.submit_answer(&format!("right {i}")).unwrap();
            session.advance(outcome.token, &mut best);
        }
        assert_eq!(session.current_index(), 6);
        assert!((session.progress() - 6.0 / 7.0).abs() < f64::EPSILON);

        let outcome = session.submit_answer("right 6").unwrap();
        let Advance::Finished(results) = session.advance(outcome.token, &mut best) else {
            panic!("seventh answer should finish the quiz");
        };
        assert_eq!(results.total, 7);
        assert_eq!(results.percentage, 100);
    }

    #[test]
    fn test_submit_while_idle_is_invalid_and_changes_nothing() {
        let mut session = Session::new();
        let err = session.submit_answer("anything").unwrap_err();
        assert!(matches!(err, QuizError::InvalidState(_)));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_second_submit_during_reveal_is_rejected() {
        let mut session = active_session(2, Instant::now());
        session.submit_answer("right 0").unwrap();
        let err = session.submit_answer("right 0").unwrap_err();
        assert!(matches!(err, QuizError::InvalidState(_)));
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_stale_advance_after_reset_is_noop() {
        let t0 = Instant::now();
        let mut best = BestTimes::new(MemoryStore::new());
        let mut session = active_session(3, t0);
        let old = session.submit_answer("right 0").unwrap();

        // Exit mid-reveal, then start a fresh quiz before the timer fires.
        session.reset();
        let ticket = session.begin_loading(settings(3)).unwrap();
        session
            .complete_loading(ticket, Ok(questions(3)), t0)
            .unwrap();

        assert_eq!(session.advance_at(old.token, t0, &mut best), Advance::Stale);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_invariants(&session);
    }

    #[test]
    fn test_token_is_single_use() {
        let t0 = Instant::now();
        let mut best = BestTimes::new(MemoryStore::new());
        let mut session = active_session(3, t0);
        let outcome = session.submit_answer("right 0").unwrap();

        assert_eq!(
            session.advance_at(outcome.token, t0, &mut best),
            Advance::Next { index: 1 }
        );
        assert_eq!(session.advance_at(outcome.token, t0, &mut best), Advance::Stale);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_stale_load_ticket_is_dropped() {
        let mut session = Session::new();
        let ticket = session.begin_loading(settings(3)).unwrap();
        session.reset();

        let outcome = session
            .complete_loading(ticket, Ok(questions(3)), Instant::now())
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.questions().is_empty());
    }

    #[test]
    fn test_cannot_start_while_loading() {
        let mut session = Session::new();
        session.begin_loading(settings(3)).unwrap();
        let err = session.begin_loading(settings(3)).unwrap_err();
        assert!(matches!(err, QuizError::InvalidState(_)));
        assert_eq!(session.phase(), Phase::Loading);
    }

    #[test]
    fn test_reset_restores_defaults_from_any_phase() {
        let mut session = active_session(2, Instant::now());
        session.submit_answer("right 0").unwrap();
        session.reset();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.settings(), &Settings::default());
        assert!(session.questions().is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.answered_count(), 0);
        assert!(!session.is_revealing());
        assert!(session.results().is_none());
    }
}

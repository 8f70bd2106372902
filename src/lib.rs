//! # quizmaster
//!
//! A terminal trivia quiz backed by the Open Trivia Database.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizmaster::{Config, Quiz, QuizError, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::default();
//!     let quiz = Quiz::new(&config, Settings::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod logging;
pub mod models;
pub mod screen;
pub mod session;
pub mod shuffle;
pub mod store;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;

pub use app::{App, AppMessage, LandingField, LandingForm, REVEAL_DELAY, Reveal};
pub use config::Config;
pub use data::{OpenTdbClient, QuestionSource};
pub use models::{Difficulty, Question, Settings};
pub use session::{Phase, QuizResults, Session};
pub use store::{BestTimes, JsonFileStore, KeyValueStore, MemoryStore, StoreError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A required setting is missing or out of range.
    #[error("{0}")]
    Validation(String),
    /// The question API could not be reached.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The API answered but gave no usable questions.
    #[error("could not fetch questions: {0}")]
    QuestionFetch(String),
    /// An operation was called in a phase that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App<OpenTdbClient, JsonFileStore>,
}

impl Quiz {
    /// Build a quiz from config; `initial` pre-fills the landing form.
    pub fn new(config: &Config, initial: Settings) -> Result<Self, QuizError> {
        let client = OpenTdbClient::new(&config.api_url, config.request_timeout())?;
        let store = JsonFileStore::open(&config.data_dir)?;
        log::info!("Best times stored in {}", store.path().display());
        Ok(Self {
            app: App::new(client, BestTimes::new(store), initial),
        })
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut session = terminal::TerminalSession::enter()?;
        let result = run_event_loop(&mut session, &mut self.app).await;
        session.restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App<OpenTdbClient, JsonFileStore> {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App<OpenTdbClient, JsonFileStore> {
        &mut self.app
    }
}

async fn run_event_loop<Q, K>(
    terminal: &mut terminal::AppTerminal,
    app: &mut App<Q, K>,
) -> Result<(), QuizError>
where
    Q: QuestionSource + Clone + Send + Sync + 'static,
    K: KeyValueStore,
{
    loop {
        app.poll_messages();
        if app.should_quit {
            break;
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // Yield so background fetches and timers make progress between polls.
        tokio::task::yield_now().await;
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key(key.code);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QuizError::QuestionFetch("API response code 1: not enough questions".into());
        assert_eq!(
            err.to_string(),
            "could not fetch questions: API response code 1: not enough questions"
        );

        let err = QuizError::Validation("Please select a category!".into());
        assert_eq!(err.to_string(), "Please select a category!");

        let err: QuizError = io::Error::other("boom").into();
        assert!(matches!(err, QuizError::Io(_)));
    }
}

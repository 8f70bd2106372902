use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::QuizError;

pub const DEFAULT_NUM_QUESTIONS: u32 = 10;
pub const MIN_NUM_QUESTIONS: u32 = 1;
/// Largest `amount` the Open Trivia Database accepts per request.
pub const MAX_NUM_QUESTIONS: u32 = 50;

/// Display names for the bundled category identifiers.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("9", "General Knowledge"),
    ("17", "Science & Nature"),
    ("23", "History"),
    ("21", "Sports"),
    ("11", "Entertainment: Film"),
    ("12", "Entertainment: Music"),
    ("18", "Science: Computers"),
    ("22", "Geography"),
];

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Display name for a category identifier, or `"Unknown"`.
pub fn category_name(id: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_CATEGORY)
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Wire value used by the question API and the best-time keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuizError::Validation(format!("unknown difficulty: {other}"))),
        }
    }
}

/// Quiz settings chosen on the landing screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Category identifier; empty until the user picks one.
    pub category: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category: String::new(),
            difficulty: Difficulty::Easy,
            num_questions: DEFAULT_NUM_QUESTIONS,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.category.trim().is_empty() {
            return Err(QuizError::Validation(
                "Please select a category!".to_string(),
            ));
        }
        if !(MIN_NUM_QUESTIONS..=MAX_NUM_QUESTIONS).contains(&self.num_questions) {
            return Err(QuizError::Validation(format!(
                "Number of questions must be between {MIN_NUM_QUESTIONS} and {MAX_NUM_QUESTIONS}"
            )));
        }
        Ok(())
    }

    pub fn category_name(&self) -> &'static str {
        category_name(&self.category)
    }
}

mod question;
mod settings;

pub use question::Question;
pub use settings::{
    CATEGORIES, DEFAULT_NUM_QUESTIONS, Difficulty, MAX_NUM_QUESTIONS, MIN_NUM_QUESTIONS, Settings,
    UNKNOWN_CATEGORY, category_name,
};

use rand::Rng;

use crate::shuffle::shuffle;

/// A multiple-choice question. The answer order is fixed when the question is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    distractors: Vec<String>,
    presented_answers: Vec<String>,
}

impl Question {
    /// Builds a question, shuffling the correct answer in among the distractors.
    pub fn new<R: Rng + ?Sized>(
        prompt: String,
        correct_answer: String,
        distractors: Vec<String>,
        rng: &mut R,
    ) -> Self {
        let mut answers = Vec::with_capacity(distractors.len() + 1);
        answers.push(correct_answer.clone());
        answers.extend(distractors.iter().cloned());
        let presented_answers = shuffle(&answers, rng);

        Self {
            prompt,
            correct_answer,
            distractors,
            presented_answers,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn distractors(&self) -> &[String] {
        &self.distractors
    }

    pub fn presented_answers(&self) -> &[String] {
        &self.presented_answers
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// Position of the correct answer in the presented order.
    pub fn correct_index(&self) -> Option<usize> {
        self.presented_answers
            .iter()
            .position(|answer| *answer == self.correct_answer)
    }
}

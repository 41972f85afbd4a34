use serde::Serialize;

use crate::workflows::content::AnalyticalQuestion;

/// One-question-at-a-time runner for the analytical test.
#[derive(Debug, Clone, Default)]
pub struct AnalyticalTest {
    questions: Vec<AnalyticalQuestion>,
    current: usize,
    correct: usize,
}

/// Progress reported after each answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalyticalProgress {
    pub answered: usize,
    pub total: usize,
    pub correct: usize,
    /// Final percentage, present once the last question is answered.
    pub score: Option<u8>,
}

impl AnalyticalTest {
    pub fn load(&mut self, questions: Vec<AnalyticalQuestion>) {
        self.questions = questions;
        self.current = 0;
        self.correct = 0;
    }

    pub fn is_loaded(&self) -> bool {
        !self.questions.is_empty()
    }

    pub fn questions(&self) -> &[AnalyticalQuestion] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&AnalyticalQuestion> {
        self.questions.get(self.current)
    }

    pub fn answer(&mut self, option: usize) -> Result<AnalyticalProgress, String> {
        let question = self
            .current_question()
            .ok_or_else(|| "no analytical question awaits an answer".to_string())?;
        if option >= question.options.len() {
            return Err(format!("question {} has no option {option}", question.id));
        }
        if option == question.correct_index {
            self.correct += 1;
        }
        self.current += 1;
        Ok(self.progress())
    }

    pub fn progress(&self) -> AnalyticalProgress {
        AnalyticalProgress {
            answered: self.current,
            total: self.questions.len(),
            correct: self.correct,
            score: self.score(),
        }
    }

    /// `round(correct / total * 100)` once every question is answered.
    pub fn score(&self) -> Option<u8> {
        let total = self.questions.len();
        if total == 0 || self.current < total {
            return None;
        }
        let percentage = (self.correct as f64 / total as f64 * 100.0).round();
        Some(percentage as u8)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

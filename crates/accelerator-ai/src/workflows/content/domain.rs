use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Every generated multiple-choice question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Upper bound of each project evaluation axis.
pub const AXIS_MAX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Choice,
    Analysis,
    Math,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Business-intelligence question used by the funnel's analytical test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticalQuestion {
    pub id: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Readiness band assigned by the project evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Green,
    Yellow,
    Red,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "ready for incubation",
            Self::Yellow => "needs development",
            Self::Red => "unclear",
        }
    }
}

/// Five-axis assessment of a project idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvaluationResult {
    pub clarity: f64,
    pub value: f64,
    pub innovation: f64,
    pub market: f64,
    pub readiness: f64,
    pub total_score: f64,
    pub ai_opinion: String,
    pub classification: Classification,
}

impl ProjectEvaluationResult {
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("clarity", self.clarity),
            ("value", self.value),
            ("innovation", self.innovation),
            ("market", self.market),
            ("readiness", self.readiness),
        ]
    }
}

/// Lesson text and the practical exercise that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMaterial {
    pub content: String,
    pub exercise: String,
}

/// End-of-level quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Reviewer verdict on an exercise answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseReview {
    pub passed: bool,
    pub feedback: String,
}

/// Semantic checks applied to every collaborator response before it is used.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn validate_options(id: u32, options: &[String], correct_index: usize) -> Result<(), String> {
    if options.len() != OPTION_COUNT {
        return Err(format!(
            "question {id} has {} options, expected {OPTION_COUNT}",
            options.len()
        ));
    }
    if correct_index >= options.len() {
        return Err(format!(
            "question {id} marks option {correct_index} correct, out of range"
        ));
    }
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(format!("question {id} has a blank option"));
    }
    Ok(())
}

/// Questions are answered by id, so ids must be unique within a set.
pub trait Question: Validate {
    fn id(&self) -> u32;
}

impl Validate for AnalyticalQuestion {
    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err(format!("question {} has no text", self.id));
        }
        validate_options(self.id, &self.options, self.correct_index)
    }
}

impl Validate for QuizQuestion {
    fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err(format!("question {} has no text", self.id));
        }
        validate_options(self.id, &self.options, self.correct_index)
    }
}

impl Question for AnalyticalQuestion {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Question for QuizQuestion {
    fn id(&self) -> u32 {
        self.id
    }
}

impl<T: Question> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("question set is empty".to_string());
        }
        let mut seen = HashSet::with_capacity(self.len());
        for question in self {
            question.validate()?;
            if !seen.insert(question.id()) {
                return Err(format!("question id {} appears more than once", question.id()));
            }
        }
        Ok(())
    }
}

impl Validate for ProjectEvaluationResult {
    fn validate(&self) -> Result<(), String> {
        for (axis, score) in self.axes() {
            if !score.is_finite() || !(0.0..=AXIS_MAX).contains(&score) {
                return Err(format!("{axis} score {score} outside 0..={AXIS_MAX}"));
            }
        }
        if !self.total_score.is_finite() || !(0.0..=100.0).contains(&self.total_score) {
            return Err(format!("total score {} outside 0..=100", self.total_score));
        }
        Ok(())
    }
}

impl Validate for LevelMaterial {
    fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("level material has no content".to_string());
        }
        if self.exercise.trim().is_empty() {
            return Err("level material has no exercise".to_string());
        }
        Ok(())
    }
}

impl Validate for ExerciseReview {
    fn validate(&self) -> Result<(), String> {
        if self.feedback.trim().is_empty() {
            return Err("exercise review has no feedback".to_string());
        }
        Ok(())
    }
}

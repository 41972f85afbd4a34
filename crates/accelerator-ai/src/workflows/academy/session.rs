use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workflows::content::{
    ContentError, ExerciseReview, LevelMaterial, QuizQuestion, Validate,
};
use crate::workflows::{Outstanding, RequestTicket};

/// Delay the view keeps the pass screen up before showing completion.
pub const CELEBRATION_DELAY_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStep {
    LoadingContent,
    Learn,
    Exercise,
    LoadingQuiz,
    Quiz,
    Completed,
}

impl LevelStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoadingContent => "loading_content",
            Self::Learn => "learn",
            Self::Exercise => "exercise",
            Self::LoadingQuiz => "loading_quiz",
            Self::Quiz => "quiz",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for LevelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRequest {
    Material,
    ExerciseReview,
    Quiz,
}

impl SessionRequest {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::ExerciseReview => "exercise review",
            Self::Quiz => "quiz",
        }
    }
}

impl fmt::Display for SessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of correct answers needed to pass a quiz of `total` questions,
/// `ceil(total * 0.6)`.
pub const fn pass_threshold(total: usize) -> usize {
    (total * 3 + 4) / 5
}

/// Graded quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub threshold: usize,
    pub passed: bool,
}

impl QuizOutcome {
    fn grade(questions: &[QuizQuestion], answers: &[Option<usize>]) -> Self {
        let correct = questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| **answer == Some(question.correct_index))
            .count();
        let total = questions.len();
        let threshold = pass_threshold(total);
        Self {
            correct,
            total,
            threshold,
            passed: correct >= threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{operation} is not allowed during the {step} step")]
    Blocked {
        operation: &'static str,
        step: LevelStep,
    },
    #[error("the exercise needs reviewer feedback before the quiz")]
    FeedbackRequired,
    #[error("a {0} request is already outstanding")]
    RequestPending(SessionRequest),
    #[error("response for ticket {0} no longer matches an outstanding request")]
    StaleResponse(RequestTicket),
}

/// Learn, exercise, and quiz flow for one level.
#[derive(Debug, Clone)]
pub struct LevelSession {
    level_id: u32,
    title: String,
    step: LevelStep,
    material: Option<LevelMaterial>,
    material_fault: Option<String>,
    reading_progress: u8,
    exercise_answer: Option<String>,
    review: Option<ExerciseReview>,
    questions: Vec<QuizQuestion>,
    quiz_answers: Vec<Option<usize>>,
    outcome: Option<QuizOutcome>,
    outstanding: Outstanding<SessionRequest>,
}

impl LevelSession {
    /// Open a session in `LoadingContent` with the material request issued.
    pub fn open(level_id: u32, title: impl Into<String>) -> (Self, RequestTicket) {
        let (outstanding, ticket) = Outstanding::started(SessionRequest::Material);
        let session = Self {
            level_id,
            title: title.into(),
            step: LevelStep::LoadingContent,
            material: None,
            material_fault: None,
            reading_progress: 0,
            exercise_answer: None,
            review: None,
            questions: Vec::new(),
            quiz_answers: Vec::new(),
            outcome: None,
            outstanding,
        };
        (session, ticket)
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn step(&self) -> LevelStep {
        self.step
    }

    pub fn material(&self) -> Option<&LevelMaterial> {
        self.material.as_ref()
    }

    pub fn material_fault(&self) -> Option<&str> {
        self.material_fault.as_deref()
    }

    pub fn reading_progress(&self) -> u8 {
        self.reading_progress
    }

    pub fn exercise_answer(&self) -> Option<&str> {
        self.exercise_answer.as_deref()
    }

    pub fn review(&self) -> Option<&ExerciseReview> {
        self.review.as_ref()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn quiz_answers(&self) -> &[Option<usize>] {
        &self.quiz_answers
    }

    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    pub fn pending_request(&self) -> Option<SessionRequest> {
        self.outstanding.pending()
    }

    pub fn is_completed(&self) -> bool {
        self.step == LevelStep::Completed
    }

    fn require_step(
        &self,
        operation: &'static str,
        step: LevelStep,
    ) -> Result<(), SessionError> {
        if self.step == step {
            Ok(())
        } else {
            Err(SessionError::Blocked {
                operation,
                step: self.step,
            })
        }
    }

    fn require_current(
        &self,
        ticket: RequestTicket,
        kind: SessionRequest,
    ) -> Result<(), SessionError> {
        if self.outstanding.is_current(ticket, kind) {
            Ok(())
        } else {
            Err(SessionError::StaleResponse(ticket))
        }
    }

    fn issue(&mut self, kind: SessionRequest) -> Result<RequestTicket, SessionError> {
        self.outstanding
            .issue(kind)
            .map_err(SessionError::RequestPending)
    }

    /// Apply the material response. A failure keeps the session in
    /// `LoadingContent` with the fault recorded until [`Self::retry_material`].
    pub fn resolve_material(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<LevelMaterial, ContentError>,
    ) -> Result<LevelStep, SessionError> {
        self.require_current(ticket, SessionRequest::Material)?;
        self.outstanding.settle(ticket, SessionRequest::Material);

        let checked = outcome.and_then(|material| match material.validate() {
            Ok(()) => Ok(material),
            Err(reason) => Err(ContentError::Malformed(reason)),
        });
        match checked {
            Ok(material) => {
                self.material = Some(material);
                self.material_fault = None;
                self.step = LevelStep::Learn;
            }
            Err(error) => {
                debug!(level = self.level_id, %error, "level material unavailable");
                self.material_fault = Some(error.to_string());
            }
        }
        Ok(self.step)
    }

    pub fn retry_material(&mut self) -> Result<RequestTicket, SessionError> {
        self.require_step("retry_material", LevelStep::LoadingContent)?;
        let ticket = self.issue(SessionRequest::Material)?;
        self.material_fault = None;
        Ok(ticket)
    }

    /// Reading progress is displayed but never gates a transition.
    pub fn record_reading_progress(&mut self, percent: u8) -> Result<u8, SessionError> {
        self.require_step("record_reading_progress", LevelStep::Learn)?;
        self.reading_progress = percent.min(100);
        Ok(self.reading_progress)
    }

    pub fn begin_exercise(&mut self) -> Result<(), SessionError> {
        self.require_step("begin_exercise", LevelStep::Learn)?;
        self.step = LevelStep::Exercise;
        Ok(())
    }

    /// Exercise prompt of the loaded material.
    pub fn exercise(&self) -> Option<&str> {
        self.material.as_ref().map(|material| material.exercise.as_str())
    }

    pub fn submit_exercise(&mut self, answer: &str) -> Result<RequestTicket, SessionError> {
        self.require_step("submit_exercise", LevelStep::Exercise)?;
        if self.review.is_some() {
            return Err(SessionError::Blocked {
                operation: "submit_exercise",
                step: self.step,
            });
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::Validation(
                "exercise answer must not be empty".to_string(),
            ));
        }
        let ticket = self.issue(SessionRequest::ExerciseReview)?;
        self.exercise_answer = Some(answer.to_string());
        Ok(ticket)
    }

    pub fn resolve_exercise_review(
        &mut self,
        ticket: RequestTicket,
        review: ExerciseReview,
    ) -> Result<(), SessionError> {
        self.require_current(ticket, SessionRequest::ExerciseReview)?;
        self.outstanding.settle(ticket, SessionRequest::ExerciseReview);
        self.review = Some(review);
        Ok(())
    }

    /// Any reviewer feedback unlocks the quiz, whatever its verdict.
    pub fn begin_quiz(&mut self) -> Result<RequestTicket, SessionError> {
        self.require_step("begin_quiz", LevelStep::Exercise)?;
        if self.review.is_none() {
            return Err(SessionError::FeedbackRequired);
        }
        let ticket = self.issue(SessionRequest::Quiz)?;
        self.step = LevelStep::LoadingQuiz;
        Ok(ticket)
    }

    /// Apply the quiz response. Failure or an empty set returns to `Learn`
    /// and resets the exercise.
    pub fn resolve_quiz(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<QuizQuestion>, ContentError>,
    ) -> Result<LevelStep, SessionError> {
        self.require_current(ticket, SessionRequest::Quiz)?;
        self.outstanding.settle(ticket, SessionRequest::Quiz);

        match outcome.and_then(|questions| match questions.validate() {
            Ok(()) => Ok(questions),
            Err(reason) => Err(ContentError::Malformed(reason)),
        }) {
            Ok(questions) => {
                self.quiz_answers = vec![None; questions.len()];
                self.questions = questions;
                self.outcome = None;
                self.step = LevelStep::Quiz;
            }
            Err(error) => {
                debug!(level = self.level_id, %error, "quiz unavailable, back to learn");
                self.questions.clear();
                self.quiz_answers.clear();
                self.exercise_answer = None;
                self.review = None;
                self.step = LevelStep::Learn;
            }
        }
        Ok(self.step)
    }

    pub fn answer_quiz(&mut self, question_id: u32, option: usize) -> Result<(), SessionError> {
        self.require_step("answer_quiz", LevelStep::Quiz)?;
        if self.outcome.is_some() {
            return Err(SessionError::Blocked {
                operation: "answer_quiz",
                step: self.step,
            });
        }
        let index = self
            .questions
            .iter()
            .position(|question| question.id == question_id)
            .ok_or_else(|| SessionError::Validation(format!("unknown question {question_id}")))?;
        if option >= self.questions[index].options.len() {
            return Err(SessionError::Validation(format!(
                "question {question_id} has no option {option}"
            )));
        }
        self.quiz_answers[index] = Some(option);
        Ok(())
    }

    /// Grade the attempt. Passing completes the level; failing locks the
    /// answers until [`Self::retake_quiz`].
    pub fn submit_quiz(&mut self) -> Result<QuizOutcome, SessionError> {
        self.require_step("submit_quiz", LevelStep::Quiz)?;
        if self.outcome.is_some() {
            return Err(SessionError::Blocked {
                operation: "submit_quiz",
                step: self.step,
            });
        }
        if self.quiz_answers.iter().any(Option::is_none) {
            return Err(SessionError::Validation(
                "every quiz question needs an answer".to_string(),
            ));
        }

        let outcome = QuizOutcome::grade(&self.questions, &self.quiz_answers);
        self.outcome = Some(outcome);
        if outcome.passed {
            self.step = LevelStep::Completed;
        }
        Ok(outcome)
    }

    /// Clear a failed attempt so the same questions can be answered again.
    pub fn retake_quiz(&mut self) -> Result<(), SessionError> {
        self.require_step("retake_quiz", LevelStep::Quiz)?;
        match self.outcome {
            Some(outcome) if !outcome.passed => {
                self.outcome = None;
                self.quiz_answers = vec![None; self.questions.len()];
                Ok(())
            }
            _ => Err(SessionError::Blocked {
                operation: "retake_quiz",
                step: self.step,
            }),
        }
    }

    /// Release a request whose caller went away before its response was
    /// applied. The session returns to the point where the request can be
    /// issued again: an interrupted material load waits for a retry, an
    /// interrupted quiz load returns to `Exercise`.
    pub fn release_request(&mut self, ticket: RequestTicket) -> Option<SessionRequest> {
        let kind = self.outstanding.release(ticket)?;
        match kind {
            SessionRequest::Material => {
                self.material_fault = Some("material request was interrupted".to_string());
            }
            SessionRequest::ExerciseReview => self.exercise_answer = None,
            SessionRequest::Quiz => self.step = LevelStep::Exercise,
        }
        Some(kind)
    }

    /// Drop any outstanding request; its response will be stale.
    pub fn abandon(&mut self) {
        self.outstanding.abandon();
    }
}

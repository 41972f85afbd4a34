//! Generative content collaborator.
//!
//! The funnel and the academy request question sets, lesson material, and
//! reviews through [`ContentService`]. Callers go through [`ContentGateway`],
//! which validates every response and substitutes the built-in fallback for
//! any failure, so a misbehaving provider can degrade personalisation but never
//! break a session.

pub mod domain;
pub(crate) mod fallback;
mod gateway;
mod gemini;
mod prompts;
mod static_source;


use async_trait::async_trait;

use crate::workflows::academy::domain::UserProfile;
use crate::workflows::funnel::domain::ApplicantProfile;

pub use domain::{
    AnalyticalQuestion, Classification, Difficulty, ExerciseReview, LevelMaterial,
    ProjectEvaluationResult, Question, QuestionKind, QuizQuestion, Validate,
};
pub use gateway::ContentGateway;
pub use gemini::GeminiContentService;
pub use static_source::StaticContentService;

/// Level identity passed to the material and quiz generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRef<'a> {
    pub id: u32,
    pub title: &'a str,
}

/// Request/response contract of the generative content provider.
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError>;

    async fn evaluate_project(
        &self,
        idea: &str,
        profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError>;

    async fn level_material(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError>;

    async fn level_quiz(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError>;

    async fn review_exercise(
        &self,
        exercise: &str,
        answer: &str,
    ) -> Result<ExerciseReview, ContentError>;
}

/// Failure talking to, or understanding, the content provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("content provider unreachable: {0}")]
    Transport(String),
    #[error("content provider returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("content provider returned no text")]
    Empty,
    #[error("content payload could not be decoded: {0}")]
    Decode(String),
    #[error("content payload rejected: {0}")]
    Malformed(String),
}

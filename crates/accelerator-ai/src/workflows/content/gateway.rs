use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{
    AnalyticalQuestion, ExerciseReview, LevelMaterial, ProjectEvaluationResult, QuizQuestion,
    Validate,
};
use super::{fallback, ContentError, ContentService, LevelRef};
use crate::workflows::academy::domain::UserProfile;
use crate::workflows::funnel::domain::ApplicantProfile;

/// Fault-absorbing front for a [`ContentService`].
///
/// Transport failures, undecodable payloads, and payloads that fail
/// [`Validate`] are handled identically: the failure is logged and the static
/// fallback is returned.
#[derive(Clone)]
pub struct ContentGateway {
    source: Arc<dyn ContentService>,
}

impl ContentGateway {
    pub fn new(source: Arc<dyn ContentService>) -> Self {
        Self { source }
    }

    pub async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Vec<AnalyticalQuestion> {
        let outcome = self.source.analytical_questions(profile).await;
        settle("analytical_questions", outcome, fallback::analytical_questions)
    }

    pub async fn evaluate_project(
        &self,
        idea: &str,
        profile: &ApplicantProfile,
    ) -> ProjectEvaluationResult {
        let outcome = self.source.evaluate_project(idea, profile).await;
        settle("evaluate_project", outcome, fallback::project_evaluation)
    }

    pub async fn level_material(&self, level: LevelRef<'_>, user: &UserProfile) -> LevelMaterial {
        let outcome = self.source.level_material(level, user).await;
        settle("level_material", outcome, || {
            fallback::level_material(level, user)
        })
    }

    pub async fn level_quiz(&self, level: LevelRef<'_>, user: &UserProfile) -> Vec<QuizQuestion> {
        let outcome = self.source.level_quiz(level, user).await;
        settle("level_quiz", outcome, || fallback::level_quiz(level))
    }

    pub async fn review_exercise(&self, exercise: &str, answer: &str) -> ExerciseReview {
        let outcome = self.source.review_exercise(exercise, answer).await;
        settle("review_exercise", outcome, fallback::exercise_review)
    }
}

fn settle<T, F>(operation: &'static str, outcome: Result<T, ContentError>, fallback: F) -> T
where
    T: Validate,
    F: FnOnce() -> T,
{
    let checked = outcome.and_then(|value| match value.validate() {
        Ok(()) => Ok(value),
        Err(reason) => Err(ContentError::Malformed(reason)),
    });

    match checked {
        Ok(value) => {
            debug!(operation, "generated content accepted");
            value
        }
        Err(error) => {
            warn!(operation, %error, "content request failed, serving built-in fallback");
            fallback()
        }
    }
}

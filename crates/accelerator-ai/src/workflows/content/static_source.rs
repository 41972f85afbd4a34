use async_trait::async_trait;

use super::domain::{
    AnalyticalQuestion, ExerciseReview, LevelMaterial, ProjectEvaluationResult, QuizQuestion,
};
use super::{fallback, ContentError, ContentService, LevelRef};
use crate::workflows::academy::domain::UserProfile;
use crate::workflows::funnel::domain::ApplicantProfile;

/// Offline provider serving the built-in curriculum. Used when no API key is
/// configured and by the CLI demo.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContentService;

#[async_trait]
impl ContentService for StaticContentService {
    async fn analytical_questions(
        &self,
        _profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        Ok(fallback::analytical_questions())
    }

    async fn evaluate_project(
        &self,
        _idea: &str,
        _profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        Ok(fallback::project_evaluation())
    }

    async fn level_material(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError> {
        Ok(fallback::level_material(level, user))
    }

    async fn level_quiz(
        &self,
        level: LevelRef<'_>,
        _user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        let mut questions = fallback::level_quiz(level);
        questions.push(QuizQuestion {
            id: 2,
            text: "Which of these is a good signal of success at this level?".to_string(),
            options: vec![
                "More followers".to_string(),
                "Customer satisfaction".to_string(),
                "More features".to_string(),
                "A beautiful design".to_string(),
            ],
            correct_index: 1,
            explanation: "Customer satisfaction is the real evidence of value.".to_string(),
        });
        questions.push(QuizQuestion {
            id: 3,
            text: "Which mistake do founders commonly make at this stage?".to_string(),
            options: vec![
                "Rushing".to_string(),
                "Overthinking".to_string(),
                "Ignoring customers".to_string(),
                "All of the above".to_string(),
            ],
            correct_index: 3,
            explanation: "All of these are common mistakes to avoid.".to_string(),
        });
        Ok(questions)
    }

    async fn review_exercise(
        &self,
        _exercise: &str,
        answer: &str,
    ) -> Result<ExerciseReview, ContentError> {
        let words = answer.split_whitespace().count();
        let review = if words >= 10 {
            ExerciseReview {
                passed: true,
                feedback: "Accepted: the answer applies the level concepts to your project."
                    .to_string(),
            }
        } else {
            ExerciseReview {
                passed: false,
                feedback: format!(
                    "Only {words} word(s). Expand the answer with concrete steps for your project."
                ),
            }
        };
        Ok(review)
    }
}

//! Built-in stand-ins returned whenever the content provider fails.

use super::domain::{
    AnalyticalQuestion, Classification, Difficulty, ExerciseReview, LevelMaterial,
    ProjectEvaluationResult, QuestionKind, QuizQuestion,
};
use super::LevelRef;
use crate::workflows::academy::domain::UserProfile;

fn options(values: [&str; 4]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(crate) fn analytical_questions() -> Vec<AnalyticalQuestion> {
    vec![
        AnalyticalQuestion {
            id: 1,
            text: "Customer acquisition cost (CAC) is $50 and lifetime value (LTV) is $40. What do you do?"
                .to_string(),
            kind: QuestionKind::Analysis,
            difficulty: Difficulty::Easy,
            options: options([
                "Increase the marketing budget",
                "Pause the campaigns and improve the product or pricing",
                "Hire more salespeople",
                "Nothing, this is normal at the start",
            ]),
            correct_index: 1,
        },
        AnalyticalQuestion {
            id: 2,
            text: "Which of these metrics matters most for a SaaS company in its growth stage?"
                .to_string(),
            kind: QuestionKind::Choice,
            difficulty: Difficulty::Medium,
            options: options([
                "Headcount",
                "MRR (monthly recurring revenue)",
                "Follower count",
                "Total costs",
            ]),
            correct_index: 1,
        },
        AnalyticalQuestion {
            id: 3,
            text: "You have 1,000 users and 5% of them buy the service at $100. What is the total revenue?"
                .to_string(),
            kind: QuestionKind::Math,
            difficulty: Difficulty::Medium,
            options: options(["$500", "$5,000", "$1,000", "$50,000"]),
            correct_index: 1,
        },
    ]
}

pub(crate) fn project_evaluation() -> ProjectEvaluationResult {
    ProjectEvaluationResult {
        clarity: 15.0,
        value: 15.0,
        innovation: 10.0,
        market: 12.0,
        readiness: 10.0,
        total_score: 62.0,
        ai_opinion: "A promising idea, but the execution plan and the competitor analysis need more detail."
            .to_string(),
        classification: Classification::Yellow,
    }
}

pub(crate) fn level_material(level: LevelRef<'_>, user: &UserProfile) -> LevelMaterial {
    LevelMaterial {
        content: format!(
            "Welcome to level {id}. In this level we cover the fundamentals of {title}.\n\n\
             This topic is vital for any startup in the {industry} sector. Focus on understanding \
             your customers' needs and how to meet them efficiently.\n\n\
             Review the additional resources and get ready for the practical exercise.",
            id = level.id,
            title = level.title,
            industry = user.industry,
        ),
        exercise: format!(
            "Based on what you have learned, how can you apply the concepts of {title} to your project \"{startup}\"? Explain in 3 points.",
            title = level.title,
            startup = user.startup_name,
        ),
    }
}

pub(crate) fn level_quiz(level: LevelRef<'_>) -> Vec<QuizQuestion> {
    vec![QuizQuestion {
        id: 1,
        text: format!("What matters most when starting on {}?", level.title),
        options: options([
            "Funding",
            "The team",
            "Understanding the problem",
            "Marketing",
        ]),
        correct_index: 2,
        explanation: "Understanding the problem is the cornerstone of any successful solution."
            .to_string(),
    }]
}

pub(crate) fn exercise_review() -> ExerciseReview {
    ExerciseReview {
        passed: true,
        feedback: "Good answer, well done! (The reviewer could not be reached for a detailed analysis.)"
            .to_string(),
    }
}

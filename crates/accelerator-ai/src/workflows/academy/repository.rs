use serde::{Deserialize, Serialize};

use super::domain::{LevelData, UserProfile};
use super::progression::ProgressionController;
use super::session::{LevelSession, LevelStep, QuizOutcome, SessionRequest, CELEBRATION_DELAY_MS};
use crate::workflows::content::{ExerciseReview, LevelMaterial, QuizQuestion};
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcademySessionId(pub String);

/// Repository record holding one entrepreneur's academy progress.
#[derive(Debug, Clone)]
pub struct AcademyRecord {
    pub id: AcademySessionId,
    pub progression: ProgressionController,
}

impl AcademyRecord {
    pub fn view(&self) -> AcademyView {
        let progression = &self.progression;
        AcademyView {
            session_id: self.id.clone(),
            user: progression.user().clone(),
            levels: progression.levels().to_vec(),
            progress_percent: progression.progress_percent(),
            all_completed: progression.all_completed(),
            active_level_id: progression.active_level_id(),
            active: progression.active_session().map(LevelSessionView::from),
        }
    }
}

pub trait AcademyRepository: Send + Sync {
    fn insert(&self, record: AcademyRecord) -> Result<AcademyRecord, RepositoryError>;
    fn update(&self, record: AcademyRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AcademySessionId) -> Result<Option<AcademyRecord>, RepositoryError>;
}

/// Quiz question as shown to the learner. The answer key and explanation are
/// revealed once the attempt is graded.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestionView {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestionView {
    fn new(question: &QuizQuestion, graded: bool) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            options: question.options.clone(),
            correct_index: graded.then_some(question.correct_index),
            explanation: graded.then(|| question.explanation.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelSessionView {
    pub level_id: u32,
    pub title: String,
    pub step: LevelStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<LevelMaterial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_fault: Option<String>,
    pub reading_progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ExerciseReview>,
    pub questions: Vec<QuizQuestionView>,
    pub quiz_answers: Vec<Option<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<QuizOutcome>,
    /// Set once the quiz is passed; the view holds the celebration this long.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_request: Option<SessionRequest>,
}

impl From<&LevelSession> for LevelSessionView {
    fn from(session: &LevelSession) -> Self {
        let graded = session.outcome().is_some();
        Self {
            level_id: session.level_id(),
            title: session.title().to_string(),
            step: session.step(),
            material: session.material().cloned(),
            material_fault: session.material_fault().map(str::to_string),
            reading_progress: session.reading_progress(),
            exercise_answer: session.exercise_answer().map(str::to_string),
            review: session.review().cloned(),
            questions: session
                .questions()
                .iter()
                .map(|question| QuizQuestionView::new(question, graded))
                .collect(),
            quiz_answers: session.quiz_answers().to_vec(),
            outcome: session.outcome(),
            celebration_delay_ms: session.is_completed().then_some(CELEBRATION_DELAY_MS),
            pending_request: session.pending_request(),
        }
    }
}

/// Sanitized representation of an academy session.
#[derive(Debug, Clone, Serialize)]
pub struct AcademyView {
    pub session_id: AcademySessionId,
    pub user: UserProfile,
    pub levels: Vec<LevelData>,
    pub progress_percent: u8,
    pub all_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_level_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<LevelSessionView>,
}

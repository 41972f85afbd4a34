use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::academy::repository::{AcademyRecord, AcademyRepository, AcademySessionId};
use crate::workflows::academy::{
    standard_curriculum, AcademyService, FixedCertificateIds, LevelDefinition, LevelSession,
    ProgressionController, RegistrationForm, UserProfile,
};
use crate::workflows::content::{
    AnalyticalQuestion, ContentError, ContentGateway, ContentService, ExerciseReview,
    LevelMaterial, LevelRef, ProjectEvaluationResult, QuizQuestion, StaticContentService,
};
use crate::workflows::funnel::domain::ApplicantProfile;
use crate::workflows::{RepositoryError, RequestTicket};

pub(super) const CERTIFICATE_PREFIX: &str = "K7Q2M9X4A";

pub(super) fn user() -> UserProfile {
    UserProfile {
        name: "Falcon".to_string(),
        startup_name: "Harvest Loop".to_string(),
        startup_description: "Marketplace for surplus farm produce".to_string(),
        industry: "Agriculture".to_string(),
    }
}

pub(super) fn registration() -> RegistrationForm {
    RegistrationForm {
        name: "Falcon".to_string(),
        startup_name: "Harvest Loop".to_string(),
        startup_description: "Marketplace for surplus farm produce".to_string(),
        industry: Some("Agriculture".to_string()),
    }
}

pub(super) fn curriculum(levels: usize) -> Vec<LevelDefinition> {
    (1..=levels)
        .map(|idx| LevelDefinition {
            title: format!("Level {idx}"),
            description: format!("Description {idx}"),
        })
        .collect()
}

pub(super) fn progression() -> ProgressionController {
    ProgressionController::new(user(), standard_curriculum())
}

pub(super) fn material() -> LevelMaterial {
    LevelMaterial {
        content: "Talk to twenty customers before writing code.".to_string(),
        exercise: "List three assumptions about your customers.".to_string(),
    }
}

pub(super) fn review(passed: bool) -> ExerciseReview {
    ExerciseReview {
        passed,
        feedback: if passed {
            "Clear and specific.".to_string()
        } else {
            "Too vague, name the customer segment.".to_string()
        },
    }
}

pub(super) fn quiz_question(id: u32, correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        id,
        text: format!("Question {id}"),
        options: (0..4).map(|idx| format!("option {idx}")).collect(),
        correct_index,
        explanation: format!("Option {correct_index} is right."),
    }
}

/// Three questions whose correct answers are 0, 1 and 2.
pub(super) fn quiz() -> Vec<QuizQuestion> {
    vec![quiz_question(1, 0), quiz_question(2, 1), quiz_question(3, 2)]
}

/// Session opened on level 1 with material loaded.
pub(super) fn learning_session() -> LevelSession {
    let (mut session, ticket) = LevelSession::open(1, "Idea Validation");
    session
        .resolve_material(ticket, Ok(material()))
        .expect("material resolves");
    session
}

/// Session sitting in `Exercise` with reviewer feedback recorded.
pub(super) fn reviewed_session(passed: bool) -> LevelSession {
    let mut session = learning_session();
    session.begin_exercise().expect("exercise opens");
    let ticket = session
        .submit_exercise("Farmers waste produce; buyers want it cheap; logistics is solvable.")
        .expect("answer accepted");
    session
        .resolve_exercise_review(ticket, review(passed))
        .expect("review resolves");
    session
}

/// Session sitting in `Quiz` with the three-question set loaded.
pub(super) fn quiz_session() -> LevelSession {
    let mut session = reviewed_session(true);
    let ticket: RequestTicket = session.begin_quiz().expect("quiz requested");
    session.resolve_quiz(ticket, Ok(quiz())).expect("quiz resolves");
    session
}

#[derive(Default, Clone)]
pub(super) struct MemoryAcademyRepository {
    pub(super) records: Arc<Mutex<HashMap<AcademySessionId, AcademyRecord>>>,
}

impl MemoryAcademyRepository {
    pub(super) fn stored(&self, id: &AcademySessionId) -> AcademyRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("record present")
    }
}

impl AcademyRepository for MemoryAcademyRepository {
    fn insert(&self, record: AcademyRecord) -> Result<AcademyRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AcademyRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AcademySessionId) -> Result<Option<AcademyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl AcademyRepository for UnavailableRepository {
    fn insert(&self, _record: AcademyRecord) -> Result<AcademyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: AcademyRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &AcademySessionId) -> Result<Option<AcademyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Content source that fails every request.
pub(super) struct FailingContent;

#[async_trait]
impl ContentService for FailingContent {
    async fn analytical_questions(
        &self,
        _profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        Err(ContentError::Transport("connection refused".to_string()))
    }

    async fn evaluate_project(
        &self,
        _idea: &str,
        _profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        Err(ContentError::Transport("connection refused".to_string()))
    }

    async fn level_material(
        &self,
        _level: LevelRef<'_>,
        _user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError> {
        Err(ContentError::Transport("connection refused".to_string()))
    }

    async fn level_quiz(
        &self,
        _level: LevelRef<'_>,
        _user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        Err(ContentError::Transport("connection refused".to_string()))
    }

    async fn review_exercise(
        &self,
        _exercise: &str,
        _answer: &str,
    ) -> Result<ExerciseReview, ContentError> {
        Err(ContentError::Transport("connection refused".to_string()))
    }
}

/// Static content, except that the learner leaves the level while the quiz
/// request is in flight.
pub(super) struct LeavesDuringQuiz {
    pub(super) repository: Arc<MemoryAcademyRepository>,
}

#[async_trait]
impl ContentService for LeavesDuringQuiz {
    async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        StaticContentService.analytical_questions(profile).await
    }

    async fn evaluate_project(
        &self,
        idea: &str,
        profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        StaticContentService.evaluate_project(idea, profile).await
    }

    async fn level_material(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError> {
        StaticContentService.level_material(level, user).await
    }

    async fn level_quiz(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        let ids: Vec<AcademySessionId> = self
            .repository
            .records
            .lock()
            .expect("repository mutex poisoned")
            .keys()
            .cloned()
            .collect();
        for id in ids {
            let mut record = self.repository.stored(&id);
            if record.progression.leave_level().is_ok() {
                self.repository.update(record).expect("update succeeds");
            }
        }
        StaticContentService.level_quiz(level, user).await
    }

    async fn review_exercise(
        &self,
        exercise: &str,
        answer: &str,
    ) -> Result<ExerciseReview, ContentError> {
        StaticContentService.review_exercise(exercise, answer).await
    }
}

/// Content source whose responses never arrive.
pub(super) struct NeverResponds;

#[async_trait]
impl ContentService for NeverResponds {
    async fn analytical_questions(
        &self,
        _profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        std::future::pending().await
    }

    async fn evaluate_project(
        &self,
        _idea: &str,
        _profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        std::future::pending().await
    }

    async fn level_material(
        &self,
        _level: LevelRef<'_>,
        _user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError> {
        std::future::pending().await
    }

    async fn level_quiz(
        &self,
        _level: LevelRef<'_>,
        _user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        std::future::pending().await
    }

    async fn review_exercise(
        &self,
        _exercise: &str,
        _answer: &str,
    ) -> Result<ExerciseReview, ContentError> {
        std::future::pending().await
    }
}

pub(super) fn service_over<A>(
    repository: Arc<A>,
    content: Arc<dyn ContentService>,
) -> AcademyService<A>
where
    A: AcademyRepository + 'static,
{
    AcademyService::new(
        repository,
        ContentGateway::new(content),
        Arc::new(FixedCertificateIds(CERTIFICATE_PREFIX.to_string())),
    )
}

pub(super) fn build_service_with(
    content: Arc<dyn ContentService>,
) -> (
    AcademyService<MemoryAcademyRepository>,
    Arc<MemoryAcademyRepository>,
) {
    let repository = Arc::new(MemoryAcademyRepository::default());
    let service = service_over(repository.clone(), content);
    (service, repository)
}

pub(super) fn build_service() -> (
    AcademyService<MemoryAcademyRepository>,
    Arc<MemoryAcademyRepository>,
) {
    build_service_with(Arc::new(StaticContentService))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::FunnelSettings;
use crate::workflows::academy::repository::{AcademyRecord, AcademyRepository, AcademySessionId};
use crate::workflows::academy::{AcademyService, FixedCertificateIds, UserProfile};
use crate::workflows::content::{
    AnalyticalQuestion, Classification, ContentError, ContentGateway, ContentService,
    ExerciseReview, LevelMaterial, LevelRef, ProjectEvaluationResult, QuizQuestion,
    StaticContentService,
};
use crate::workflows::funnel::repository::{FunnelRecord, FunnelRepository, FunnelSessionId};
use crate::workflows::funnel::{
    ApplicantProfile, FixedEthics, FunnelController, FunnelService, ProjectStage,
    ScoringConfig, ScoringEngine, TechLevel,
};
use crate::workflows::RepositoryError;

pub(super) fn profile(stage: ProjectStage, tech_level: TechLevel) -> ApplicantProfile {
    ApplicantProfile {
        code_name: "Falcon".to_string(),
        project_stage: stage,
        sector: "Tech".to_string(),
        goal: "Route freight with fewer empty miles".to_string(),
        tech_level,
    }
}

/// Evaluation whose clarity and readiness leave a Prototype's metrics
/// unchanged.
pub(super) fn evaluation(classification: Classification) -> ProjectEvaluationResult {
    ProjectEvaluationResult {
        clarity: 15.0,
        value: 14.0,
        innovation: 12.0,
        market: 11.0,
        readiness: 15.0,
        total_score: 67.0,
        ai_opinion: "Credible plan with a narrow wedge.".to_string(),
        classification,
    }
}

pub(super) fn engine(ethics: f64) -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default(), Arc::new(FixedEthics(ethics)))
}

pub(super) fn settings(include_project_evaluation: bool) -> FunnelSettings {
    FunnelSettings {
        include_project_evaluation,
    }
}

pub(super) fn controller(include_project_evaluation: bool) -> FunnelController {
    FunnelController::new(settings(include_project_evaluation), engine(90.0))
}

/// Controller sitting in `AnalyticalTest` for the given profile.
pub(super) fn analytical_stage(
    include_project_evaluation: bool,
    profile: ApplicantProfile,
) -> FunnelController {
    let mut controller = controller(include_project_evaluation);
    controller.submit_profile(profile).expect("profile accepted");
    controller
        .complete_personality("Visionary Leader")
        .expect("style accepted");
    controller
}

#[derive(Default, Clone)]
pub(super) struct MemoryFunnelRepository {
    pub(super) records: Arc<Mutex<HashMap<FunnelSessionId, FunnelRecord>>>,
}

impl MemoryFunnelRepository {
    pub(super) fn stored(&self, id: &FunnelSessionId) -> FunnelRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
            .expect("record present")
    }
}

impl FunnelRepository for MemoryFunnelRepository {
    fn insert(&self, record: FunnelRecord) -> Result<FunnelRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: FunnelRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &FunnelSessionId) -> Result<Option<FunnelRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAcademyRepository {
    records: Arc<Mutex<HashMap<AcademySessionId, AcademyRecord>>>,
}

impl MemoryAcademyRepository {
    pub(super) fn enrolled(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AcademyRepository for MemoryAcademyRepository {
    fn insert(&self, record: AcademyRecord) -> Result<AcademyRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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

/// Static content, except that the applicant submits a direct analytical
/// score while the question set is still loading.
pub(super) struct ScoresWhileLoading {
    pub(super) repository: Arc<MemoryFunnelRepository>,
    pub(super) score: u8,
}

#[async_trait]
impl ContentService for ScoresWhileLoading {
    async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        let ids: Vec<FunnelSessionId> = self
            .repository
            .records
            .lock()
            .expect("repository mutex poisoned")
            .keys()
            .cloned()
            .collect();
        for id in ids {
            let mut record = self.repository.stored(&id);
            if record.controller.complete_analytical(self.score).is_ok() {
                self.repository.update(record).expect("update succeeds");
            }
        }
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

/// Content source returning an out-of-range project evaluation.
pub(super) struct InflatedEvaluation;

#[async_trait]
impl ContentService for InflatedEvaluation {
    async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        StaticContentService.analytical_questions(profile).await
    }

    async fn evaluate_project(
        &self,
        _idea: &str,
        _profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        let mut result = evaluation(Classification::Green);
        result.clarity = 35.0;
        Ok(result)
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

pub(super) type TestService = FunnelService<MemoryFunnelRepository, MemoryAcademyRepository>;

pub(super) fn service_over(
    repository: Arc<MemoryFunnelRepository>,
    content: Arc<dyn ContentService>,
    include_project_evaluation: bool,
) -> (TestService, Arc<MemoryAcademyRepository>) {
    let academy_repository = Arc::new(MemoryAcademyRepository::default());
    let gateway = ContentGateway::new(content);
    let academy = Arc::new(AcademyService::new(
        academy_repository.clone(),
        gateway.clone(),
        Arc::new(FixedCertificateIds("K7Q2M9X4A".to_string())),
    ));
    let service = FunnelService::new(
        repository,
        academy,
        gateway,
        settings(include_project_evaluation),
        engine(90.0),
    );
    (service, academy_repository)
}

pub(super) fn build_service(
    include_project_evaluation: bool,
) -> (
    TestService,
    Arc<MemoryFunnelRepository>,
    Arc<MemoryAcademyRepository>,
) {
    let repository = Arc::new(MemoryFunnelRepository::default());
    let (service, academy) = service_over(
        repository.clone(),
        Arc::new(StaticContentService),
        include_project_evaluation,
    );
    (service, repository, academy)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

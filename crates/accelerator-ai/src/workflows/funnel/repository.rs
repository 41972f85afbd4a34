use serde::{Deserialize, Serialize};

use super::analytical::AnalyticalProgress;
use super::controller::{FunnelController, FunnelRequest, FunnelStage};
use super::domain::ApplicantProfile;
use super::personality::PersonalityScenario;
use super::scoring::FinalResult;
use crate::workflows::content::{
    AnalyticalQuestion, Difficulty, ProjectEvaluationResult, QuestionKind,
};
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunnelSessionId(pub String);

/// Repository record holding one applicant's funnel.
#[derive(Debug, Clone)]
pub struct FunnelRecord {
    pub id: FunnelSessionId,
    pub controller: FunnelController,
}

impl FunnelRecord {
    pub fn view(&self) -> FunnelView {
        let controller = &self.controller;
        let scenarios = (controller.stage() == FunnelStage::PersonalityTest)
            .then(|| controller.personality().scenarios().to_vec());

        FunnelView {
            session_id: self.id.clone(),
            stage: controller.stage(),
            include_project_evaluation: controller.settings().include_project_evaluation,
            profile: controller.profile().cloned(),
            scenarios,
            leadership_style: controller.leadership_style().map(str::to_string),
            analytical: AnalyticalView {
                progress: controller.analytical().progress(),
                current_question: controller
                    .analytical()
                    .current_question()
                    .map(QuestionView::from),
            },
            analytical_score: controller.analytical_score(),
            idea: controller.idea().map(str::to_string),
            project_evaluation: controller.project_evaluation().cloned(),
            result: controller.result().cloned(),
            pending_request: controller.pending_request(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait FunnelRepository: Send + Sync {
    fn insert(&self, record: FunnelRecord) -> Result<FunnelRecord, RepositoryError>;
    fn update(&self, record: FunnelRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &FunnelSessionId) -> Result<Option<FunnelRecord>, RepositoryError>;
}

/// Analytical question as shown to the applicant, without the answer key.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub text: String,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
}

impl From<&AnalyticalQuestion> for QuestionView {
    fn from(question: &AnalyticalQuestion) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            kind: question.kind,
            difficulty: question.difficulty,
            options: question.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticalView {
    #[serde(flatten)]
    pub progress: AnalyticalProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
}

/// Sanitized representation of a funnel session.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelView {
    pub session_id: FunnelSessionId,
    pub stage: FunnelStage,
    pub include_project_evaluation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ApplicantProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<PersonalityScenario>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leadership_style: Option<String>,
    pub analytical: AnalyticalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytical_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_evaluation: Option<ProjectEvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FinalResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_request: Option<FunnelRequest>,
}

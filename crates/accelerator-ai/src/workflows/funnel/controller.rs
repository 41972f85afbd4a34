use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::analytical::{AnalyticalProgress, AnalyticalTest};
use super::domain::ApplicantProfile;
use super::personality::PersonalityTest;
use super::scoring::{FinalResult, ScoringEngine, ScoringInputs};
use crate::config::FunnelSettings;
use crate::workflows::academy::{standard_curriculum, ProgressionController};
use crate::workflows::content::{AnalyticalQuestion, ProjectEvaluationResult, Validate};
use crate::workflows::{Outstanding, RequestTicket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Welcome,
    PersonalityTest,
    AnalyticalTest,
    ProjectEvaluation,
    AssessmentResult,
    FinalReport,
    DevelopmentPlan,
    AdminDashboard,
}

impl FunnelStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::PersonalityTest => "personality_test",
            Self::AnalyticalTest => "analytical_test",
            Self::ProjectEvaluation => "project_evaluation",
            Self::AssessmentResult => "assessment_result",
            Self::FinalReport => "final_report",
            Self::DevelopmentPlan => "development_plan",
            Self::AdminDashboard => "admin_dashboard",
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// External requests the funnel can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelRequest {
    AnalyticalQuestions,
    ProjectEvaluation,
}

impl fmt::Display for FunnelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AnalyticalQuestions => "analytical questions",
            Self::ProjectEvaluation => "project evaluation",
        })
    }
}

/// How the applicant supplied the project idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum IdeaInput {
    Text(String),
    /// Name of an uploaded document; only a summary line is evaluated.
    File(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityAnswer {
    pub scenario: u32,
    pub option: usize,
}

/// Either an explicit style string or the scenario answers to tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalitySubmission {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub answers: Vec<PersonalityAnswer>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunnelError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{operation} is not allowed at the {stage} stage")]
    Blocked {
        operation: &'static str,
        stage: FunnelStage,
    },
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),
    #[error("a {0} request is already outstanding")]
    RequestPending(FunnelRequest),
    #[error("response for ticket {0} no longer matches an outstanding request")]
    StaleResponse(RequestTicket),
}

/// Applicant funnel from intake to the qualification decision.
///
/// Every operation either applies completely or returns an error and leaves
/// the controller untouched.
#[derive(Debug, Clone)]
pub struct FunnelController {
    settings: FunnelSettings,
    engine: ScoringEngine,
    stage: FunnelStage,
    profile: Option<ApplicantProfile>,
    personality: PersonalityTest,
    leadership_style: Option<String>,
    analytical: AnalyticalTest,
    analytical_score: Option<u8>,
    idea: Option<String>,
    evaluation: Option<ProjectEvaluationResult>,
    result: Option<FinalResult>,
    outstanding: Outstanding<FunnelRequest>,
}

impl FunnelController {
    pub fn new(settings: FunnelSettings, engine: ScoringEngine) -> Self {
        Self {
            settings,
            engine,
            stage: FunnelStage::Welcome,
            profile: None,
            personality: PersonalityTest::default(),
            leadership_style: None,
            analytical: AnalyticalTest::default(),
            analytical_score: None,
            idea: None,
            evaluation: None,
            result: None,
            outstanding: Outstanding::default(),
        }
    }

    pub fn settings(&self) -> FunnelSettings {
        self.settings
    }

    pub fn stage(&self) -> FunnelStage {
        self.stage
    }

    pub fn profile(&self) -> Option<&ApplicantProfile> {
        self.profile.as_ref()
    }

    pub fn personality(&self) -> &PersonalityTest {
        &self.personality
    }

    pub fn leadership_style(&self) -> Option<&str> {
        self.leadership_style.as_deref()
    }

    pub fn analytical(&self) -> &AnalyticalTest {
        &self.analytical
    }

    pub fn analytical_score(&self) -> Option<u8> {
        self.analytical_score
    }

    pub fn idea(&self) -> Option<&str> {
        self.idea.as_deref()
    }

    pub fn project_evaluation(&self) -> Option<&ProjectEvaluationResult> {
        self.evaluation.as_ref()
    }

    pub fn result(&self) -> Option<&FinalResult> {
        self.result.as_ref()
    }

    pub fn pending_request(&self) -> Option<FunnelRequest> {
        self.outstanding.pending()
    }

    fn require_stage(
        &self,
        operation: &'static str,
        stage: FunnelStage,
    ) -> Result<(), FunnelError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(FunnelError::Blocked {
                operation,
                stage: self.stage,
            })
        }
    }

    fn require_profile(&self) -> Result<&ApplicantProfile, FunnelError> {
        self.profile
            .as_ref()
            .ok_or(FunnelError::MissingPrerequisite("applicant profile"))
    }

    fn require_current(
        &self,
        ticket: RequestTicket,
        kind: FunnelRequest,
    ) -> Result<(), FunnelError> {
        if self.outstanding.is_current(ticket, kind) {
            Ok(())
        } else {
            Err(FunnelError::StaleResponse(ticket))
        }
    }

    fn advance(&mut self, to: FunnelStage) {
        info!(from = self.stage.label(), to = to.label(), "funnel stage advanced");
        self.stage = to;
    }

    pub fn open_admin(&mut self) -> Result<(), FunnelError> {
        self.require_stage("open_admin", FunnelStage::Welcome)?;
        self.advance(FunnelStage::AdminDashboard);
        Ok(())
    }

    pub fn close_admin(&mut self) -> Result<(), FunnelError> {
        self.require_stage("close_admin", FunnelStage::AdminDashboard)?;
        self.advance(FunnelStage::Welcome);
        Ok(())
    }

    pub fn submit_profile(&mut self, profile: ApplicantProfile) -> Result<(), FunnelError> {
        self.require_stage("submit_profile", FunnelStage::Welcome)?;
        if let Some(reason) = profile.rejection() {
            return Err(FunnelError::Validation(reason.to_string()));
        }
        self.profile = Some(profile);
        self.advance(FunnelStage::PersonalityTest);
        Ok(())
    }

    /// Finish the personality step with an explicit style, or with the style
    /// tallied from the submitted scenario answers.
    pub fn submit_personality(
        &mut self,
        submission: PersonalitySubmission,
    ) -> Result<(), FunnelError> {
        self.require_stage("submit_personality", FunnelStage::PersonalityTest)?;
        if let Some(style) = submission.style {
            return self.complete_personality(&style);
        }

        let mut test = self.personality.clone();
        test.reset();
        for answer in &submission.answers {
            test.answer(answer.scenario, answer.option)
                .map_err(FunnelError::Validation)?;
        }
        let style = test.outcome().ok_or_else(|| {
            FunnelError::Validation(format!(
                "{} of {} scenarios answered",
                test.answered(),
                test.scenarios().len()
            ))
        })?;
        self.complete_personality(&style)?;
        self.personality = test;
        Ok(())
    }

    pub fn complete_personality(&mut self, style: &str) -> Result<(), FunnelError> {
        self.require_stage("complete_personality", FunnelStage::PersonalityTest)?;
        self.require_profile()?;
        let style = style.trim();
        if style.is_empty() {
            return Err(FunnelError::Validation(
                "leadership style must not be empty".to_string(),
            ));
        }
        self.leadership_style = Some(style.to_string());
        self.analytical.reset();
        self.advance(FunnelStage::AnalyticalTest);
        Ok(())
    }

    pub fn request_analytical_questions(&mut self) -> Result<RequestTicket, FunnelError> {
        self.require_stage("request_analytical_questions", FunnelStage::AnalyticalTest)?;
        self.require_profile()?;
        if self.analytical.is_loaded() {
            return Err(FunnelError::Blocked {
                operation: "request_analytical_questions",
                stage: self.stage,
            });
        }
        self.outstanding
            .issue(FunnelRequest::AnalyticalQuestions)
            .map_err(FunnelError::RequestPending)
    }

    /// Release a request whose caller went away before its response was
    /// applied, so the step can issue it again.
    pub fn release_request(&mut self, ticket: RequestTicket) -> Option<FunnelRequest> {
        self.outstanding.release(ticket)
    }

    pub fn resolve_analytical_questions(
        &mut self,
        ticket: RequestTicket,
        questions: Vec<AnalyticalQuestion>,
    ) -> Result<(), FunnelError> {
        self.require_current(ticket, FunnelRequest::AnalyticalQuestions)?;
        questions.validate().map_err(FunnelError::Validation)?;
        self.outstanding.settle(ticket, FunnelRequest::AnalyticalQuestions);
        self.analytical.load(questions);
        Ok(())
    }

    /// Answer the current analytical question. The last answer completes the
    /// stage with the computed percentage.
    pub fn answer_analytical(
        &mut self,
        option: usize,
    ) -> Result<AnalyticalProgress, FunnelError> {
        self.require_stage("answer_analytical", FunnelStage::AnalyticalTest)?;
        if !self.analytical.is_loaded() {
            return Err(FunnelError::MissingPrerequisite("analytical questions"));
        }
        self.require_prerequisites_for_scoring()?;

        let mut test = self.analytical.clone();
        let progress = test.answer(option).map_err(FunnelError::Validation)?;
        if let Some(score) = progress.score {
            self.complete_analytical(score)?;
        }
        self.analytical = test;
        Ok(progress)
    }

    fn require_prerequisites_for_scoring(&self) -> Result<(), FunnelError> {
        self.require_profile()?;
        if self.leadership_style.is_none() {
            return Err(FunnelError::MissingPrerequisite("leadership style"));
        }
        Ok(())
    }

    pub fn complete_analytical(&mut self, score: u8) -> Result<(), FunnelError> {
        self.require_stage("complete_analytical", FunnelStage::AnalyticalTest)?;
        self.require_prerequisites_for_scoring()?;
        if score > 100 {
            return Err(FunnelError::Validation(format!(
                "analytical score {score} outside 0..=100"
            )));
        }

        self.analytical_score = Some(score);
        self.outstanding.abandon();
        if self.settings.include_project_evaluation {
            self.advance(FunnelStage::ProjectEvaluation);
        } else {
            self.assess()?;
        }
        Ok(())
    }

    /// Start the evaluation of a project idea. A new submission replaces any
    /// earlier result.
    pub fn submit_project_idea(
        &mut self,
        input: IdeaInput,
    ) -> Result<RequestTicket, FunnelError> {
        self.require_stage("submit_project_idea", FunnelStage::ProjectEvaluation)?;
        let profile = self.require_profile()?;
        let idea = match input {
            IdeaInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(FunnelError::Validation(
                        "project idea must not be empty".to_string(),
                    ));
                }
                text.to_string()
            }
            IdeaInput::File(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(FunnelError::Validation(
                        "uploaded file needs a name".to_string(),
                    ));
                }
                profile.file_summary(name)
            }
        };

        let ticket = self
            .outstanding
            .issue(FunnelRequest::ProjectEvaluation)
            .map_err(FunnelError::RequestPending)?;
        self.idea = Some(idea);
        self.evaluation = None;
        Ok(ticket)
    }

    pub fn resolve_project_evaluation(
        &mut self,
        ticket: RequestTicket,
        result: ProjectEvaluationResult,
    ) -> Result<(), FunnelError> {
        self.require_current(ticket, FunnelRequest::ProjectEvaluation)?;
        result.validate().map_err(FunnelError::Validation)?;
        self.outstanding.settle(ticket, FunnelRequest::ProjectEvaluation);
        self.evaluation = Some(result);
        Ok(())
    }

    pub fn complete_project_evaluation(&mut self) -> Result<(), FunnelError> {
        self.require_stage("complete_project_evaluation", FunnelStage::ProjectEvaluation)?;
        if self.evaluation.is_none() {
            return Err(FunnelError::MissingPrerequisite("project evaluation result"));
        }
        self.assess()
    }

    /// Score the collected signals and move to `AssessmentResult`. Runs once
    /// per funnel pass.
    fn assess(&mut self) -> Result<(), FunnelError> {
        let profile = self.require_profile()?;
        let leadership_style = self
            .leadership_style
            .as_deref()
            .ok_or(FunnelError::MissingPrerequisite("leadership style"))?;
        let analytical_score = self
            .analytical_score
            .ok_or(FunnelError::MissingPrerequisite("analytical score"))?;

        let result = self.engine.score(ScoringInputs {
            profile,
            analytical_score,
            leadership_style,
            project_evaluation: self.evaluation.as_ref(),
        });
        info!(
            score = result.score,
            qualified = result.is_qualified,
            badges = result.badges.len(),
            "applicant scored"
        );

        self.result = Some(result);
        self.outstanding.abandon();
        self.advance(FunnelStage::AssessmentResult);
        Ok(())
    }

    pub fn continue_from_assessment(&mut self) -> Result<FunnelStage, FunnelError> {
        self.require_stage("continue_from_assessment", FunnelStage::AssessmentResult)?;
        let qualified = self
            .result
            .as_ref()
            .map(|result| result.is_qualified)
            .ok_or(FunnelError::MissingPrerequisite("final result"))?;
        let next = if qualified {
            FunnelStage::FinalReport
        } else {
            FunnelStage::DevelopmentPlan
        };
        self.advance(next);
        Ok(next)
    }

    /// Hand a qualified applicant over to the academy.
    pub fn enter_program(
        &self,
        startup_name: Option<&str>,
    ) -> Result<ProgressionController, FunnelError> {
        self.require_stage("enter_program", FunnelStage::FinalReport)?;
        let user = self.require_profile()?.to_user_profile(startup_name);
        Ok(ProgressionController::new(user, standard_curriculum()))
    }

    /// Discard every collected signal and return to `Welcome`.
    pub fn restart(&mut self) -> Result<(), FunnelError> {
        self.require_stage("restart", FunnelStage::DevelopmentPlan)?;
        *self = Self::new(self.settings, self.engine.clone());
        info!("funnel restarted");
        Ok(())
    }
}

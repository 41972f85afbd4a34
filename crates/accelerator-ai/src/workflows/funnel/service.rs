use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::analytical::AnalyticalProgress;
use super::controller::{FunnelController, FunnelError, IdeaInput, PersonalitySubmission};
use super::domain::ApplicantProfile;
use super::repository::{FunnelRecord, FunnelRepository, FunnelSessionId};
use super::scoring::ScoringEngine;
use crate::config::FunnelSettings;
use crate::workflows::academy::{
    AcademyRecord, AcademyRepository, AcademyService, AcademyServiceError,
};
use crate::workflows::content::ContentGateway;
use crate::workflows::repository::RepositoryError;
use crate::workflows::{ReleaseOnDrop, RequestTicket};

/// Service driving funnel sessions, their content requests, and the handover
/// of qualified applicants to the academy.
pub struct FunnelService<R, A> {
    repository: Arc<R>,
    academy: Arc<AcademyService<A>>,
    content: ContentGateway,
    settings: FunnelSettings,
    engine: ScoringEngine,
}

static FUNNEL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> FunnelSessionId {
    let id = FUNNEL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    FunnelSessionId(format!("funnel-{id:06}"))
}

impl<R, A> FunnelService<R, A>
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        academy: Arc<AcademyService<A>>,
        content: ContentGateway,
        settings: FunnelSettings,
        engine: ScoringEngine,
    ) -> Self {
        Self {
            repository,
            academy,
            content,
            settings,
            engine,
        }
    }

    fn load(&self, id: &FunnelSessionId) -> Result<FunnelRecord, FunnelServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn store(&self, record: FunnelRecord) -> Result<FunnelRecord, FunnelServiceError> {
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Apply a synchronous controller operation and persist the result.
    fn apply<F>(
        &self,
        id: &FunnelSessionId,
        operation: F,
    ) -> Result<FunnelRecord, FunnelServiceError>
    where
        F: FnOnce(&mut FunnelController) -> Result<(), FunnelError>,
    {
        let mut record = self.load(id)?;
        operation(&mut record.controller)?;
        self.store(record)
    }

    pub fn start(&self) -> Result<FunnelRecord, FunnelServiceError> {
        let record = FunnelRecord {
            id: next_session_id(),
            controller: FunnelController::new(self.settings, self.engine.clone()),
        };
        let stored = self.repository.insert(record)?;
        info!(
            session = %stored.id.0,
            project_evaluation = self.settings.include_project_evaluation,
            "funnel session started"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &FunnelSessionId) -> Result<FunnelRecord, FunnelServiceError> {
        self.load(id)
    }

    pub fn open_admin(&self, id: &FunnelSessionId) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, FunnelController::open_admin)
    }

    pub fn close_admin(&self, id: &FunnelSessionId) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, FunnelController::close_admin)
    }

    pub fn submit_profile(
        &self,
        id: &FunnelSessionId,
        profile: ApplicantProfile,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, |controller| controller.submit_profile(profile))
    }

    pub fn submit_personality(
        &self,
        id: &FunnelSessionId,
        submission: PersonalitySubmission,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, |controller| controller.submit_personality(submission))
    }

    /// Fetch the analytical question set for the applicant.
    pub async fn load_analytical_questions(
        &self,
        id: &FunnelSessionId,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        let mut record = self.load(id)?;
        let ticket = record.controller.request_analytical_questions()?;
        let profile = record
            .controller
            .profile()
            .cloned()
            .ok_or(FunnelError::MissingPrerequisite("applicant profile"))?;
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let questions = self.content.analytical_questions(&profile).await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record.controller.resolve_analytical_questions(ticket, questions);
        self.settle_response(record, applied, "analytical questions")
    }

    pub fn answer_analytical(
        &self,
        id: &FunnelSessionId,
        option: usize,
    ) -> Result<(AnalyticalProgress, FunnelRecord), FunnelServiceError> {
        let mut record = self.load(id)?;
        let progress = record.controller.answer_analytical(option)?;
        Ok((progress, self.store(record)?))
    }

    pub fn complete_analytical(
        &self,
        id: &FunnelSessionId,
        score: u8,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, |controller| controller.complete_analytical(score))
    }

    /// Submit the project idea and wait for its evaluation.
    pub async fn evaluate_project(
        &self,
        id: &FunnelSessionId,
        input: IdeaInput,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        let mut record = self.load(id)?;
        let ticket = record.controller.submit_project_idea(input)?;
        let idea = record.controller.idea().unwrap_or_default().to_string();
        let profile = record
            .controller
            .profile()
            .cloned()
            .ok_or(FunnelError::MissingPrerequisite("applicant profile"))?;
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let evaluation = self.content.evaluate_project(&idea, &profile).await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record.controller.resolve_project_evaluation(ticket, evaluation);
        self.settle_response(record, applied, "project evaluation")
    }

    pub fn complete_project_evaluation(
        &self,
        id: &FunnelSessionId,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, FunnelController::complete_project_evaluation)
    }

    pub fn continue_from_assessment(
        &self,
        id: &FunnelSessionId,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, |controller| controller.continue_from_assessment().map(|_| ()))
    }

    pub fn restart(&self, id: &FunnelSessionId) -> Result<FunnelRecord, FunnelServiceError> {
        self.apply(id, FunnelController::restart)
    }

    /// Enroll a qualified applicant in the academy under a derived profile.
    pub fn enter_program(
        &self,
        id: &FunnelSessionId,
        startup_name: Option<&str>,
    ) -> Result<AcademyRecord, FunnelServiceError> {
        let record = self.load(id)?;
        let progression = record.controller.enter_program(startup_name)?;
        let enrolled = self.academy.enroll(progression)?;
        info!(
            funnel = %id.0,
            academy = %enrolled.id.0,
            "applicant entered the program"
        );
        Ok(enrolled)
    }

    /// Free a ticket whose awaiting request was dropped before the response.
    fn release(&self, id: &FunnelSessionId, ticket: RequestTicket) {
        let mut record = match self.repository.fetch(id) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(error) => {
                warn!(session = %id.0, %error, "could not release interrupted request");
                return;
            }
        };
        if let Some(request) = record.controller.release_request(ticket) {
            debug!(session = %id.0, %request, %ticket, "request interrupted, ticket released");
            if let Err(error) = self.repository.update(record) {
                warn!(session = %id.0, %error, "could not release interrupted request");
            }
        }
    }

    fn settle_response(
        &self,
        record: FunnelRecord,
        applied: Result<(), FunnelError>,
        response: &'static str,
    ) -> Result<FunnelRecord, FunnelServiceError> {
        match applied {
            Ok(()) => self.store(record),
            Err(FunnelError::StaleResponse(ticket)) => {
                debug!(session = %record.id.0, response, %ticket, "discarding late response");
                Ok(record)
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Error raised by the funnel service.
#[derive(Debug, thiserror::Error)]
pub enum FunnelServiceError {
    #[error(transparent)]
    Funnel(#[from] FunnelError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Academy(#[from] AcademyServiceError),
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::certificate::{Certificate, CertificateIdSource};
use super::domain::{standard_curriculum, RegistrationForm};
use super::progression::{ProgressionController, ProgressionError};
use super::repository::{AcademyRecord, AcademyRepository, AcademySessionId};
use super::session::{QuizOutcome, SessionError};
use crate::workflows::content::{ContentGateway, LevelRef};
use crate::workflows::repository::RepositoryError;
use crate::workflows::{ReleaseOnDrop, RequestTicket};

/// Service driving academy sessions and their content requests.
pub struct AcademyService<A> {
    repository: Arc<A>,
    content: ContentGateway,
    certificates: Arc<dyn CertificateIdSource>,
}

static ACADEMY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> AcademySessionId {
    let id = ACADEMY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AcademySessionId(format!("academy-{id:06}"))
}

/// Late responses for a level the learner already left are dropped.
fn is_late(error: &ProgressionError) -> bool {
    matches!(
        error,
        ProgressionError::NoActiveLevel
            | ProgressionError::Session(SessionError::StaleResponse(_))
    )
}

impl<A> AcademyService<A>
where
    A: AcademyRepository + 'static,
{
    pub fn new(
        repository: Arc<A>,
        content: ContentGateway,
        certificates: Arc<dyn CertificateIdSource>,
    ) -> Self {
        Self {
            repository,
            content,
            certificates,
        }
    }

    fn load(&self, id: &AcademySessionId) -> Result<AcademyRecord, AcademyServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn store(&self, record: AcademyRecord) -> Result<AcademyRecord, AcademyServiceError> {
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Start the program from the standalone registration form.
    pub fn register(&self, form: RegistrationForm) -> Result<AcademyRecord, AcademyServiceError> {
        let user = form
            .into_profile()
            .map_err(AcademyServiceError::Registration)?;
        self.enroll(ProgressionController::new(user, standard_curriculum()))
    }

    /// Store a progression handed over by the funnel or the registration form.
    pub fn enroll(
        &self,
        progression: ProgressionController,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let record = AcademyRecord {
            id: next_session_id(),
            progression,
        };
        let stored = self.repository.insert(record)?;
        info!(
            session = %stored.id.0,
            startup = %stored.progression.user().startup_name,
            "academy session started"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &AcademySessionId) -> Result<AcademyRecord, AcademyServiceError> {
        self.load(id)
    }

    /// Open a level and load its material.
    pub async fn select_level(
        &self,
        id: &AcademySessionId,
        level_id: u32,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        let ticket = record.progression.select_level(level_id)?;
        let user = record.progression.user().clone();
        let title = record
            .progression
            .active_session()
            .map(|session| session.title().to_string())
            .unwrap_or_default();
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let material = self
            .content
            .level_material(LevelRef { id: level_id, title: &title }, &user)
            .await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record
            .progression
            .session_mut()
            .and_then(|session| Ok(session.resolve_material(ticket, Ok(material))?));
        self.settle_response(record, applied.map(|_| ()), "level material")
    }

    /// Issue a fresh material request after a failed load.
    pub async fn retry_material(
        &self,
        id: &AcademySessionId,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        let session = record.progression.session_mut()?;
        let ticket = session.retry_material()?;
        let (level_id, title) = (session.level_id(), session.title().to_string());
        let user = record.progression.user().clone();
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let material = self
            .content
            .level_material(LevelRef { id: level_id, title: &title }, &user)
            .await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record
            .progression
            .session_mut()
            .and_then(|session| Ok(session.resolve_material(ticket, Ok(material))?));
        self.settle_response(record, applied.map(|_| ()), "level material")
    }

    pub fn record_reading(
        &self,
        id: &AcademySessionId,
        percent: u8,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        record.progression.session_mut()?.record_reading_progress(percent)?;
        self.store(record)
    }

    pub fn begin_exercise(
        &self,
        id: &AcademySessionId,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        record.progression.session_mut()?.begin_exercise()?;
        self.store(record)
    }

    /// Submit the exercise answer and wait for the reviewer's feedback.
    pub async fn submit_exercise(
        &self,
        id: &AcademySessionId,
        answer: &str,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        let session = record.progression.session_mut()?;
        let ticket = session.submit_exercise(answer)?;
        let exercise = session.exercise().unwrap_or_default().to_string();
        let answer = session.exercise_answer().unwrap_or_default().to_string();
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let review = self.content.review_exercise(&exercise, &answer).await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record
            .progression
            .session_mut()
            .and_then(|session| Ok(session.resolve_exercise_review(ticket, review)?));
        self.settle_response(record, applied, "exercise review")
    }

    /// Move on to the quiz and load its questions.
    pub async fn begin_quiz(
        &self,
        id: &AcademySessionId,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        let session = record.progression.session_mut()?;
        let ticket = session.begin_quiz()?;
        let (level_id, title) = (session.level_id(), session.title().to_string());
        let user = record.progression.user().clone();
        self.store(record)?;

        let guard = ReleaseOnDrop::new(|| self.release(id, ticket));
        let questions = self
            .content
            .level_quiz(LevelRef { id: level_id, title: &title }, &user)
            .await;
        guard.disarm();

        let mut record = self.load(id)?;
        let applied = record
            .progression
            .session_mut()
            .and_then(|session| Ok(session.resolve_quiz(ticket, Ok(questions))?));
        self.settle_response(record, applied.map(|_| ()), "level quiz")
    }

    pub fn answer_quiz(
        &self,
        id: &AcademySessionId,
        question_id: u32,
        option: usize,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        record.progression.session_mut()?.answer_quiz(question_id, option)?;
        self.store(record)
    }

    pub fn submit_quiz(
        &self,
        id: &AcademySessionId,
    ) -> Result<(QuizOutcome, AcademyRecord), AcademyServiceError> {
        let mut record = self.load(id)?;
        let outcome = record.progression.session_mut()?.submit_quiz()?;
        info!(
            session = %id.0,
            correct = outcome.correct,
            total = outcome.total,
            passed = outcome.passed,
            "quiz graded"
        );
        Ok((outcome, self.store(record)?))
    }

    pub fn retake_quiz(&self, id: &AcademySessionId) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        record.progression.session_mut()?.retake_quiz()?;
        self.store(record)
    }

    /// Leave a completed level, marking it done and unlocking the next.
    pub fn finish_level(
        &self,
        id: &AcademySessionId,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        record.progression.finish_active_level()?;
        self.store(record)
    }

    pub fn leave_level(&self, id: &AcademySessionId) -> Result<AcademyRecord, AcademyServiceError> {
        let mut record = self.load(id)?;
        let level = record.progression.leave_level()?;
        debug!(session = %id.0, level, "level left without completing");
        self.store(record)
    }

    pub fn certificate(&self, id: &AcademySessionId) -> Result<Certificate, AcademyServiceError> {
        let record = self.load(id)?;
        let certificate = record
            .progression
            .issue_certificate(self.certificates.as_ref(), Utc::now())?;
        Ok(certificate)
    }

    /// Free a ticket whose awaiting request was dropped before the response.
    fn release(&self, id: &AcademySessionId, ticket: RequestTicket) {
        let mut record = match self.repository.fetch(id) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(error) => {
                warn!(session = %id.0, %error, "could not release interrupted request");
                return;
            }
        };
        let released = record
            .progression
            .session_mut()
            .ok()
            .and_then(|session| session.release_request(ticket));
        if let Some(request) = released {
            debug!(session = %id.0, %request, %ticket, "request interrupted, ticket released");
            if let Err(error) = self.repository.update(record) {
                warn!(session = %id.0, %error, "could not release interrupted request");
            }
        }
    }

    fn settle_response(
        &self,
        record: AcademyRecord,
        applied: Result<(), ProgressionError>,
        response: &'static str,
    ) -> Result<AcademyRecord, AcademyServiceError> {
        match applied {
            Ok(()) => self.store(record),
            Err(error) if is_late(&error) => {
                debug!(session = %record.id.0, response, %error, "discarding late response");
                Ok(record)
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Error raised by the academy service.
#[derive(Debug, thiserror::Error)]
pub enum AcademyServiceError {
    #[error("invalid registration: {0}")]
    Registration(String),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SessionError> for AcademyServiceError {
    fn from(error: SessionError) -> Self {
        Self::Progression(ProgressionError::Session(error))
    }
}

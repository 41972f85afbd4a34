use chrono::{DateTime, Utc};
use tracing::info;

use super::certificate::{Certificate, CertificateIdSource};
use super::domain::{LevelData, LevelDefinition, UserProfile};
use super::session::{LevelSession, SessionError};
use crate::workflows::RequestTicket;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressionError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level {0} is locked")]
    LevelLocked(u32),
    #[error("no level is active")]
    NoActiveLevel,
    #[error("level {0} is not finished yet")]
    LevelUnfinished(u32),
    #[error("certificate requires every level, {completed} of {total} completed")]
    CertificateLocked { completed: usize, total: usize },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Ordered curriculum with unlock-on-completion and at most one active level.
///
/// Levels only ever move from locked to unlocked and from incomplete to
/// complete; nothing here can undo either.
#[derive(Debug, Clone)]
pub struct ProgressionController {
    user: UserProfile,
    levels: Vec<LevelData>,
    active: Option<LevelSession>,
}

impl ProgressionController {
    pub fn new(user: UserProfile, curriculum: Vec<LevelDefinition>) -> Self {
        let levels = curriculum
            .into_iter()
            .zip(1u32..)
            .map(|(definition, id)| LevelData {
                id,
                title: definition.title,
                description: definition.description,
                is_completed: false,
                is_locked: id != 1,
            })
            .collect();

        Self {
            user,
            levels,
            active: None,
        }
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn levels(&self) -> &[LevelData] {
        &self.levels
    }

    pub fn active_level_id(&self) -> Option<u32> {
        self.active.as_ref().map(LevelSession::level_id)
    }

    pub fn active_session(&self) -> Option<&LevelSession> {
        self.active.as_ref()
    }

    /// Mutable access to the active session, for driving its steps.
    pub fn session_mut(&mut self) -> Result<&mut LevelSession, ProgressionError> {
        self.active.as_mut().ok_or(ProgressionError::NoActiveLevel)
    }

    fn level(&self, id: u32) -> Result<&LevelData, ProgressionError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or(ProgressionError::UnknownLevel(id))
    }

    /// Open a session for an unlocked level, replacing any active one. Returns
    /// the ticket of the material request.
    pub fn select_level(&mut self, id: u32) -> Result<RequestTicket, ProgressionError> {
        let level = self.level(id)?;
        if level.is_locked {
            return Err(ProgressionError::LevelLocked(id));
        }

        let (session, ticket) = LevelSession::open(id, level.title.clone());
        if let Some(mut previous) = self.active.replace(session) {
            previous.abandon();
        }
        Ok(ticket)
    }

    /// Mark `id` completed, unlock its successor, and return to the dashboard.
    pub fn complete_level(&mut self, id: u32) -> Result<(), ProgressionError> {
        let index = self
            .levels
            .iter()
            .position(|level| level.id == id)
            .ok_or(ProgressionError::UnknownLevel(id))?;
        if self.levels[index].is_locked {
            return Err(ProgressionError::LevelLocked(id));
        }

        self.levels[index].is_completed = true;
        if let Some(next) = self.levels.get_mut(index + 1) {
            next.is_locked = false;
        }
        if self.active_level_id() == Some(id) {
            self.active = None;
        }
        info!(
            level = id,
            completed = self.completed_count(),
            total = self.levels.len(),
            "level completed"
        );
        Ok(())
    }

    /// Complete the active level once its session reached `Completed`.
    pub fn finish_active_level(&mut self) -> Result<u32, ProgressionError> {
        let session = self.active.as_ref().ok_or(ProgressionError::NoActiveLevel)?;
        let id = session.level_id();
        if !session.is_completed() {
            return Err(ProgressionError::LevelUnfinished(id));
        }
        self.complete_level(id)?;
        Ok(id)
    }

    /// Back to the dashboard without completing the active level.
    pub fn leave_level(&mut self) -> Result<u32, ProgressionError> {
        let mut session = self.active.take().ok_or(ProgressionError::NoActiveLevel)?;
        session.abandon();
        Ok(session.level_id())
    }

    pub fn completed_count(&self) -> usize {
        self.levels.iter().filter(|level| level.is_completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.levels.is_empty() && self.levels.iter().all(|level| level.is_completed)
    }

    pub fn progress_percent(&self) -> u8 {
        if self.levels.is_empty() {
            return 0;
        }
        let ratio = self.completed_count() as f64 / self.levels.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn issue_certificate(
        &self,
        ids: &dyn CertificateIdSource,
        issued_at: DateTime<Utc>,
    ) -> Result<Certificate, ProgressionError> {
        if !self.all_completed() {
            return Err(ProgressionError::CertificateLocked {
                completed: self.completed_count(),
                total: self.levels.len(),
            });
        }
        Ok(Certificate::issue(&self.user, self.levels.len(), ids, issued_at))
    }
}

//! Post-qualification academy: curriculum progression, per-level learning
//! sessions, and completion certificates.

pub mod certificate;
pub mod domain;
pub mod progression;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use certificate::{
    Certificate, CertificateIdSource, FixedCertificateIds, RandomCertificateIds,
};
pub use domain::{
    standard_curriculum, LevelData, LevelDefinition, RegistrationForm, UserProfile,
    DEFAULT_INDUSTRY, INDUSTRIES,
};
pub use progression::{ProgressionController, ProgressionError};
pub use repository::{AcademyRecord, AcademyRepository, AcademySessionId, AcademyView};
pub use router::academy_router;
pub use service::{AcademyService, AcademyServiceError};
pub use session::{
    pass_threshold, LevelSession, LevelStep, QuizOutcome, SessionError, SessionRequest,
    CELEBRATION_DELAY_MS,
};

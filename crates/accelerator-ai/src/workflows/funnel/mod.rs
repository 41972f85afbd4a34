//! Applicant filtration funnel: intake, personality and analytical tests,
//! project evaluation, and the scored qualification decision.

pub mod analytical;
pub mod controller;
pub mod domain;
pub mod personality;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytical::{AnalyticalProgress, AnalyticalTest};
pub use controller::{
    FunnelController, FunnelError, FunnelRequest, FunnelStage, IdeaInput, PersonalityAnswer,
    PersonalitySubmission,
};
pub use domain::{ApplicantProfile, ProjectStage, TechLevel, PLACEHOLDER_STARTUP_NAME, SECTORS};
pub use personality::{standard_scenarios, LeadershipStyle, PersonalityScenario, PersonalityTest};
pub use repository::{FunnelRecord, FunnelRepository, FunnelSessionId, FunnelView};
pub use router::funnel_router;
pub use scoring::{
    CoinFlipEthics, EthicsSource, FinalResult, FixedEthics, RadarMetrics, ScoringConfig,
    ScoringEngine, ScoringInputs,
};
pub use service::{FunnelService, FunnelServiceError};

//! Shared fixtures for the workflow integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use accelerator_ai::config::FunnelSettings;
use accelerator_ai::workflows::academy::{
    AcademyRecord, AcademyRepository, AcademyService, AcademySessionId, FixedCertificateIds,
};
use accelerator_ai::workflows::content::{ContentGateway, StaticContentService};
use accelerator_ai::workflows::funnel::{
    FixedEthics, FunnelRecord, FunnelRepository, FunnelService, FunnelSessionId, ScoringConfig,
    ScoringEngine,
};
use accelerator_ai::workflows::RepositoryError;

pub const CERTIFICATE_PREFIX: &str = "K7Q2M9X4A";

#[derive(Default)]
pub struct InMemoryFunnels {
    records: Mutex<HashMap<FunnelSessionId, FunnelRecord>>,
}

impl FunnelRepository for InMemoryFunnels {
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
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &FunnelSessionId) -> Result<Option<FunnelRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAcademy {
    records: Mutex<HashMap<AcademySessionId, AcademyRecord>>,
}

impl AcademyRepository for InMemoryAcademy {
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
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AcademySessionId) -> Result<Option<AcademyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub fn offline_gateway() -> ContentGateway {
    ContentGateway::new(Arc::new(StaticContentService))
}

pub fn academy_service() -> Arc<AcademyService<InMemoryAcademy>> {
    Arc::new(AcademyService::new(
        Arc::new(InMemoryAcademy::default()),
        offline_gateway(),
        Arc::new(FixedCertificateIds(CERTIFICATE_PREFIX.to_string())),
    ))
}

pub fn funnel_service(
    include_project_evaluation: bool,
    ethics: f64,
) -> (
    FunnelService<InMemoryFunnels, InMemoryAcademy>,
    Arc<AcademyService<InMemoryAcademy>>,
) {
    let academy = academy_service();
    let service = FunnelService::new(
        Arc::new(InMemoryFunnels::default()),
        academy.clone(),
        offline_gateway(),
        FunnelSettings {
            include_project_evaluation,
        },
        ScoringEngine::new(ScoringConfig::default(), Arc::new(FixedEthics(ethics))),
    );
    (service, academy)
}

/// Answers that pass every offline level quiz.
pub const STATIC_QUIZ_KEY: [(u32, usize); 3] = [(1, 2), (2, 1), (3, 3)];

pub const PASSING_EXERCISE: &str =
    "Interview ten growers this month, price cold storage per crate, and pilot one market route.";

/// Drive the active level of `id` from selection to a finished level.
pub async fn complete_level(
    academy: &AcademyService<InMemoryAcademy>,
    id: &AcademySessionId,
    level_id: u32,
) -> AcademyRecord {
    academy.select_level(id, level_id).await.expect("level opens");
    academy.record_reading(id, 100).expect("reading recorded");
    academy.begin_exercise(id).expect("exercise opens");
    academy
        .submit_exercise(id, PASSING_EXERCISE)
        .await
        .expect("exercise reviewed");
    academy.begin_quiz(id).await.expect("quiz loads");
    for (question, option) in STATIC_QUIZ_KEY {
        academy
            .answer_quiz(id, question, option)
            .expect("answer recorded");
    }
    let (outcome, _) = academy.submit_quiz(id).expect("quiz graded");
    assert!(outcome.passed, "level {level_id} quiz should pass");
    academy.finish_level(id).expect("level finished")
}

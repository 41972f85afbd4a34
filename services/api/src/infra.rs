use accelerator_ai::config::{ContentConfig, FunnelSettings};
use accelerator_ai::workflows::academy::{
    AcademyRecord, AcademyRepository, AcademyService, AcademySessionId, CertificateIdSource,
};
use accelerator_ai::workflows::content::{
    ContentGateway, ContentService, GeminiContentService, StaticContentService,
};
use accelerator_ai::workflows::funnel::{
    FunnelRecord, FunnelRepository, FunnelService, FunnelSessionId, ScoringEngine,
};
use accelerator_ai::workflows::RepositoryError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFunnelRepository {
    records: Arc<Mutex<HashMap<FunnelSessionId, FunnelRecord>>>,
}

impl FunnelRepository for InMemoryFunnelRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &FunnelSessionId) -> Result<Option<FunnelRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAcademyRepository {
    records: Arc<Mutex<HashMap<AcademySessionId, AcademyRecord>>>,
}

impl AcademyRepository for InMemoryAcademyRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AcademySessionId) -> Result<Option<AcademyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) type SharedFunnel =
    Arc<FunnelService<InMemoryFunnelRepository, InMemoryAcademyRepository>>;
pub(crate) type SharedAcademy = Arc<AcademyService<InMemoryAcademyRepository>>;

/// Gemini when an API key is configured, the built-in content otherwise.
pub(crate) fn content_source(config: &ContentConfig) -> Arc<dyn ContentService> {
    match GeminiContentService::from_config(config) {
        Some(gemini) => {
            info!(endpoint = gemini.endpoint(), "using generative content provider");
            Arc::new(gemini)
        }
        None => {
            info!("no content API key configured, serving built-in content");
            Arc::new(StaticContentService)
        }
    }
}

/// Wire both workflows over in-memory storage and one shared content gateway.
pub(crate) fn build_services(
    content: Arc<dyn ContentService>,
    settings: FunnelSettings,
    engine: ScoringEngine,
    certificates: Arc<dyn CertificateIdSource>,
) -> (SharedFunnel, SharedAcademy) {
    let gateway = ContentGateway::new(content);
    let academy = Arc::new(AcademyService::new(
        Arc::new(InMemoryAcademyRepository::default()),
        gateway.clone(),
        certificates,
    ));
    let funnel = Arc::new(FunnelService::new(
        Arc::new(InMemoryFunnelRepository::default()),
        academy.clone(),
        gateway,
        settings,
        engine,
    ));
    (funnel, academy)
}

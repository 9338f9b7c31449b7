use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::applications::domain::{ApplicationId, ApplicationRecord, NewApplication};
use crate::applications::memory::InMemoryApplicationRepository;
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::{application_router, ApplicationService};

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn submission() -> NewApplication {
    NewApplication {
        date_received: Some("2024-05-01".to_string()),
        company: Some("Acme".to_string()),
        role: Some("Engineer".to_string()),
        job_description: Some("Build things".to_string()),
        ..NewApplication::default()
    }
}

pub(super) fn submission_for(company: &str, date_received: &str) -> NewApplication {
    NewApplication {
        company: Some(company.to_string()),
        date_received: Some(date_received.to_string()),
        ..submission()
    }
}

pub(super) fn record(id: &str, company: &str, date_received: &str) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId::from(id),
        date_received: date(date_received),
        company: company.to_string(),
        role: "Engineer".to_string(),
        job_description: "Build things".to_string(),
        culture: None,
        mission: None,
        values: None,
        interview_process: None,
        current_stage: None,
        status: None,
        metadata: None,
        prep_questions: None,
        interview_questions: None,
        notes: None,
        extra: Default::default(),
    }
}

pub(super) fn build_service() -> (
    ApplicationService<InMemoryApplicationRepository>,
    Arc<InMemoryApplicationRepository>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationService::new(repository.clone());
    (service, repository)
}

pub(super) fn seeded_service(
    records: Vec<ApplicationRecord>,
) -> ApplicationService<InMemoryApplicationRepository> {
    ApplicationService::new(Arc::new(InMemoryApplicationRepository::with_records(
        records,
    )))
}

pub(super) fn router_with_service(
    service: ApplicationService<InMemoryApplicationRepository>,
) -> axum::Router {
    application_router(Arc::new(service))
}

pub(super) struct CorruptRepository;

impl ApplicationRepository for CorruptRepository {
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Corrupt("expected value at line 1 column 1".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Corrupt("expected value at line 1 column 1".to_string()))
    }

    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Corrupt("expected value at line 1 column 1".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Corrupt("expected value at line 1 column 1".to_string()))
    }
}

/// Reads succeed but every write fails, like a read-only volume.
pub(super) struct ReadOnlyRepository(pub(super) InMemoryApplicationRepository);

impl ApplicationRepository for ReadOnlyRepository {
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.0.all()
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.0.fetch(id)
    }

    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read-only file system".to_string()))
    }

    fn update(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read-only file system".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

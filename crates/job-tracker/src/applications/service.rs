use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    ApplicationId, ApplicationPatch, ApplicationRecord, NewApplication, YearMonth,
};
use super::repository::{ApplicationRepository, RepositoryError};
use super::validation::{merge_patch, record_from_submission, ValidationError};

/// Record store contract layered over an injected repository.
pub struct ApplicationService<R> {
    repository: Arc<R>,
}

/// Next identifier after the highest numeric one already stored.
pub(crate) fn next_application_id(records: &[ApplicationRecord]) -> ApplicationId {
    let next = records
        .iter()
        .filter_map(|record| record.id.sequence())
        .max()
        .map_or(1, |max| max.saturating_add(1));
    ApplicationId(next.to_string())
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// All records in insertion order, or only those received in `month`.
    pub fn list(
        &self,
        month: Option<YearMonth>,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        let records = self.repository.all()?;
        let total = records.len();

        let records: Vec<_> = match month {
            Some(month) => records
                .into_iter()
                .filter(|record| record.received_in(month))
                .collect(),
            None => records,
        };

        debug!(
            ?month,
            total,
            matched = records.len(),
            "listed applications"
        );
        Ok(records)
    }

    /// Fetch an application by identifier.
    pub fn get(&self, id: &ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Validate a submission, assign it a fresh identifier, and persist it.
    pub fn create(
        &self,
        submission: NewApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let existing = self.repository.all()?;
        let id = next_application_id(&existing);
        let record = record_from_submission(submission, id)?;

        let stored = self.repository.insert(record)?;
        info!(id = %stored.id, company = %stored.company, "application created");
        Ok(stored)
    }

    /// Shallow-merge `patch` onto the stored record; the identifier never changes.
    pub fn update(
        &self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let current = self.get(id)?;
        let merged = merge_patch(current, patch)?;

        let stored = self.repository.update(merged)?;
        info!(id = %stored.id, "application updated");
        Ok(stored)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApplicationServiceError::Repository(RepositoryError::NotFound)
        )
    }
}

use super::domain::{ApplicationId, ApplicationRecord};

/// Storage port so the service can be exercised without a filesystem.
///
/// Implementations keep records in insertion order. There is no locking
/// across calls: concurrent writers race and the last write wins.
pub trait ApplicationRepository: Send + Sync {
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("application store is corrupt: {0}")]
    Corrupt(String),
    #[error("application store unavailable: {0}")]
    Unavailable(String),
}

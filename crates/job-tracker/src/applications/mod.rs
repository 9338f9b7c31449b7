//! Application record store: domain types, the storage port with its file and
//! in-memory adapters, the service enforcing the store contract, and the HTTP router.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationPatch, ApplicationRecord, ApplicationStatus, ApplicationsDocument,
    InterviewQuestion, NewApplication, YearMonth,
};
pub use memory::InMemoryApplicationRepository;
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use storage::JsonFileRepository;
pub use validation::ValidationError;

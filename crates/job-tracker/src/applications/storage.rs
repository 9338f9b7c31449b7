use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use super::domain::{ApplicationId, ApplicationRecord, ApplicationsDocument};
use super::repository::{ApplicationRepository, RepositoryError};

/// Repository backed by a single JSON document on disk.
///
/// Every call re-reads the file and every mutation rewrites the whole
/// document. A missing file reads as an empty document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ApplicationsDocument, RepositoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "application document missing, starting empty");
                return Ok(ApplicationsDocument::default());
            }
            Err(err) => return Err(self.unavailable("read", err)),
        };

        serde_json::from_str(&contents).map_err(|err| {
            error!(path = %self.path.display(), %err, "application document failed to parse");
            RepositoryError::Corrupt(format!("{}: {err}", self.path.display()))
        })
    }

    /// Writes to a sibling temp file and renames it over the document.
    pub fn save(&self, document: &ApplicationsDocument) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.unavailable("create directory", err))?;
        }

        let mut payload = serde_json::to_string_pretty(document)
            .map_err(|err| RepositoryError::Unavailable(format!("encode document: {err}")))?;
        payload.push('\n');

        let staging = self.staging_path();
        fs::write(&staging, payload).map_err(|err| self.unavailable("write", err))?;
        fs::rename(&staging, &self.path).map_err(|err| {
            let _ = fs::remove_file(&staging);
            self.unavailable("replace", err)
        })?;

        debug!(
            path = %self.path.display(),
            records = document.applications.len(),
            "application document written"
        );
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("applications.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn unavailable(&self, action: &str, err: io::Error) -> RepositoryError {
        error!(path = %self.path.display(), %err, action, "application document io failure");
        RepositoryError::Unavailable(format!("{action} {}: {err}", self.path.display()))
    }
}

impl ApplicationRepository for JsonFileRepository {
    fn all(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self.load()?.applications)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let document = self.load()?;
        Ok(document
            .applications
            .into_iter()
            .find(|record| &record.id == id))
    }

    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut document = self.load()?;
        if document
            .applications
            .iter()
            .any(|existing| existing.id == record.id)
        {
            return Err(RepositoryError::Conflict);
        }

        document.applications.push(record.clone());
        self.save(&document)?;
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut document = self.load()?;
        let slot = document
            .applications
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record.clone();

        self.save(&document)?;
        Ok(record)
    }
}

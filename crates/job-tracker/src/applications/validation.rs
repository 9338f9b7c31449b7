use chrono::NaiveDate;
use tracing::warn;

use super::domain::{ApplicationId, ApplicationPatch, ApplicationRecord, NewApplication};

/// Reasons a payload cannot become (or stay) a valid record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("{field} must be a date formatted as YYYY-MM-DD, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("month filter must be formatted as YYYY-MM, got '{0}'")]
    InvalidMonth(String),
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Only the zero-padded `YYYY-MM-DD` form is accepted, so the stored value
/// always matches what the caller sent.
pub(crate) fn parse_date_received(raw: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field: "dateReceived",
        value: raw.to_string(),
    };

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    if date.format("%Y-%m-%d").to_string() != raw {
        return Err(invalid());
    }
    Ok(date)
}

/// Turn a create payload into a record carrying the freshly assigned identifier.
pub(crate) fn record_from_submission(
    submission: NewApplication,
    id: ApplicationId,
) -> Result<ApplicationRecord, ValidationError> {
    let NewApplication {
        id: supplied_id,
        date_received,
        company,
        role,
        job_description,
        culture,
        mission,
        values,
        interview_process,
        current_stage,
        status,
        metadata,
        prep_questions,
        interview_questions,
        notes,
        extra,
    } = submission;

    let company = required_text("company", company)?;
    let role = required_text("role", role)?;
    let date_received = required_text("dateReceived", date_received)?;
    let job_description = required_text("jobDescription", job_description)?;
    let date_received = parse_date_received(&date_received)?;

    if let Some(supplied) = supplied_id {
        warn!(%id, ?supplied, "ignoring caller-supplied id on create");
    }

    Ok(ApplicationRecord {
        id,
        date_received,
        company,
        role,
        job_description,
        culture,
        mission,
        values,
        interview_process,
        current_stage,
        status,
        metadata,
        prep_questions,
        interview_questions,
        notes,
        extra,
    })
}

/// Shallow merge: every key present in the patch replaces the stored value.
/// The stored identifier is restored whatever the payload carried.
pub(crate) fn merge_patch(
    record: ApplicationRecord,
    patch: ApplicationPatch,
) -> Result<ApplicationRecord, ValidationError> {
    let original_id = record.id.clone();
    let mut merged = record;

    let ApplicationPatch {
        id: supplied_id,
        date_received,
        company,
        role,
        job_description,
        culture,
        mission,
        values,
        interview_process,
        current_stage,
        status,
        metadata,
        prep_questions,
        interview_questions,
        notes,
        extra,
    } = patch;

    if let Some(raw) = date_received {
        let raw = required_text("dateReceived", Some(raw))?;
        merged.date_received = parse_date_received(&raw)?;
    }
    if let Some(company) = company {
        merged.company = required_text("company", Some(company))?;
    }
    if let Some(role) = role {
        merged.role = required_text("role", Some(role))?;
    }
    if let Some(job_description) = job_description {
        merged.job_description = required_text("jobDescription", Some(job_description))?;
    }

    if let Some(value) = culture {
        merged.culture = value;
    }
    if let Some(value) = mission {
        merged.mission = value;
    }
    if let Some(value) = values {
        merged.values = value;
    }
    if let Some(value) = interview_process {
        merged.interview_process = value;
    }
    if let Some(value) = current_stage {
        merged.current_stage = value;
    }
    if let Some(value) = status {
        merged.status = value;
    }
    if let Some(value) = metadata {
        merged.metadata = value;
    }
    if let Some(value) = prep_questions {
        merged.prep_questions = value;
    }
    if let Some(value) = interview_questions {
        merged.interview_questions = value;
    }
    if let Some(value) = notes {
        merged.notes = value;
    }
    merged.extra.extend(extra);

    if let Some(supplied) = supplied_id {
        if supplied.as_str() != Some(original_id.0.as_str()) {
            warn!(id = %original_id, ?supplied, "ignoring caller-supplied id on update");
        }
    }
    merged.id = original_id;

    Ok(merged)
}

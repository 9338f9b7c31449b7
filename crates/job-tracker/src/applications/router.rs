use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationId, ApplicationPatch, ApplicationRecord, NewApplication, YearMonth};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationService, ApplicationServiceError};

/// Router builder exposing the record store over HTTP.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/applications",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/applications/:application_id",
            get(get_handler::<R>).put(update_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) month: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse {
    pub(crate) success: bool,
    pub(crate) month: YearMonth,
    pub(crate) count: usize,
    pub(crate) applications: Vec<ApplicationRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordResponse {
    pub(crate) success: bool,
    pub(crate) application: ApplicationRecord,
}

/// Which operation failed, so storage errors read like the request that caused them.
#[derive(Debug, Clone, Copy)]
enum Operation {
    List,
    Read,
    Create,
    Update,
}

impl Operation {
    fn failure_summary(self) -> &'static str {
        match self {
            Operation::List => "Failed to read applications",
            Operation::Read => "Failed to read application",
            Operation::Create => "Failed to create application",
            Operation::Update => "Failed to update application",
        }
    }
}

pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    message: impl Into<String>,
) -> Response {
    let payload = json!({
        "success": false,
        "error": error,
        "message": message.into(),
    });
    (status, Json(payload)).into_response()
}

fn service_error_response(
    operation: Operation,
    id: Option<&ApplicationId>,
    err: ApplicationServiceError,
) -> Response {
    match err {
        ApplicationServiceError::Repository(RepositoryError::NotFound) => {
            let message = match id {
                Some(id) => format!("No application found with ID: {id}"),
                None => "No matching application found".to_string(),
            };
            error_response(StatusCode::NOT_FOUND, "Application not found", message)
        }
        ApplicationServiceError::Validation(err) => {
            error_response(StatusCode::BAD_REQUEST, "Validation failed", err.to_string())
        }
        ApplicationServiceError::Repository(RepositoryError::Conflict) => error_response(
            StatusCode::CONFLICT,
            operation.failure_summary(),
            "application already exists",
        ),
        ApplicationServiceError::Repository(other) => {
            error!(?operation, error = %other, "application store failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                operation.failure_summary(),
                other.to_string(),
            )
        }
    }
}

fn rejection_response(message: String) -> Response {
    error_response(StatusCode::BAD_REQUEST, "Invalid request body", message)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid query",
                rejection.body_text(),
            )
        }
    };

    let month = match query.month.as_deref().map(str::trim) {
        None | Some("") => YearMonth::current(),
        Some(raw) => match raw.parse::<YearMonth>() {
            Ok(month) => month,
            Err(err) => return service_error_response(Operation::List, None, err.into()),
        },
    };

    match service.list(Some(month)) {
        Ok(applications) => {
            let body = ListResponse {
                success: true,
                month,
                count: applications.len(),
                applications,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => service_error_response(Operation::List, None, err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => record_response(StatusCode::OK, application),
        Err(err) => service_error_response(Operation::Read, Some(&id), err),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    payload: Result<Json<NewApplication>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };

    match service.create(submission) {
        Ok(application) => record_response(StatusCode::CREATED, application),
        Err(err) => service_error_response(Operation::Create, None, err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
    payload: Result<Json<ApplicationPatch>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };

    let id = ApplicationId(application_id);
    match service.update(&id, patch) {
        Ok(application) => record_response(StatusCode::OK, application),
        Err(err) => service_error_response(Operation::Update, Some(&id), err),
    }
}

fn record_response(status: StatusCode, application: ApplicationRecord) -> Response {
    let body = RecordResponse {
        success: true,
        application,
    };
    (status, Json(body)).into_response()
}

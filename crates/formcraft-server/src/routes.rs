//! HTTP routes for `/api/forms`.

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;
use crate::repository::{
    FormRepository, FormStatus, RepositoryError, StoredForm, Submission, SubmissionData, Submitter,
};
use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use formcraft_core::{FormPatch, FormPayload};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

const DEFAULT_PAGE_LIMIT: usize = 50;
const DEFAULT_SUBMISSION_PAGE_LIMIT: usize = 100;

/// Shared application state
pub struct AppState {
    pub repo: FormRepository,
    pub submission_limiter: RateLimiter,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            repo: FormRepository::new(),
            submission_limiter: RateLimiter::per_hour(config.submission_rate_limit),
            config,
        }
    }

    fn respond(&self, form: StoredForm) -> FormResponse {
        FormResponse {
            public_url: self.config.public_form_url(&form.slug),
            form,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Error body: `{"detail": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let status = match err {
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::SlugExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            RepositoryError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    #[serde(flatten)]
    pub form: StoredForm,
    pub public_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    #[serde(flatten)]
    pub payload: FormPayload,
    #[serde(default)]
    pub status: FormStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFormRequest {
    #[serde(flatten)]
    pub patch: FormPatch,
    #[serde(default)]
    pub status: Option<FormStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_submission_limit")]
    pub limit: usize,
}

fn default_submission_limit() -> usize {
    DEFAULT_SUBMISSION_PAGE_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub permanent: bool,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/forms", post(create_form).get(list_forms))
        .route(
            "/api/forms/{id}",
            get(get_form).put(update_form).delete(delete_form),
        )
        .route("/api/forms/{id}/publish", post(publish_form))
        // Shares the `{id}` segment with the other form routes; it carries a slug here.
        .route("/api/forms/{id}/submit", post(submit_form))
        .route("/api/forms/{id}/submissions", get(list_submissions))
        .route("/api/forms/public/{slug}", get(get_public_form))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "FormCraft API - forms at /api/forms"
}

async fn health() -> &'static str {
    "ok"
}

pub async fn create_form(
    State(state): State<SharedState>,
    body: Result<Json<CreateFormRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FormResponse>)> {
    let Json(request) = body?;
    let form = state
        .repo
        .create(request.payload, request.status)
        .inspect_err(|e| warn!("Error creating form: {}", e))?;
    info!("Form created: {} ({})", form.schema.title, form.id);
    Ok((StatusCode::CREATED, Json(state.respond(form))))
}

pub async fn list_forms(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<FormResponse>> {
    let forms = state.repo.list(query.skip, query.limit);
    Json(forms.into_iter().map(|form| state.respond(form)).collect())
}

pub async fn get_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let form = state.repo.get(&id).ok_or(RepositoryError::NotFound)?;
    Ok(Json(state.respond(form)))
}

pub async fn get_public_form(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let form = state
        .repo
        .get_published(&slug)
        .ok_or(RepositoryError::NotFound)?;
    Ok(Json(state.respond(form)))
}

pub async fn update_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateFormRequest>, JsonRejection>,
) -> ApiResult<Json<FormResponse>> {
    let Json(request) = body?;
    let form = state.repo.update(&id, &request.patch, request.status)?;
    info!("Form updated: {} (version {})", id, form.version);
    Ok(Json(state.respond(form)))
}

pub async fn delete_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let message = if query.permanent {
        state.repo.delete(&id)?;
        "Form deleted permanently"
    } else {
        state.repo.archive(&id)?;
        "Form archived successfully"
    };
    info!("Form {}: {}", if query.permanent { "deleted" } else { "archived" }, id);
    Ok(Json(json!({ "message": message })))
}

pub async fn publish_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let form = state.repo.publish(&id)?;
    info!("Form published: {}", id);
    Ok(Json(state.respond(form)))
}

/// Public endpoint. Only published forms accept submissions.
pub async fn submit_form(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<SubmissionData>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let Json(data) = body?;
    let form = state
        .repo
        .get_published(&slug)
        .ok_or(RepositoryError::NotFound)?;

    let ip = addr.ip().to_string();
    if !state.submission_limiter.check(&format!("{}:{}", ip, form.id)) {
        warn!("Submission rate limit hit for {} from {}", slug, ip);
        return Err(ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many submissions. Please try again later.",
        ));
    }

    let submitter = Submitter {
        ip_address: Some(ip),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    let submission = state.repo.submit(&form.id, data, submitter)?;
    info!("Form submitted: {} ({})", slug, submission.id);
    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn list_submissions(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<SubmissionQuery>,
) -> ApiResult<Json<Vec<Submission>>> {
    let submissions = state.repo.list_submissions(&id, query.skip, query.limit)?;
    Ok(Json(submissions))
}

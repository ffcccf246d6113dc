use crate::{
    abstract_trait::DynRegistrationService,
    domain::{
        requests::session::{FormPatchRequest, ShareRequest},
        response::session::{SessionResponse, ShareResponse, SubmitResponse},
    },
    middleware::validate::SimpleValidatedJson,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use shared::{domain::responses::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session started on the welcome step", body = ApiResponse<SessionResponse>)
    ),
    tag = "Session"
)]
pub async fn start_session(
    Extension(service): Extension<DynRegistrationService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.start_session().await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current session snapshot", body = ApiResponse<SessionResponse>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn get_session(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_session(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session discarded", body = ApiResponse<bool>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn end_session(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.end_session(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/advance",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Moved to the next step", body = ApiResponse<SessionResponse>),
        (status = 404, description = "Session not found"),
        (status = 409, description = "The current step cannot advance")
    ),
    tag = "Session"
)]
pub async fn advance_session(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.advance(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/form",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = FormPatchRequest,
    responses(
        (status = 200, description = "Form values updated", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Malformed patch"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "The session is not on the form step")
    ),
    tag = "Session"
)]
pub async fn update_form(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<FormPatchRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_form(id, body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Submission finished; see outcome", body = ApiResponse<SubmitResponse>),
        (status = 404, description = "Session not found"),
        (status = 409, description = "The session is not on the form step")
    ),
    tag = "Session"
)]
pub async fn submit_registration(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.submit(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/share",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "How the client should share the group link", body = ApiResponse<ShareResponse>),
        (status = 404, description = "Session not found")
    ),
    tag = "Session"
)]
pub async fn share_group_link(
    Extension(service): Extension<DynRegistrationService>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<ShareRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.share(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn session_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/{id}", get(get_session).delete(end_session))
        .route("/api/sessions/{id}/advance", post(advance_session))
        .route("/api/sessions/{id}/form", patch(update_form))
        .route("/api/sessions/{id}/submit", post(submit_registration))
        .route("/api/sessions/{id}/share", post(share_group_link))
        .layer(Extension(app_state.di_container.registration_service.clone()))
        .with_state(app_state)
}

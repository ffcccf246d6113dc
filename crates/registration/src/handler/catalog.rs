use crate::{
    abstract_trait::DynRegistrationService, domain::response::catalog::CatalogResponse,
    state::AppState,
};
use axum::{Extension, Json, http::StatusCode, response::IntoResponse, routing::get};
use shared::{domain::responses::ApiResponse, errors::HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Faculties, majors and study times offered by the form", body = ApiResponse<CatalogResponse>)
    ),
    tag = "Catalog"
)]
pub async fn get_catalog(
    Extension(service): Extension<DynRegistrationService>,
) -> Result<impl IntoResponse, HttpError> {
    Ok((StatusCode::OK, Json(service.catalog())))
}

pub fn catalog_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/catalog", get(get_catalog))
        .layer(Extension(app_state.di_container.registration_service.clone()))
        .with_state(app_state)
}

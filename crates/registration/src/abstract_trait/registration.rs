use crate::domain::{
    requests::session::{FormPatchRequest, ShareRequest},
    response::{
        catalog::CatalogResponse,
        session::{SessionResponse, ShareResponse, SubmitResponse},
    },
};
use async_trait::async_trait;
use shared::{domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;
use uuid::Uuid;

pub type DynRegistrationService = Arc<dyn RegistrationServiceTrait + Send + Sync>;

#[async_trait]
pub trait RegistrationServiceTrait {
    fn catalog(&self) -> ApiResponse<CatalogResponse>;
    async fn start_session(&self) -> Result<ApiResponse<SessionResponse>, ServiceError>;
    async fn get_session(&self, id: Uuid) -> Result<ApiResponse<SessionResponse>, ServiceError>;
    async fn end_session(&self, id: Uuid) -> Result<ApiResponse<bool>, ServiceError>;
    async fn advance(&self, id: Uuid) -> Result<ApiResponse<SessionResponse>, ServiceError>;
    async fn update_form(
        &self,
        id: Uuid,
        req: FormPatchRequest,
    ) -> Result<ApiResponse<SessionResponse>, ServiceError>;
    async fn submit(&self, id: Uuid) -> Result<ApiResponse<SubmitResponse>, ServiceError>;
    async fn share(
        &self,
        id: Uuid,
        req: &ShareRequest,
    ) -> Result<ApiResponse<ShareResponse>, ServiceError>;
}

use crate::{domain::requests::member::CreateMemberRequest, model::member::Member};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynMemberCommandRepository = Arc<dyn MemberCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait MemberCommandRepositoryTrait {
    /// Stores one registration. `Ok(None)` means the datastore accepted the
    /// row without echoing it back.
    async fn create_member(
        &self,
        req: &CreateMemberRequest,
    ) -> Result<Option<Member>, RepositoryError>;
}

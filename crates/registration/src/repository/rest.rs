use crate::{
    abstract_trait::MemberCommandRepositoryTrait,
    domain::requests::member::CreateMemberRequest, model::member::Member,
};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap},
};
use serde::Deserialize;
use shared::errors::RepositoryError;
use tracing::{error, info, warn};

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize, Default)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

/// Inserts through a Supabase / PostgREST endpoint with an anonymous key.
pub struct RestMemberRepository {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestMemberRepository {
    pub fn new(client: Client, base_url: &str, table: &str, api_key: impl Into<String>) -> Self {
        let endpoint = format!("{}/rest/v1/{table}", base_url.trim_end_matches('/'));

        Self {
            client,
            endpoint,
            api_key: api_key.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, RepositoryError> {
        let mut headers = HeaderMap::new();
        let invalid = |_| RepositoryError::Unknown(Some("Invalid datastore credentials".into()));

        headers.insert("apikey", self.api_key.parse().map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key).parse().map_err(invalid)?,
        );
        headers.insert(
            "prefer",
            "return=representation"
                .parse()
                .map_err(|_| RepositoryError::Unknown(None))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl MemberCommandRepositoryTrait for RestMemberRepository {
    async fn create_member(
        &self,
        req: &CreateMemberRequest,
    ) -> Result<Option<Member>, RepositoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&[req])
            .send()
            .await
            .map_err(|err| RepositoryError::classify(None, None, &err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RepositoryError::classify(None, Some(status.as_u16()), &err.to_string()))?;

        if !status.is_success() {
            let detail: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
            let message = detail.message.unwrap_or(body);
            let err =
                RepositoryError::classify(detail.code.as_deref(), Some(status.as_u16()), &message);
            error!("❌ Datastore rejected member insert ({status}): {err}");
            return Err(err);
        }

        match serde_json::from_str::<Vec<Member>>(&body) {
            Ok(rows) => {
                info!("✅ Member stored through REST binding");
                Ok(rows.into_iter().next())
            }
            Err(e) => {
                warn!("Insert acknowledged but the returned row could not be read: {e}");
                Ok(None)
            }
        }
    }
}

use crate::{
    abstract_trait::MemberCommandRepositoryTrait,
    domain::requests::member::CreateMemberRequest, model::member::Member,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct PgMemberRepository {
    db: ConnectionPool,
}

impl PgMemberRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberCommandRepositoryTrait for PgMemberRepository {
    async fn create_member(
        &self,
        req: &CreateMemberRequest,
    ) -> Result<Option<Member>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (
                name,
                phone,
                faculty,
                major,
                study_time,
                birth_date,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, CURRENT_TIMESTAMP)
            RETURNING
                member_id,
                name,
                phone,
                faculty,
                major,
                study_time,
                birth_date,
                created_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.phone)
        .bind(req.faculty.label())
        .bind(req.major.label())
        .bind(req.study_time.map(|s| s.label()))
        .bind(req.birth_date)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            let err = RepositoryError::from(err);
            error!("❌ Failed to insert member: {err}");
            err
        })?;

        info!("✅ Member stored with id {}", member.member_id);

        Ok(Some(member))
    }
}

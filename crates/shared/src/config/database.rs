use anyhow::Context;
use sqlx::{Pool, Postgres, migrate::Migrator, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

pub type ConnectionPool = Pool<Postgres>;

pub struct ConnectionManager;

impl ConnectionManager {
    /// Each registration holds a connection for one insert only, so pools stay small.
    pub async fn new_pool(
        connection_string: &str,
        max_connections: u32,
    ) -> anyhow::Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(connection_string)
            .await
            .context("Failed to create database connection pool")?;

        info!("🗄️ Database pool ready (max {max_connections} connections)");
        Ok(pool)
    }

    pub async fn migrate(pool: &ConnectionPool, migrator: &Migrator) -> anyhow::Result<()> {
        migrator
            .run(pool)
            .await
            .context("Failed to apply database migrations")?;

        info!("✅ Applied {} migrations", migrator.iter().count());
        Ok(())
    }
}

use crate::{
    abstract_trait::{DynMemberCommandRepository, DynRegistrationService},
    config::DatastoreConfig,
    domain::{form::FormVariant, share::Community},
    repository::{postgres::PgMemberRepository, rest::RestMemberRepository},
    service::{RegistrationService, RegistrationServiceDeps, SessionStore},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::config::ConnectionManager;
use sqlx::migrate::Migrator;
use std::{fmt, sync::Arc};
use tracing::info;

const DATASTORE_POOL_SIZE: u32 = 5;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repository: DynMemberCommandRepository,
    pub sessions: Arc<SessionStore>,
    pub variant: Arc<FormVariant>,
    pub community: Arc<Community>,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub registration_service: DynRegistrationService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("registration_service", &"DynRegistrationService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            repository,
            sessions,
            variant,
            community,
        } = deps;

        let registration_service = Arc::new(RegistrationService::new(
            RegistrationServiceDeps {
                repository,
                sessions,
                variant,
                community,
            },
            registry,
        )) as DynRegistrationService;

        Self {
            registration_service,
        }
    }
}

/// Builds the member repository for the configured datastore binding.
pub async fn connect_datastore(config: &DatastoreConfig) -> Result<DynMemberCommandRepository> {
    match config {
        DatastoreConfig::Postgres {
            database_url,
            run_migrations,
        } => {
            let pool = ConnectionManager::new_pool(database_url, DATASTORE_POOL_SIZE)
                .await
                .context("Failed to initialize database pool")?;

            if *run_migrations {
                ConnectionManager::migrate(&pool, &MIGRATOR).await?;
            }

            info!("🗄️ Using Postgres datastore");
            Ok(Arc::new(PgMemberRepository::new(pool)) as DynMemberCommandRepository)
        }
        DatastoreConfig::Rest {
            base_url,
            api_key,
            table,
        } => {
            let client = reqwest::Client::builder()
                .build()
                .context("Failed to build datastore HTTP client")?;

            info!("🌐 Using REST datastore at {base_url} (table: {table})");
            Ok(
                Arc::new(RestMemberRepository::new(client, base_url, table, api_key.clone()))
                    as DynMemberCommandRepository,
            )
        }
    }
}

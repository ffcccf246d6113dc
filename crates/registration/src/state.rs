use crate::{
    abstract_trait::DynMemberCommandRepository,
    config::Config,
    di::{DependenciesInject, DependenciesInjectDeps, connect_datastore},
    domain::{form::FormVariant, share::Community},
    service::{SessionStore, run_session_sweeper},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = connect_datastore(&config.datastore)
            .await
            .context("Failed to connect datastore")?;

        let state = Self::with_repository(
            repository,
            config.variant.clone(),
            config.community.clone(),
            config.session_idle,
        );

        let sweep_every = (config.session_idle / 4).max(Duration::from_secs(1));
        tokio::spawn(run_session_sweeper(state.sessions.clone(), sweep_every));

        Ok(state)
    }

    pub fn with_repository(
        repository: DynMemberCommandRepository,
        variant: FormVariant,
        community: Community,
        session_idle: Duration,
    ) -> Self {
        let mut registry = Registry::default();
        let sessions = Arc::new(SessionStore::new(session_idle));

        let di_container = DependenciesInject::new(
            DependenciesInjectDeps {
                repository,
                sessions: sessions.clone(),
                variant: Arc::new(variant),
                community: Arc::new(community),
            },
            &mut registry,
        );

        Self {
            di_container,
            registry: Arc::new(Mutex::new(registry)),
            sessions,
        }
    }
}

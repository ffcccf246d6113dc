#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use registration::{
    abstract_trait::{DynMemberCommandRepository, MemberCommandRepositoryTrait},
    domain::{
        form::FormVariant, requests::member::CreateMemberRequest,
        requests::session::FormPatchRequest, share::Community,
    },
    model::member::Member,
    state::AppState,
};
use shared::errors::RepositoryError;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::Notify;

pub type Scripted = Result<Option<Member>, RepositoryError>;

/// Answers inserts from a queue; an empty queue accepts silently.
pub struct ScriptedRepository {
    responses: Mutex<VecDeque<Scripted>>,
    inserted: Mutex<Vec<CreateMemberRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedRepository {
    pub fn new(responses: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            inserted: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Every insert waits for one `notify_one` on the gate before answering.
    pub fn gated(responses: Vec<Scripted>, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            inserted: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub fn calls(&self) -> usize {
        self.inserted.lock().unwrap().len()
    }

    pub fn inserted(&self) -> Vec<CreateMemberRequest> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemberCommandRepositoryTrait for ScriptedRepository {
    async fn create_member(
        &self,
        req: &CreateMemberRequest,
    ) -> Result<Option<Member>, RepositoryError> {
        self.inserted.lock().unwrap().push(req.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

pub struct PanickingRepository;

#[async_trait]
impl MemberCommandRepositoryTrait for PanickingRepository {
    async fn create_member(
        &self,
        _req: &CreateMemberRequest,
    ) -> Result<Option<Member>, RepositoryError> {
        panic!("datastore driver crashed");
    }
}

pub fn member_named(name: &str) -> Member {
    Member {
        member_id: 1,
        name: name.to_string(),
        phone: "+6281234567890".into(),
        faculty: "Bisnis".into(),
        major: "Akuntansi".into(),
        study_time: None,
        birth_date: None,
        created_at: Some(Utc::now()),
    }
}

pub fn community() -> Community {
    Community {
        org_name: "KMB Jaya Mangala".into(),
        group_link: "https://chat.example.com/invite/abc".into(),
    }
}

pub fn app_state(repository: DynMemberCommandRepository, variant: FormVariant) -> AppState {
    AppState::with_repository(repository, variant, community(), Duration::from_secs(600))
}

pub fn budi() -> FormPatchRequest {
    FormPatchRequest {
        name: Some("Budi Santoso".into()),
        phone: Some("081234567890".into()),
        faculty: Some("Bisnis".into()),
        major: Some("Akuntansi".into()),
        ..Default::default()
    }
}

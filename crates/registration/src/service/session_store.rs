use crate::domain::flow::RegistrationFlow;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::Instant};
use tracing::{debug, info};
use uuid::Uuid;

pub type SharedFlow = Arc<Mutex<RegistrationFlow>>;

struct SessionSlot {
    flow: SharedFlow,
    touched_at: Instant,
}

/// In-memory registry of live registration sessions, one flow per id.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn create(&self, flow: RegistrationFlow) -> (Uuid, SharedFlow) {
        let id = Uuid::new_v4();
        let flow = Arc::new(Mutex::new(flow));

        self.sessions.lock().await.insert(
            id,
            SessionSlot {
                flow: flow.clone(),
                touched_at: Instant::now(),
            },
        );

        debug!("Session {id} created");
        (id, flow)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedFlow> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions.get_mut(&id)?;
        slot.touched_at = Instant::now();
        Some(slot.flow.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drops sessions idle for longer than the timeout. A session with a
    /// submission in flight is kept until the datastore answers.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, slot| {
            if now.duration_since(slot.touched_at) < self.idle_timeout {
                return true;
            }
            match slot.flow.try_lock() {
                Ok(flow) => flow.is_submitting(),
                Err(_) => true,
            }
        });

        before - sessions.len()
    }
}

pub async fn run_session_sweeper(store: Arc<SessionStore>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let evicted = store.evict_idle().await;
        if evicted > 0 {
            info!("🧹 Evicted {evicted} idle registration sessions");
        }
    }
}

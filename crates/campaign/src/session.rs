use std::sync::Arc;
use std::time::Duration;

use campaign_models::config::UiConfig;
use campaign_models::ChatHistory;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub type SharedHistory = Arc<Mutex<ChatHistory>>;

/// Registry of UI sessions, each owning its own chat history.
///
/// Sessions end when deleted or after sitting idle for the configured time.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedHistory>,
    history_cap: usize,
}

impl SessionStore {
    pub fn new(config: &UiConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(Duration::from_secs(config.session_idle_seconds))
            .build();
        Self {
            sessions,
            history_cap: config.history_cap,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let history = Arc::new(Mutex::new(ChatHistory::new(self.history_cap)));
        self.sessions.insert(id, history).await;
        debug!(session = %id, "Session created");
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedHistory> {
        self.sessions.get(id).await
    }

    /// Returns false when the session did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            debug!(session = %id, "Session ended");
        }
        removed
    }
}

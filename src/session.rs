use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One log blob as submitted by a user. Never modified after creation.
#[derive(Debug, Clone)]
pub struct LogSubmission {
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl LogSubmission {
    pub fn new(text: String) -> Self {
        Self {
            text,
            submitted_at: Utc::now(),
        }
    }
}

/// State owned by a single browser session.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<LogSubmission>,
    latest_analysis: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&mut self, text: String) {
        self.history.push(LogSubmission::new(text));
    }

    pub fn submission_count(&self) -> usize {
        self.history.len()
    }

    /// The two most recent submissions, older first.
    pub fn last_two(&self) -> Option<(&LogSubmission, &LogSubmission)> {
        match self.history.as_slice() {
            [.., previous, latest] => Some((previous, latest)),
            _ => None,
        }
    }

    pub fn set_latest_analysis(&mut self, text: String) {
        self.latest_analysis = Some(text);
    }

    pub fn latest_analysis(&self) -> Option<&str> {
        self.latest_analysis.as_deref()
    }
}

/// Sessions untouched for this long are dropped on the next `create`.
const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 60;

struct SessionSlot {
    session: Arc<Mutex<Session>>,
    last_used: DateTime<Utc>,
}

/// All live sessions. Each session has its own lock so one session's
/// in-flight request never blocks another. Idle sessions are evicted when
/// a new one is created, which keeps the map bounded by recent activity.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionSlot>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINUTES))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, slot| now - slot.last_used < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {} idle session(s)", evicted);
        }

        sessions.insert(
            id,
            SessionSlot {
                session: Arc::new(Mutex::new(Session::new())),
                last_used: now,
            },
        );
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(id).map(|slot| {
            slot.last_used = Utc::now();
            Arc::clone(&slot.session)
        })
    }

    pub(crate) async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

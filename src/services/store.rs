use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime, Utc};

use crate::models::CallSession;

/// How long a finished call lingers so a duplicate final webhook replays its
/// farewell instead of opening a new call.
const TERMINAL_GRACE_SECS: i64 = 30;

/// Process-wide table of live calls keyed by call identifier.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, CallSession>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn get(&self, call_sid: &str) -> Option<CallSession> {
        let now = Utc::now().naive_utc();
        self.lock()
            .get(call_sid)
            .filter(|s| s.expires_at > now)
            .cloned()
    }

    pub fn put(&self, call_sid: &str, session: CallSession) {
        self.lock().insert(call_sid.to_string(), session);
    }

    pub fn evict(&self, call_sid: &str) -> Option<CallSession> {
        self.lock().remove(call_sid)
    }

    /// Live sessions only; expired ones awaiting the sweeper are not counted.
    pub fn len(&self) -> usize {
        let now = Utc::now().naive_utc();
        self.lock().values().filter(|s| s.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<CallSession> {
        let now = Utc::now().naive_utc();
        let mut sessions: Vec<_> = self
            .lock()
            .values()
            .filter(|s| s.expires_at > now)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions
    }

    /// Runs `f` on the call's session (a fresh one if absent or expired) and
    /// writes it back with a refreshed expiry. The table stays locked for the
    /// whole call, so two turns of one call never interleave.
    pub fn transact<R>(
        &self,
        call_sid: &str,
        now: NaiveDateTime,
        f: impl FnOnce(&mut CallSession) -> R,
    ) -> R {
        let mut sessions = self.lock();

        let mut session = match sessions.remove(call_sid) {
            Some(existing) if existing.expires_at > now => existing,
            Some(_) => {
                tracing::info!(call_sid, "session expired, starting over");
                CallSession::new(call_sid, now)
            }
            None => {
                tracing::info!(call_sid, "new call session");
                CallSession::new(call_sid, now)
            }
        };

        let result = f(&mut session);

        session.last_activity = now;
        session.expires_at = if session.step.is_terminal() {
            now + Duration::seconds(TERMINAL_GRACE_SECS)
        } else {
            now + self.idle_timeout
        };
        sessions.insert(call_sid.to_string(), session);

        result
    }

    pub fn evict_expired(&self, now: NaiveDateTime) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    // Poisoning only means another turn panicked; the table itself is intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CallSession>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("session table lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

pub fn spawn_sweeper(store: Arc<SessionStore>, period: StdDuration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = store.evict_expired(Utc::now().naive_utc());
            if evicted > 0 {
                tracing::info!(evicted, remaining = store.len(), "swept idle call sessions");
            }
        }
    })
}

//! Per-client sessions, keyed by a random id carried in a cookie.
//!
//! Each session is behind its own mutex. A request holds that lock from
//! extraction to response, so one client never runs two submissions at once,
//! while different clients proceed independently.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use darkmatter_common::{Notice, SessionState};
use darkmatter_fold::{PredictionResult, SequenceForm};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::SharedState;

pub const SESSION_COOKIE: &str = "darkmatter_session";

#[derive(Debug)]
pub struct Session {
    pub auth: SessionState,
    pub form: SequenceForm,
    /// Latest successful prediction; replaced or cleared by every submission.
    pub current: Option<PredictionResult>,
    /// Notices to show on the next rendered page (after a redirect).
    pub flash: Vec<Notice>,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            auth: SessionState::new(),
            form: SequenceForm::new(),
            current: None,
            flash: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

impl Session {
    pub fn take_flash(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.flash)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { sessions: RwLock::new(HashMap::new()), idle_timeout }
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = SessionHandle::default();
        self.sessions.write().await.insert(id, handle.clone());
        debug!(%id, "session created");
        (id, handle)
    }

    /// Returns the session for `id`, or a fresh one when unknown or absent.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SessionHandle) {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                return (id, handle);
            }
        }
        self.create().await
    }

    /// Drops sessions idle for longer than the timeout. Sessions currently
    /// serving a request are never dropped.
    pub async fn evict_idle(&self) -> Vec<Uuid> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, handle)| {
                handle
                    .try_lock()
                    .map(|s| s.last_seen.elapsed() > self.idle_timeout)
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// The calling client's session, locked for the duration of the request.
pub struct ClientSession {
    pub id: Uuid,
    guard: OwnedMutexGuard<Session>,
    jar: CookieJar,
}

impl ClientSession {
    /// Cookie jar carrying the session id; include it in every response.
    pub fn jar(&self) -> CookieJar {
        self.jar.clone()
    }

    /// Key of this client's scratch file.
    pub fn scratch_key(&self) -> String {
        self.id.to_string()
    }
}

impl Deref for ClientSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.guard
    }
}

impl DerefMut for ClientSession {
    fn deref_mut(&mut self) -> &mut Session {
        &mut self.guard
    }
}

impl FromRequestParts<SharedState> for ClientSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let presented = jar
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());

        let (id, handle) = state.sessions.get_or_create(presented).await;
        if presented != Some(id) {
            sweep_idle(state).await;
        }

        let mut guard = handle.lock_owned().await;
        guard.last_seen = Instant::now();

        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        Ok(ClientSession { id, guard, jar: jar.add(cookie) })
    }
}

/// Evicts idle sessions and deletes their scratch files.
async fn sweep_idle(state: &SharedState) {
    let expired = state.sessions.evict_idle().await;
    if expired.is_empty() {
        return;
    }
    info!(count = expired.len(), "evicted idle sessions");
    for id in expired {
        if let Err(e) = state.pipeline.scratch().remove(&id.to_string()).await {
            warn!(%id, error = %e, "failed to remove scratch file");
        }
    }
}

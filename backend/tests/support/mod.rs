#![allow(dead_code)]
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, Response,
    },
    Router,
};
use portal_backend::{
    config::{Config, MEMORY_DATABASE_URL},
    error::StorageError,
    models::user::User,
    repositories::{CredentialRepository, InMemoryCredentialRepository},
    routes,
    services::{AuditLogEntry, AuditLogService, AuditLogServiceTrait, InMemorySessionStore},
    state::AppState,
    utils::cookies::{SameSite, SESSION_COOKIE_NAME},
};
use serde_json::Value;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        database_url: MEMORY_DATABASE_URL.to_string(),
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        session_idle_timeout_minutes: None,
        cookie_secure: false,
        cookie_same_site: SameSite::Lax,
    }
}

pub async fn seeded_repository() -> Arc<InMemoryCredentialRepository> {
    let repo = Arc::new(InMemoryCredentialRepository::new());
    repo.ensure_seeded().await.expect("seed repository");
    repo
}

pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn new(repository: Arc<dyn CredentialRepository>) -> Self {
        Self::with_audit(repository, Arc::new(AuditLogService::new()))
    }

    pub fn with_audit(
        repository: Arc<dyn CredentialRepository>,
        audit: Arc<dyn AuditLogServiceTrait>,
    ) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new(None));
        let state = AppState::new(test_config(), repository, sessions.clone(), audit);
        Self {
            router: routes::app(state),
            sessions,
        }
    }

    pub async fn seeded() -> Self {
        Self::new(seeded_repository().await)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, path, session, None)).await
    }

    pub async fn post_form(&self, path: &str, body: &str, session: Option<&str>) -> Response<Body> {
        self.send(request(Method::POST, path, session, Some(body)))
            .await
    }

    /// Logs in and returns the session cookie value.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form("/login", &login_body(username, password), None)
            .await;
        session_cookie(&response).expect("session cookie after login")
    }
}

pub fn request(
    method: Method,
    path: &str,
    session: Option<&str>,
    form: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(session) = session {
        builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE_NAME, session));
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("build request")
}

pub fn login_body(username: &str, password: &str) -> String {
    format!(
        "username={}&password={}",
        form_encode(username),
        form_encode(password)
    )
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Value of the session cookie set by the response, if any. An empty value
/// (a clearing cookie) is reported as `Some("")`.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| value.strip_prefix(&prefix))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Wraps a repository and counts lookups.
pub struct CountingRepository {
    inner: Arc<dyn CredentialRepository>,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(inner: Arc<dyn CredentialRepository>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialRepository for CountingRepository {
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_credentials(username, password).await
    }

    async fn ensure_seeded(&self) -> Result<(), StorageError> {
        self.inner.ensure_seeded().await
    }
}

/// Repository whose backing store is always unreachable.
pub struct UnavailableRepository;

#[async_trait]
impl CredentialRepository for UnavailableRepository {
    async fn find_by_credentials(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<User>, StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }

    async fn ensure_seeded(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }
}

/// Keeps every audit entry for later inspection.
#[derive(Default)]
pub struct RecordingAudit {
    entries: parking_lot::Mutex<Vec<AuditLogEntry>>,
}

impl RecordingAudit {
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.lock().clone()
    }
}

impl AuditLogServiceTrait for RecordingAudit {
    fn record_event(&self, entry: AuditLogEntry) {
        self.entries.lock().push(entry);
    }
}

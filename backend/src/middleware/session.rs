//! Resolves the session cookie into a [`CurrentSession`] request extension.

use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::{
    models::{session::Session, user::User},
    state::AppState,
    types::SessionId,
    utils::cookies::{build_clear_session_cookie, extract_cookie_values, SESSION_COOKIE_NAME},
};

/// Snapshot of the caller's session taken when the request arrived.
#[derive(Clone, Debug, Default)]
pub struct CurrentSession(pub Option<Session>);

impl CurrentSession {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }

    pub fn id(&self) -> Option<&SessionId> {
        self.0.as_ref().map(|session| &session.id)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().and_then(|session| session.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn login_time(&self) -> Option<DateTime<Utc>> {
        self.0
            .as_ref()
            .filter(|session| session.is_logged_in())
            .map(|session| session.created_at)
    }
}

enum Presented {
    Absent,
    Live(Session),
    Stale,
}

pub async fn load_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    // Browsers may send several values (cookies set at different paths);
    // the first one that resolves wins.
    let presented: Vec<String> = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| extract_cookie_values(raw, SESSION_COOKIE_NAME))
        .collect();

    let resolved = if presented.is_empty() {
        Presented::Absent
    } else {
        presented
            .iter()
            .filter_map(|raw| raw.parse::<SessionId>().ok())
            .find_map(|id| state.sessions.get(&id))
            .map(Presented::Live)
            .unwrap_or(Presented::Stale)
    };

    let (current, stale) = match resolved {
        Presented::Absent => (CurrentSession(None), false),
        Presented::Live(session) => (CurrentSession(Some(session)), false),
        Presented::Stale => {
            tracing::debug!("Ignoring unknown or malformed session cookie");
            (CurrentSession(None), true)
        }
    };
    request.extensions_mut().insert(current);

    let mut response = next.run(request).await;

    if stale && !response.headers().contains_key(SET_COOKIE) {
        let cookie = build_clear_session_cookie(state.config.cookie_options());
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

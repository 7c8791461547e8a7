use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Extension, State},
    http::HeaderMap,
    Form,
};

use crate::{
    error::AppError,
    handlers::{Reply, View, HOME_PATH, LOGIN_PATH, LOGIN_VIEW},
    middleware::session::CurrentSession,
    models::{
        auth::{AuthFailure, AuthenticationResult},
        user::{LoginForm, User},
    },
    services::audit_log::{AuditEventType, AuditLogEntry},
    state::AppState,
    types::SessionId,
    utils::{
        cookies::{build_clear_session_cookie, build_session_cookie},
        net::client_addr,
    },
};

pub async fn login_form(Extension(current): Extension<CurrentSession>) -> Reply {
    if current.is_authenticated() {
        return Reply::redirect(HOME_PATH);
    }
    Reply::render(View::new(LOGIN_VIEW))
}

pub async fn login(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
    peer: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Reply, AppError> {
    let caller = client_addr(&headers, peer.as_ref().map(|Extension(info)| info));
    if let Err(failure) = state
        .auth
        .screen_input(&form.username, &form.password, caller.as_deref())
    {
        tracing::debug!(reason = failure.code(), "Rejected blank login form");
        return Ok(login_failed(failure, &form.username));
    }

    let result = state
        .auth
        .authenticate(&form.username, &form.password, caller.as_deref())
        .await?;

    match result {
        AuthenticationResult::Success(user) => {
            let session_id = start_session(&state, &current, user.clone())?;
            state.audit.record_event(
                AuditLogEntry::success(AuditEventType::SessionCreate)
                    .actor(user.id, &user.username)
                    .session(session_id.fingerprint())
                    .ip(caller.as_deref()),
            );
            tracing::info!(
                user_id = %user.id,
                username = %user.username,
                session = %session_id.fingerprint(),
                "User logged in"
            );
            let cookie = build_session_cookie(session_id.as_str(), state.config.cookie_options());
            Ok(Reply::redirect(HOME_PATH).with_cookie(cookie))
        }
        AuthenticationResult::Failure(failure) => {
            tracing::warn!(
                username = %form.username,
                client_addr = caller.as_deref(),
                reason = failure.code(),
                "Login failed"
            );
            Ok(login_failed(failure, &form.username))
        }
    }
}

/// Always issues a fresh id so a cookie planted before login never becomes
/// an authenticated session.
fn start_session(
    state: &AppState,
    current: &CurrentSession,
    user: User,
) -> Result<SessionId, AppError> {
    if let Some(previous) = current.id() {
        state.sessions.invalidate(previous);
    }
    let session_id = state.sessions.create();
    state
        .sessions
        .attach_user(&session_id, user)
        .map_err(|err| AppError::InternalServerError(err.into()))?;
    Ok(session_id)
}

fn login_failed(failure: AuthFailure, username: &str) -> Reply {
    let mut view = View::new(LOGIN_VIEW).with("error", failure.user_message());
    if !username.trim().is_empty() {
        view = view.with("username", username);
    }
    Reply::render(view)
}

/// HEAD answers with the redirect but leaves the session alone, so link
/// prefetchers cannot end it.
pub async fn logout_head() -> Reply {
    Reply::redirect(LOGIN_PATH)
}

/// Served for both GET and POST.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentSession>,
) -> Reply {
    if let Some(session) = current.session() {
        let fingerprint = session.id.fingerprint();
        match &session.user {
            Some(user) => {
                tracing::info!(
                    user_id = %user.id,
                    username = %user.username,
                    session = %fingerprint,
                    "User logged out"
                );
                state.audit.record_event(
                    AuditLogEntry::success(AuditEventType::Logout)
                        .actor(user.id, &user.username)
                        .session(fingerprint),
                );
            }
            None => {
                tracing::info!(session = %fingerprint, "Anonymous session invalidated");
                state.audit.record_event(
                    AuditLogEntry::success(AuditEventType::SessionInvalidate).session(fingerprint),
                );
            }
        }
        state.sessions.invalidate(&session.id);
    }

    Reply::redirect(LOGIN_PATH).with_cookie(build_clear_session_cookie(state.config.cookie_options()))
}

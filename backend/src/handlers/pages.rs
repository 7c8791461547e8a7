use axum::{
    extract::Extension,
    http::{Method, StatusCode},
};

use crate::{
    handlers::{Reply, View, HOME_VIEW, INDEX_VIEW, LOGIN_PATH},
    middleware::session::CurrentSession,
};

pub async fn index() -> Reply {
    tracing::debug!("Rendering index");
    Reply::render(View::new(INDEX_VIEW))
}

pub async fn home(Extension(current): Extension<CurrentSession>) -> Reply {
    match current.user() {
        Some(user) => Reply::render(
            View::new(HOME_VIEW)
                .with("user", user)
                .with("login_time", current.login_time()),
        ),
        None => Reply::redirect(LOGIN_PATH),
    }
}

/// Unmapped paths: 404 for reads, 405 for anything else.
pub async fn fallback(method: Method) -> Reply {
    if method == Method::GET || method == Method::HEAD {
        Reply::status(StatusCode::NOT_FOUND)
    } else {
        Reply::status(StatusCode::METHOD_NOT_ALLOWED)
    }
}

/// Mapped path, unmapped method.
pub async fn method_not_allowed() -> Reply {
    Reply::status(StatusCode::METHOD_NOT_ALLOWED)
}

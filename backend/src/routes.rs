//! Front controller: the complete (method, path) surface of the service.

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{self, HOME_PATH, INDEX_PATH, LOGIN_PATH, LOGOUT_PATH},
    middleware::{logging::log_error_responses, request_id::request_id, session::load_session},
    state::AppState,
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(INDEX_PATH, get(handlers::pages::index))
        .route(
            LOGIN_PATH,
            get(handlers::auth::login_form).post(handlers::auth::login),
        )
        .route(
            LOGOUT_PATH,
            get(handlers::auth::logout)
                .post(handlers::auth::logout)
                .head(handlers::auth::logout_head),
        )
        .route(HOME_PATH, get(handlers::pages::home))
        .method_not_allowed_fallback(handlers::pages::method_not_allowed)
        .fallback(handlers::pages::fallback)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            load_session,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(log_error_responses)),
        )
        .with_state(state)
}

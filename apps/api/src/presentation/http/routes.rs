use super::{
    errors::panic_response,
    handlers::{health, upload},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.request_body_limit();

    let upload_routes = Router::new()
        .route("/resume", post(upload::upload_resume))
        .route("/profile", post(upload::upload_profile))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(upload_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub mod health;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::middleware::request_id;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body = state.config().upload.max_bytes;

    Router::new()
        .merge(upload::router().layer(DefaultBodyLimit::max(max_body)))
        .nest("/health", health::router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

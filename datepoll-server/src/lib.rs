//! HTTP surface for datepoll.
//!
//! The binary in `main.rs` only wires settings, logging and the listener;
//! everything reachable over HTTP is built by [`app`].

pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The complete application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

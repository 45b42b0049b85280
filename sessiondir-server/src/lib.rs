//! HTTP control server for sessiondir.
//!
//! Exposes the ingest pipeline (`POST /api/update`), the last update summary
//! (`GET /api/status`) and the session table, and serves the `public/`
//! directory to a browser UI.

pub mod routes;
pub mod state;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the full application: API routes, static files and CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let public = ServeDir::new(state.sessiondir().public_path())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(routes::not_found.into_service());

    Router::new()
        .merge(routes::update::router())
        .merge(routes::sessions::router())
        .fallback_service(public)
        .with_state(state)
        .layer(cors)
}

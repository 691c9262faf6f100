//! # ossa-api: HTTP Service for OSSA Validation
//!
//! Exposes the dual-format compliance engine over HTTP. Handlers are thin:
//! they resolve documents, apply configured defaults and return the
//! engine's [`ComplianceReport`](ossa_compliance::ComplianceReport) as JSON.
//!
//! ## API Surface
//!
//! | Route                      | Module                 | Auth |
//! |----------------------------|------------------------|------|
//! | `POST /validate/agent`        | [`routes::validate`] | yes |
//! | `POST /validate/openapi`      | [`routes::validate`] | yes |
//! | `POST /validate/dual-format`  | [`routes::validate`] | yes |
//! | `POST /validate/batch`        | [`routes::validate`] | yes |
//! | `GET /openapi.json`           | [`openapi`]          | no  |
//! | `GET /health/liveness`        | this module          | no  |
//! | `GET /health/readiness`       | this module          | no  |
//! | `GET /metrics`                | [`middleware::metrics`] | no |
//!
//! The counters behind `/metrics` only observe the validation routes.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// [`app`] with caller-owned metrics counters.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated validation routes.
    let api = Router::new()
        .merge(routes::validate::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics.clone()))
        .with_state(state.clone());

    let docs = openapi::router().with_state(state);

    // Unauthenticated health probes and counters.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(middleware::metrics::metrics_handler))
        .layer(axum::Extension(metrics));

    Router::new().merge(health).merge(docs).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The engine is built before the router, so a serving
/// process is ready.
async fn readiness() -> &'static str {
    "ready"
}

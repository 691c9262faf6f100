//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json` outside the auth layer.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OSSA Validation API",
        description = "Structural, cross-format, security and regulatory-framework validation for OSSA agent manifests and their OpenAPI descriptions.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::validate::validate_agent,
        crate::routes::validate::validate_openapi,
        crate::routes::validate::validate_dual_format,
        crate::routes::validate::validate_batch,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::validate::ValidateAgentRequest,
        crate::routes::validate::ValidateOpenApiRequest,
        crate::routes::validate::DualFormatRequest,
        crate::routes::validate::BatchRequest,
    )),
    tags(
        (name = "validation", description = "Agent manifest and OpenAPI validation"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_validation_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for route in [
            "/validate/agent",
            "/validate/openapi",
            "/validate/dual-format",
            "/validate/batch",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == route), "missing {route}");
        }
    }
}

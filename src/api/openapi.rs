//! OpenAPI documentation and schema generation
//!
//! The OpenAPI document is generated at compile time with utoipa and served at
//! `/openapi.json`.

use utoipa::OpenApi;

/// OpenAPI documentation for the docmerge REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "docmerge REST API",
        version = "0.1.0",
        description = "Fetches documents concurrently and merges them into a single PDF",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Merging
        crate::api::routes::merge_documents,
        crate::api::routes::merge_report,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(
        schemas(
            crate::types::MergeRequest,
            crate::types::ReportEnvelope,
            crate::error::ApiError,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "merge", description = "Document merging"),
        (name = "system", description = "Health and API metadata")
    )
)]
pub struct ApiDoc;

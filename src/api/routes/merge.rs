//! Merge handlers.

use super::document_response;
use crate::api::AppState;
use crate::types::MergeRequest;
use crate::utils::Disposition;
use crate::{Error, Result};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};

/// POST /merge - Merge the listed documents into one PDF
#[utoipa::path(
    post,
    path = "/merge",
    tag = "merge",
    request_body = MergeRequest,
    responses(
        (status = 200, description = "Merged document, sent as an attachment", content_type = "application/pdf"),
        (status = 400, description = "Malformed body or no URLs supplied", body = crate::error::ApiError),
        (status = 422, description = "No valid documents, or the merge failed", body = crate::error::ApiError),
        (status = 502, description = "A document could not be fetched", body = crate::error::ApiError)
    )
)]
pub async fn merge_documents(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MergeRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequest(rejection.body_text()))?;

    tracing::debug!(
        name = %request.name,
        urls = request.urls.len(),
        "Merge requested"
    );

    let document = state.service.merge(request).await?;
    document_response(document, Disposition::Attachment)
}

/// GET /report/:id - Merge the documents of a stored report
#[utoipa::path(
    get,
    path = "/report/{id}",
    tag = "merge",
    params(
        ("id" = String, Path, description = "Report identifier")
    ),
    responses(
        (status = 200, description = "Merged document, displayed inline", content_type = "application/pdf"),
        (status = 422, description = "No valid documents, or the merge failed", body = crate::error::ApiError),
        (status = 502, description = "Report metadata or a document could not be fetched", body = crate::error::ApiError),
        (status = 503, description = "No report service configured", body = crate::error::ApiError)
    )
)]
pub async fn merge_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    tracing::debug!(report_id = %id, "Report merge requested");

    let document = state.service.merge_report(&id).await?;
    document_response(document, Disposition::Inline)
}

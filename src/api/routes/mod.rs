//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`merge`] - Direct merges and stored-report merges
//! - [`system`] - Health and OpenAPI

use crate::types::MergedDocument;
use crate::utils::{Disposition, content_disposition};
use crate::{Error, Result};
use axum::{
    http::{
        HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

mod merge;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use merge::*;
pub use system::*;

/// Media type of every merged document
pub const MERGED_CONTENT_TYPE: &str = "application/pdf";

/// Turn a merged document into a binary response with download headers
fn document_response(document: MergedDocument, disposition: Disposition) -> Result<Response> {
    let header = content_disposition(disposition, &document.filename);
    let header = HeaderValue::from_str(&header).map_err(|e| {
        Error::Other(format!(
            "cannot build Content-Disposition for {:?}: {}",
            document.filename, e
        ))
    })?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(MERGED_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, header),
        ],
        document.bytes,
    )
        .into_response())
}

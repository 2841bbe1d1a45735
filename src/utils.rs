//! Filename and header helpers for merge responses

use chrono::NaiveDateTime;
use std::path::Path;

/// Prefix of generated output filenames
const GENERATED_NAME_PREFIX: &str = "merged_";

/// Extension every output filename carries
const PDF_EXTENSION: &str = "pdf";

/// Derive the output filename for a merge
///
/// An empty (or blank) name becomes `merged_<YYYYmmddHHMMSS>` based on `now`.
/// `.pdf` is appended unless the name already ends in a `.pdf` extension.
///
/// # Examples
///
/// ```
/// use docmerge::utils::output_filename;
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_opt(14, 5, 7)
///     .unwrap();
/// assert_eq!(output_filename("", now), "merged_20240309140507.pdf");
/// assert_eq!(output_filename("report", now), "report.pdf");
/// assert_eq!(output_filename("report.pdf", now), "report.pdf");
/// ```
pub fn output_filename(name: &str, now: NaiveDateTime) -> String {
    let name = name.trim();
    let mut filename = if name.is_empty() {
        format!("{}{}", GENERATED_NAME_PREFIX, now.format("%Y%m%d%H%M%S"))
    } else {
        name.to_string()
    };

    let has_pdf_extension = Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION));
    if !has_pdf_extension {
        filename.push('.');
        filename.push_str(PDF_EXTENSION);
    }
    filename
}

/// Prefix `path` with `/` unless it already starts with one
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// How the client should present the merged document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Download as a file
    Attachment,
    /// Display in the browser
    Inline,
}

/// Build a `Content-Disposition` header value
///
/// Inline responses only expose the final path component of `filename`.
/// Characters that cannot appear inside a quoted header parameter are dropped.
pub fn content_disposition(disposition: Disposition, filename: &str) -> String {
    let (kind, filename) = match disposition {
        Disposition::Attachment => ("attachment", filename),
        Disposition::Inline => (
            "inline",
            Path::new(filename)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(filename),
        ),
    };

    let sanitized: String = filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();
    format!("{}; filename=\"{}\"", kind, sanitized)
}

//! URL normalization and manual query re-encoding

use crate::error::FetchError;
use url::Url;

/// Parse a source reference into a normalized URL
///
/// Normalization is whatever the WHATWG parser does: lower-cased scheme and
/// host, percent-encoding of characters not allowed in each component
/// (a space in the query becomes `%20`), default ports removed.
pub fn normalize_url(reference: &str) -> Result<Url, FetchError> {
    Url::parse(reference.trim()).map_err(|e| FetchError::InvalidReference {
        url: reference.to_string(),
        reason: e.to_string(),
    })
}

/// Rebuild the query string from its decoded key/value pairs
///
/// Every pair is decoded and re-serialized with form encoding
/// (`application/x-www-form-urlencoded`: space becomes `+`, reserved
/// characters are percent-encoded). Pairs are ordered by key; pairs sharing
/// a key keep their relative order. A URL without query parameters comes
/// back without a query.
pub fn manual_encode_query_params(url: &Url) -> Url {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut encoded = url.clone();

    if pairs.is_empty() {
        encoded.set_query(None);
        return encoded;
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    encoded.query_pairs_mut().clear().extend_pairs(pairs.iter());
    encoded
}

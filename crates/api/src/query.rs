//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// The optional `?id=` parameter accepted by resource `GET` and `DELETE`.
///
/// Kept as a string so blank and malformed values can be reported with the
/// resource's own messages instead of a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

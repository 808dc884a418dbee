//! Search request validation

use crate::{Result, ShelfError};

/// Maximum accepted query length, in characters, after trimming
pub const MAX_QUERY_LENGTH: usize = 512;

/// Field searched and projected when the caller does not ask for others
pub const DEFAULT_SEARCH_FIELD: &str = "title";

/// Normalize a raw `q` parameter
///
/// Returns `Ok(None)` when the query is absent or blank, meaning the caller
/// should answer with an empty result list without touching any backend.
pub fn normalize_query(raw: Option<&str>) -> Result<Option<String>> {
    let trimmed = match raw.map(str::trim) {
        Some(query) if !query.is_empty() => query,
        _ => return Ok(None),
    };

    let length = trimmed.chars().count();
    if length > MAX_QUERY_LENGTH {
        return Err(ShelfError::bad_request(format!(
            "query is {length} characters long, the maximum is {MAX_QUERY_LENGTH}"
        )));
    }

    Ok(Some(trimmed.to_string()))
}

/// Parse a comma-separated projection list
///
/// Absent means the default `["title"]`. Order is preserved since it is
/// part of the result cache key.
pub fn parse_fields(raw: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(default_fields());
    };

    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();

    if fields.is_empty() {
        return Err(ShelfError::bad_request(
            "fields must name at least one document field",
        ));
    }

    Ok(fields)
}

/// The default projection list
pub fn default_fields() -> Vec<String> {
    vec![DEFAULT_SEARCH_FIELD.to_string()]
}

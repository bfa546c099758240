use axum::body::Bytes;
use serde_json::Value;

use crate::error::ApiError;

/// Row ids are integers; anything else never reaches the store
pub(super) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid technician id '{}'", raw)))
}

/// Body must be well-formed JSON; shape checks happen in database::record
pub(super) fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(format!("Invalid JSON body: {}", e)))
}

use axum::http::{HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::PaginationMetadata;

pub(crate) static X_PAGINATION: HeaderName = HeaderName::from_static("x-pagination");

/// Serialize pagination metadata into the `X-Pagination` response header.
pub(crate) fn pagination_header(metadata: &PaginationMetadata) -> Result<(HeaderName, HeaderValue)> {
    let json = serde_json::to_string(metadata)?;
    let value = HeaderValue::from_str(&json)
        .map_err(|e| AppError::Internal(format!("invalid pagination header: {}", e)))?;
    Ok((X_PAGINATION.clone(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_header_is_json() {
        let (name, value) = pagination_header(&PaginationMetadata::new(3, 10, 1)).unwrap();
        assert_eq!(name.as_str(), "x-pagination");

        let parsed: serde_json::Value = serde_json::from_str(value.to_str().unwrap()).unwrap();
        assert_eq!(parsed["totalCount"], 3);
        assert_eq!(parsed["totalPages"], 1);
    }
}

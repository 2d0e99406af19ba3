use serde::{Deserialize, Serialize};

/// Derived summary of a filtered, paged query result.
///
/// Computed fresh for every list query and sent back to the client in the
/// `X-Pagination` response header; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    /// Number of rows in the filtered set, before paging
    #[serde(rename = "totalCount")]
    pub total_item_count: i64,
    /// Page size actually used for the query (post-clamp)
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    /// 1-based page number of this result
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    /// `ceil(totalCount / pageSize)`
    #[serde(rename = "totalPages")]
    pub total_page_count: u32,
}

impl PaginationMetadata {
    /// Build metadata for a filtered set of `total_item_count` rows.
    pub fn new(total_item_count: i64, page_size: u32, current_page: u32) -> Self {
        let total_page_count = if page_size == 0 {
            0
        } else {
            ((total_item_count as f64) / (page_size as f64)).ceil() as u32
        };

        Self {
            total_item_count,
            page_size,
            current_page,
            total_page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginationMetadata::new(0, 10, 1).total_page_count, 0);
        assert_eq!(PaginationMetadata::new(10, 10, 1).total_page_count, 1);
        assert_eq!(PaginationMetadata::new(11, 10, 1).total_page_count, 2);
        assert_eq!(PaginationMetadata::new(3, 20, 1).total_page_count, 1);
    }

    #[test]
    fn test_header_field_names() {
        let metadata = PaginationMetadata::new(42, 10, 3);
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["totalCount"], 42);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["currentPage"], 3);
        assert_eq!(json["totalPages"], 5);
    }
}

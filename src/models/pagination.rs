use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size", alias = "pageSize")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct PaginationResponse<T> {
    pub total_items: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> PaginationResponse<T> {
    pub fn new(total_items: i64, page_number: i64, page_size: i64, items: Vec<T>) -> Self {
        Self {
            total_items,
            page_number,
            page_size,
            total_pages: total_pages(total_items, page_size),
            items,
        }
    }
}

/// ceil(total_items / page_size) without going through floats.
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_items + page_size - 1) / page_size
}

pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn offset_starts_at_zero_for_first_page() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(3, 25), 50);
    }

    #[test]
    fn params_default_to_first_page_of_ten() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, 10);
    }

    #[test]
    fn envelope_reports_consistent_totals() {
        let response = PaginationResponse::new(21, 2, 10, vec![1, 2, 3]);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.page_number, 2);
        assert_eq!(response.items.len(), 3);
    }
}

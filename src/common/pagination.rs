// Page/limit handling shared by the list endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an i64
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn from_query(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Query string accepted by every paginated endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.page, self.page_size)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + pagination.page_size - 1) / pagination.page_size
        };
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let p = Pagination::from_query(None, None);
        assert_eq!((p.page, p.page_size, p.offset()), (1, 10, 0));

        let p = Pagination::from_query(Some(0), Some(1000));
        assert_eq!((p.page, p.page_size), (1, MAX_PAGE_SIZE));

        let p = Pagination::from_query(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = Pagination::from_query(Some(i64::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(p.page, MAX_PAGE);
        assert!(p.offset() > 0);

        let p = Pagination::from_query(Some(i64::MIN), None);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::from_query(Some(1), Some(10));
        assert_eq!(Page::<i32>::new(vec![], 0, p).total_pages, 0);
        assert_eq!(Page::<i32>::new(vec![], 10, p).total_pages, 1);
        assert_eq!(Page::<i32>::new(vec![], 11, p).total_pages, 2);
    }
}

//! Pagination cho các danh sách (customers, operation history)

use serde::Serialize;

/// Số dòng mặc định mỗi trang
pub const PAGE_SIZE: u32 = 10;

/// Trang cần lấy, đánh số từ 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub per_page: u32,
}

impl Page {
    /// Trang `number` với PAGE_SIZE dòng; trang 0 được coi là trang 1
    pub fn new(number: u32) -> Self {
        Self {
            number: number.max(1),
            per_page: PAGE_SIZE,
        }
    }

    pub fn with_size(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Kết quả một trang kèm tổng số dòng
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        Self {
            items,
            page: page.number,
            per_page: page.per_page,
            total,
        }
    }

    pub fn empty(page: Page) -> Self {
        Self::new(Vec::new(), page, 0)
    }

    /// Tổng số trang (ít nhất 1)
    pub fn total_pages(&self) -> i64 {
        let per_page = i64::from(self.per_page);
        ((self.total + per_page - 1) / per_page).max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

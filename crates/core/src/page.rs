//! Paginated list envelope shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// One page of results: `{content, totalElements, totalPages, size, number}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
}

impl<T> Page<T> {
    /// Wrap an unpaginated list as a single page.
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            total_elements: len as u64,
            total_pages: u32::from(len > 0),
            size: len as u32,
            number: 0,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }
}

/// Pagination parameters (`?page=&size=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size: size.max(1) }
    }

    pub fn query(&self) -> [(&'static str, u32); 2] {
        [("page", self.page), ("size", self.size)]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

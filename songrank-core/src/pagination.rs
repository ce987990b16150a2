//! Fixed-size pages over the filtered list. Pages are 1-based.

use std::ops::Range;

pub const PAGE_SIZE: usize = 5;

/// The number of pages needed for `len` items. Zero items means zero pages.
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// The slice of the filtered list shown on `page`. Empty if the page is out
/// of range.
pub fn page_range(len: usize, page: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    start..end
}

/// What the page controls show. Only exists when there's more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub info: String,
}
impl PaginationView {
    pub fn new(current: usize, len: usize) -> Option<Self> {
        let total = total_pages(len);
        (total > 1).then(|| Self {
            current,
            total,
            has_previous: current > 1,
            has_next: current < total,
            info: format!("Page {current} of {total}"),
        })
    }

    /// Page numbers, for rendering one button each.
    pub fn pages(&self) -> impl Iterator<Item = usize> {
        1..=self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_items() {
        assert_eq!(total_pages(12), 3);
        assert_eq!(page_range(12, 1), 0..5);
        assert_eq!(page_range(12, 2), 5..10);
        assert_eq!(page_range(12, 3), 10..12);
        assert_eq!(page_range(12, 3).len(), 2);
        assert!(page_range(12, 4).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(5), 1);
        assert_eq!(total_pages(6), 2);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        assert_eq!(page_range(12, 0), 0..5);
    }

    #[test]
    fn test_view_only_with_several_pages() {
        assert_eq!(PaginationView::new(1, 0), None);
        assert_eq!(PaginationView::new(1, 5), None);

        let view = PaginationView::new(2, 12).unwrap();
        assert_eq!(view.info, "Page 2 of 3");
        assert!(view.has_previous);
        assert!(view.has_next);
        assert_eq!(view.pages().collect::<Vec<_>>(), [1, 2, 3]);

        let view = PaginationView::new(3, 12).unwrap();
        assert!(!view.has_next);
    }
}

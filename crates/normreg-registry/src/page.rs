//! Pagination of list views

use serde::Serialize;

/// One page of a list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 1-based page number
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
}

impl<T> Page<T> {
    /// Slice page `page` (1-based, 0 treated as 1) out of `items`
    #[must_use]
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total = items.len();
        let last_page = total.div_ceil(per_page).max(1);
        let current_page = page.max(1);
        let data = items
            .into_iter()
            .skip((current_page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
        }
    }

    /// Whether the page holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page() {
        let page = Page::paginate((1..=40).collect::<Vec<_>>(), 2, 15);
        assert_eq!(page.data.first(), Some(&16));
        assert_eq!(page.data.len(), 15);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.total, 40);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::paginate(vec![1, 2, 3], 5, 15);
        assert!(page.is_empty());
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn page_zero_reads_as_first() {
        let page = Page::paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.data, vec![1, 2]);
    }
}

//! Page links for list views.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Pages always linked at each end of the bar.
const EDGE: usize = 2;
/// Pages linked before and after the current one.
const AROUND: usize = 2;

/// Page numbers to link, `None` standing for an ellipsis.
fn page_links(total_pages: usize, current: usize) -> Vec<Option<usize>> {
    let mut links: Vec<Option<usize>> = Vec::new();
    let mut last_shown = 0;

    for page in 1..=total_pages {
        let near_edge = page <= EDGE || page + EDGE > total_pages;
        let near_current = page + AROUND >= current && page <= current + AROUND;
        if !(near_edge || near_current) {
            continue;
        }
        if last_shown != 0 && page > last_shown + 1 {
            links.push(None);
        }
        links.push(Some(page));
        last_shown = page;
    }

    links
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// Wraps one page of `total` matching items.
    pub fn new(items: Vec<T>, current_page: usize, total: usize, per_page: usize) -> Self {
        let page = current_page.max(1);
        let total_pages = total.div_ceil(per_page.max(1));

        Self {
            items,
            pages: page_links(total_pages, page),
            page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_items_means_no_links() {
        let page: Paginated<u8> = Paginated::new(vec![], 1, 0, 20);
        assert!(page.pages.is_empty());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn short_lists_link_every_page() {
        let page: Paginated<u8> = Paginated::new(vec![], 2, 60, 20);
        assert_eq!(page.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn long_lists_collapse_into_ellipses() {
        let page: Paginated<u8> = Paginated::new(vec![], 10, 400, 20);
        assert_eq!(
            page.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let page = Paginated::new(vec![1, 2], 0, 2, 20).map(|n| n * 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![10, 20]);
    }
}

//! Fixed-size page arithmetic for list views.
//!
//! Pages are 1-based. A requested page outside `1..=total_pages` clamps to
//! the nearest valid page, so a stale `?page=` link after deletions still
//! lands on real content.

/// Contact messages shown per dashboard page.
pub const MESSAGES_PER_PAGE: usize = 5;

/// One page of a list of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total: usize,
    per_page: usize,
    current: usize,
}

impl Pagination {
    /// Select `requested` (1-based) out of `total` items split into pages of
    /// `per_page`.
    ///
    /// A `per_page` of zero is treated as one.
    #[must_use]
    pub fn new(total: usize, per_page: usize, requested: usize) -> Self {
        let per_page = per_page.max(1);
        let last = total.div_ceil(per_page).max(1);
        Self {
            total,
            per_page,
            current: requested.clamp(1, last),
        }
    }

    /// Number of pages; zero when there are no items.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    /// The (clamped) current page.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Page controls are only worth rendering with more than one page.
    #[must_use]
    pub const fn has_multiple_pages(&self) -> bool {
        self.total_pages() > 1
    }

    /// 1-based page numbers, for rendering controls.
    #[must_use]
    pub const fn pages(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages()
    }

    /// Previous page, if any.
    #[must_use]
    pub const fn previous(&self) -> Option<usize> {
        if self.current > 1 {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Next page, if any.
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        if self.current < self.total_pages() {
            Some(self.current + 1)
        } else {
            None
        }
    }

    /// The items on the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.current - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

//! Pagination strategy implementations

use super::types::{NextPage, PageCursor, Paginator, TerminationPolicy, PAGE_SIZE};

/// `$skip` / `$top` pagination (OData)
///
/// Common patterns:
/// - `?$top=100` for the first page
/// - `?$skip=100&$top=100` afterwards
#[derive(Debug, Clone)]
pub struct SkipTopPaginator {
    /// Records per page
    pub page_size: u32,
    /// Termination policy
    pub policy: TerminationPolicy,
    /// Final page index computed from the total count
    pub final_page: Option<u64>,
}

impl Default for SkipTopPaginator {
    fn default() -> Self {
        Self::new(TerminationPolicy::default(), None)
    }
}

impl SkipTopPaginator {
    /// Create a paginator for the given policy
    ///
    /// `final_page` is only consulted by `TerminationPolicy::FinalPage`;
    /// without it that policy behaves like `EmptyPage`.
    pub fn new(policy: TerminationPolicy, final_page: Option<u64>) -> Self {
        Self {
            page_size: PAGE_SIZE,
            policy,
            final_page,
        }
    }

    /// Override the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl Paginator for SkipTopPaginator {
    fn first_page(&self) -> PageCursor {
        PageCursor::with_page_size(self.page_size)
    }

    fn next_page(&self, cursor: PageCursor, records_count: usize) -> NextPage {
        if records_count == 0 {
            return NextPage::Done;
        }

        match (self.policy, self.final_page) {
            (TerminationPolicy::FinalPage, Some(final_page)) if cursor.page() >= final_page => {
                NextPage::Done
            }
            _ => NextPage::Continue(cursor.advance()),
        }
    }
}

//! Pagination types and traits

use serde::{Deserialize, Serialize};

/// Records requested per page
pub const PAGE_SIZE: u32 = 100;

/// Query parameter carrying the offset
const SKIP_PARAM: &str = "$skip";

/// Query parameter carrying the page size
const TOP_PARAM: &str = "$top";

/// When the fetch loop stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Stop after the final page computed from `meta.totalNumber`,
    /// or earlier if a page comes back empty
    #[default]
    FinalPage,
    /// Keep fetching until a page returns zero records
    EmptyPage,
}

/// Zero-based index of the last page holding records
///
/// `total` of 0 still maps to page 0 so the first request is always made.
pub fn final_page_index(total: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    if total == 0 {
        0
    } else if total % page_size == 0 {
        total / page_size - 1
    } else {
        total / page_size
    }
}

/// Position in the paginated collection
///
/// Advancing returns a new cursor; a cursor never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: u64,
    page_size: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

impl PageCursor {
    /// Cursor for the first page
    pub fn first() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    /// First-page cursor with a custom page size
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Zero-based page index
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Records per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of records skipped before this page
    pub fn skip(&self) -> u64 {
        self.page * u64::from(self.page_size)
    }

    /// The cursor for the following page
    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Query parameters for this page, `$skip` omitted on the first page
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if self.page > 0 {
            params.push((SKIP_PARAM, self.skip().to_string()));
        }
        params.push((TOP_PARAM, self.page_size.to_string()));
        params
    }

    /// Resource path with the page query, e.g. `workers?$skip=200&$top=100`
    pub fn path(&self, resource: &str) -> String {
        let query = self
            .query_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{resource}?{query}")
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch the page at this cursor
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Cursor for the first request
    fn first_page(&self) -> PageCursor;

    /// Decide what follows the page at `cursor`, which returned `records_count` records
    fn next_page(&self, cursor: PageCursor, records_count: usize) -> NextPage;
}

//! Pagination module
//!
//! OData style `$skip` / `$top` paging over the `workers` resource.
//!
//! # Overview
//!
//! A `PageCursor` is an immutable value describing the next slice to fetch.
//! The paginator inspects each fetched page and either hands back the
//! advanced cursor or signals that the sync is done. Two termination
//! policies exist: stop at the final page computed from the worker count,
//! or keep going until a page comes back empty.

mod strategies;
mod types;

pub use strategies::SkipTopPaginator;
pub use types::{final_page_index, NextPage, PageCursor, Paginator, TerminationPolicy, PAGE_SIZE};

#[cfg(test)]
mod tests;

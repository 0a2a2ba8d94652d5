//! Tests for pagination module

use super::*;
use test_case::test_case;

// ============================================================================
// Final page arithmetic
// ============================================================================

#[test_case(0, 0 ; "empty collection still fetches page zero")]
#[test_case(1, 0 ; "single record")]
#[test_case(99, 0 ; "just under one page")]
#[test_case(100, 0 ; "exactly one page")]
#[test_case(101, 1 ; "one record spills over")]
#[test_case(250, 2 ; "two and a half pages")]
#[test_case(300, 2 ; "exact multiple")]
fn test_final_page_index(total: u64, expected: u64) {
    assert_eq!(final_page_index(total, PAGE_SIZE), expected);
}

#[test]
fn test_final_page_index_zero_page_size() {
    assert_eq!(final_page_index(5, 0), 4);
}

// ============================================================================
// PageCursor
// ============================================================================

#[test]
fn test_first_page_has_no_skip() {
    let cursor = PageCursor::first();
    assert_eq!(cursor.page(), 0);
    assert_eq!(cursor.skip(), 0);
    assert_eq!(cursor.query_params(), vec![("$top", "100".to_string())]);
    assert_eq!(cursor.path("workers"), "workers?$top=100");
}

#[test]
fn test_advance_returns_new_cursor() {
    let first = PageCursor::first();
    let second = first.advance();

    assert_eq!(first.page(), 0);
    assert_eq!(second.page(), 1);
    assert_eq!(second.path("workers"), "workers?$skip=100&$top=100");
    assert_eq!(
        second.advance().path("workers"),
        "workers?$skip=200&$top=100"
    );
}

#[test]
fn test_large_offsets() {
    let mut cursor = PageCursor::first();
    for _ in 0..12 {
        cursor = cursor.advance();
    }
    assert_eq!(cursor.skip(), 1200);
    assert_eq!(cursor.path("workers"), "workers?$skip=1200&$top=100");
}

// ============================================================================
// SkipTopPaginator
// ============================================================================

/// Drive the paginator against a fixed total, returning each page's record count
fn simulate(paginator: &SkipTopPaginator, total: u64) -> Vec<usize> {
    let mut fetched = Vec::new();
    let mut cursor = paginator.first_page();
    loop {
        let remaining = total.saturating_sub(cursor.skip());
        let count = remaining.min(u64::from(cursor.page_size())) as usize;
        fetched.push(count);
        match paginator.next_page(cursor, count) {
            NextPage::Continue(next) => cursor = next,
            NextPage::Done => return fetched,
        }
    }
}

#[test_case(250, vec![100, 100, 50] ; "remainder page")]
#[test_case(100, vec![100] ; "exact single page")]
#[test_case(300, vec![100, 100, 100] ; "exact multiple")]
#[test_case(0, vec![0] ; "empty collection")]
fn test_final_page_policy(total: u64, expected: Vec<usize>) {
    let paginator = SkipTopPaginator::new(
        TerminationPolicy::FinalPage,
        Some(final_page_index(total, PAGE_SIZE)),
    );
    assert_eq!(simulate(&paginator, total), expected);
}

#[test_case(250, vec![100, 100, 50, 0] ; "remainder page")]
#[test_case(100, vec![100, 0] ; "exact single page")]
#[test_case(0, vec![0] ; "empty collection")]
fn test_empty_page_policy(total: u64, expected: Vec<usize>) {
    let paginator = SkipTopPaginator::new(TerminationPolicy::EmptyPage, Some(0));
    assert_eq!(simulate(&paginator, total), expected);
}

#[test]
fn test_final_page_policy_stops_early_when_collection_shrinks() {
    // count said 500 but only 150 remain by the time we page
    let paginator = SkipTopPaginator::new(TerminationPolicy::FinalPage, Some(4));
    assert_eq!(simulate(&paginator, 150), vec![100, 50, 0]);
}

#[test]
fn test_final_page_policy_without_count() {
    let paginator = SkipTopPaginator::new(TerminationPolicy::FinalPage, None);
    assert_eq!(simulate(&paginator, 120), vec![100, 20, 0]);
}

#[test]
fn test_custom_page_size() {
    let paginator = SkipTopPaginator::new(TerminationPolicy::FinalPage, Some(2))
        .with_page_size(10);
    let first = paginator.first_page();
    assert_eq!(first.path("workers"), "workers?$top=10");

    match paginator.next_page(first, 10) {
        NextPage::Continue(next) => assert_eq!(next.path("workers"), "workers?$skip=10&$top=10"),
        NextPage::Done => panic!("Expected Continue"),
    }
}

#[test]
fn test_next_page_helpers() {
    assert!(NextPage::Done.is_done());
    assert!(NextPage::Continue(PageCursor::first()).is_continue());
}

#[test]
fn test_termination_policy_serde() {
    let policy: TerminationPolicy = serde_json::from_str("\"empty_page\"").unwrap();
    assert_eq!(policy, TerminationPolicy::EmptyPage);
    assert_eq!(TerminationPolicy::default(), TerminationPolicy::FinalPage);
}

// crates/service-catalog-core/tests/pagination.rs
// ============================================================================
// Module: Pagination Tests
// Description: Window arithmetic and paging parameter parsing.
// Purpose: Ensure pages partition the ordered sequence without gaps.
// Dependencies: service-catalog-core, proptest
// ============================================================================

//! ## Overview
//! Pages are 1-based, past-the-end pages are empty, and `per_page` is
//! bounded by the configured maximum.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use service_catalog_core::PageRequest;
use service_catalog_core::parse_paging_params;
use service_catalog_core::runtime::PaginationError;

#[test]
fn windows_cover_expected_positions() {
    assert_eq!(PageRequest::new(1, 10).window(25), 0 .. 10);
    assert_eq!(PageRequest::new(3, 10).window(25), 20 .. 25);
    assert_eq!(PageRequest::new(4, 10).window(25), 25 .. 25);
    assert_eq!(PageRequest::new(1, 10).window(0), 0 .. 0);
    assert!(PageRequest::new(usize::MAX, usize::MAX).window(5).is_empty());
}

#[test]
fn validation_bounds_page_and_per_page() {
    assert_eq!(PageRequest::new(0, 10).validate(100), Err(PaginationError::InvalidPage(0)));
    assert_eq!(
        PageRequest::new(1, 0).validate(100),
        Err(PaginationError::InvalidPerPage {
            per_page: 0,
            max_per_page: 100
        })
    );
    assert!(PageRequest::new(1, 101).validate(100).is_err());
    assert!(PageRequest::new(1, 100).validate(100).is_ok());
}

#[test]
fn parse_defaults_and_errors() {
    assert_eq!(parse_paging_params(None, None, 50).unwrap(), PageRequest::new(1, 50));
    assert_eq!(parse_paging_params(Some("2"), Some("5"), 50).unwrap(), PageRequest::new(2, 5));
    assert_eq!(parse_paging_params(Some(""), None, 50).unwrap(), PageRequest::new(1, 50));
    assert!(matches!(
        parse_paging_params(Some("two"), None, 50),
        Err(PaginationError::Parse {
            name: "page",
            ..
        })
    ));
    assert!(matches!(
        parse_paging_params(None, Some("-1"), 50),
        Err(PaginationError::Parse {
            name: "per_page",
            ..
        })
    ));
    assert!(parse_paging_params(Some("0"), None, 50).is_err());
    assert!(parse_paging_params(None, Some("51"), 50).is_err());
}

proptest! {
    #[test]
    fn pages_partition_the_sequence(total in 0usize .. 500, per_page in 1usize .. 50) {
        let mut covered = 0usize;
        let mut page = 1usize;
        loop {
            let window = PageRequest::new(page, per_page).window(total);
            if window.is_empty() {
                break;
            }
            prop_assert_eq!(window.start, covered);
            prop_assert!(window.len() <= per_page);
            covered = window.end;
            page += 1;
        }
        prop_assert_eq!(covered, total);
    }
}

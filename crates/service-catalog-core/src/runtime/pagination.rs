// crates/service-catalog-core/src/runtime/pagination.rs
// ============================================================================
// Module: Service Catalog Pagination
// Description: Page/per-page validation and window arithmetic.
// Purpose: Map 1-based pages onto ordered entry sequences.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Pages are 1-based. Page `p` of size `n` covers ordered positions
//! `(p - 1) * n .. p * n`, clamped to the sequence length; a page past the
//! end is empty, not an error. `per_page` is bounded by the controller's
//! `max_per_page`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::Entry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default upper bound for `per_page`.
pub const DEFAULT_MAX_PER_PAGE: usize = 100;

/// Page used when the caller does not specify one.
pub const DEFAULT_PAGE: usize = 1;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid paging parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Page is below 1.
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(usize),
    /// Page size is outside `1..=max_per_page`.
    #[error("per_page must be between 1 and {max_per_page} (got {per_page})")]
    InvalidPerPage {
        /// Requested page size.
        per_page: usize,
        /// Configured maximum.
        max_per_page: usize,
    },
    /// A paging parameter is not a non-negative integer.
    #[error("invalid paging parameter {name}: {value}")]
    Parse {
        /// Parameter name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// A validated or candidate page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Entries per page.
    pub per_page: usize,
}

impl PageRequest {
    /// Creates a page request without validating it.
    #[must_use]
    pub const fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
        }
    }

    /// Validates the request against `max_per_page`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when either field is out of range.
    pub const fn validate(self, max_per_page: usize) -> Result<Self, PaginationError> {
        if self.page < 1 {
            return Err(PaginationError::InvalidPage(self.page));
        }
        if self.per_page < 1 || self.per_page > max_per_page {
            return Err(PaginationError::InvalidPerPage {
                per_page: self.per_page,
                max_per_page,
            });
        }
        Ok(self)
    }

    /// Returns the positions this page covers in a sequence of `total`.
    ///
    /// Past-the-end pages yield an empty range at `total`.
    #[must_use]
    pub fn window(self, total: usize) -> Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.per_page).min(total);
        let end = start.saturating_add(self.per_page).min(total);
        start .. end
    }
}

/// Parses raw `page`/`per_page` query parameters.
///
/// Missing values default to page 1 and `max_per_page` entries.
///
/// # Errors
///
/// Returns [`PaginationError`] when a value is not an integer or is out of
/// range.
pub fn parse_paging_params(
    page: Option<&str>,
    per_page: Option<&str>,
    max_per_page: usize,
) -> Result<PageRequest, PaginationError> {
    let page = parse_param("page", page, DEFAULT_PAGE)?;
    let per_page = parse_param("per_page", per_page, max_per_page)?;
    PageRequest::new(page, per_page).validate(max_per_page)
}

/// Parses one optional non-negative integer parameter.
fn parse_param(
    name: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, PaginationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| PaginationError::Parse {
            name,
            value: value.to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Pages
// ============================================================================

/// One page of entries plus the size of the full matching sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPage {
    /// Entries on this page, in id order.
    pub entries: Vec<Entry>,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub per_page: usize,
    /// Number of entries across all pages.
    pub total: usize,
}

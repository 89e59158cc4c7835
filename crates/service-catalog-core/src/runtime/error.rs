// crates/service-catalog-core/src/runtime/error.rs
// ============================================================================
// Module: Service Catalog Errors
// Description: Controller-level error taxonomy.
// Purpose: Give transports one small set of kinds to map onto their codes.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every controller operation fails with a [`CatalogError`]. Transports map
//! [`ErrorKind`] onto their own status codes; the message is human-readable
//! detail only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::ValidationError;
use crate::interfaces::StoreError;
use crate::runtime::filter::FilterError;
use crate::runtime::pagination::PaginationError;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Transport-neutral error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The addressed entry does not exist.
    NotFound,
    /// The operation conflicts with existing state.
    Conflict,
    /// The request is malformed or semantically rejected.
    BadRequest,
    /// A query parameter is malformed.
    InvalidArgument,
    /// Storage or other internal failure.
    Internal,
}

impl ErrorKind {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::BadRequest => "bad_request",
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
        }
    }
}

// ============================================================================
// SECTION: Catalog Error
// ============================================================================

/// Controller operation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The addressed entry does not exist.
    #[error("entry not found: {0}")]
    NotFound(String),
    /// The operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request was rejected.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// A query parameter was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Returns the error's classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<FilterError> for CatalogError {
    fn from(err: FilterError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<PaginationError> for CatalogError {
    fn from(err: PaginationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

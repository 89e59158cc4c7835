// crates/service-catalog-core/src/core/validation.rs
// ============================================================================
// Module: Service Catalog Validation
// Description: Structural checks for entry ids and attribute documents.
// Purpose: Reject malformed registrations before any storage mutation.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validation is fail-closed and runs before the controller takes its write
//! lock. The catalog imposes no schema on attribute content beyond:
//! - reserved keys (`id`, `created`, `updated`) are rejected;
//! - nesting depth and canonical encoded size are bounded;
//! - a top-level `type` attribute, when present, is a non-empty string.
//!
//! Id rules: non-empty, bounded length, no leading or trailing `/`, no empty
//! segments, and no whitespace or control characters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::entry::Attributes;
use crate::core::entry::RESERVED_KEYS;
use crate::core::hashing::canonical_json_bytes;
use crate::core::identifiers::ID_SEGMENT_SEPARATOR;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum canonical size of an attribute document (1 MiB).
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 1024 * 1024;
/// Default maximum nesting depth of an attribute document.
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// Default maximum id length in bytes.
pub const DEFAULT_MAX_ID_LENGTH: usize = 256;
/// Attribute key that, when present, must hold a non-empty string.
pub const TYPE_KEY: &str = "type";

/// Bounds applied to incoming registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationLimits {
    /// Maximum canonical JSON size of the attribute document.
    pub max_entry_bytes: usize,
    /// Maximum nesting depth; the attribute document itself is depth 1.
    pub max_depth: usize,
    /// Maximum id length in bytes.
    pub max_id_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
            max_id_length: DEFAULT_MAX_ID_LENGTH,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation failures for registrations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The id is malformed.
    #[error("invalid entry id: {0}")]
    InvalidId(String),
    /// The attributes define a reserved key.
    #[error("attribute key is reserved: {0}")]
    ReservedKey(String),
    /// The attributes nest deeper than allowed.
    #[error("attributes exceed max depth of {max_depth}")]
    TooDeep {
        /// Configured depth limit.
        max_depth: usize,
    },
    /// The attributes are larger than allowed.
    #[error("attributes exceed size limit ({actual_bytes} > {max_bytes} bytes)")]
    TooLarge {
        /// Configured size limit.
        max_bytes: usize,
        /// Canonical size of the rejected document.
        actual_bytes: usize,
    },
    /// The `type` attribute is not a non-empty string.
    #[error("attribute 'type' must be a non-empty string")]
    InvalidType,
    /// The attributes could not be canonicalized.
    #[error("attributes are not serializable: {0}")]
    Serialization(String),
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// Validates an entry id.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] when the id breaks a shape rule.
pub fn validate_entry_id(id: &str, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::InvalidId("id must not be empty".to_string()));
    }
    if id.len() > limits.max_id_length {
        return Err(ValidationError::InvalidId(format!(
            "id exceeds {} bytes",
            limits.max_id_length
        )));
    }
    if id.chars().any(|ch| ch.is_control() || ch.is_whitespace()) {
        return Err(ValidationError::InvalidId(format!(
            "id contains whitespace or control characters: {id:?}"
        )));
    }
    if id.split(ID_SEGMENT_SEPARATOR).any(str::is_empty) {
        return Err(ValidationError::InvalidId(format!("id has an empty segment: {id}")));
    }
    Ok(())
}

/// Validates an attribute document.
///
/// # Errors
///
/// Returns [`ValidationError`] when the document breaks a structural rule.
pub fn validate_attributes(
    attributes: &Attributes,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    if let Some(key) = RESERVED_KEYS.iter().find(|key| attributes.contains_key(**key)) {
        return Err(ValidationError::ReservedKey((*key).to_string()));
    }
    if let Some(value) = attributes.get(TYPE_KEY) {
        match value {
            Value::String(text) if !text.is_empty() => {}
            _ => return Err(ValidationError::InvalidType),
        }
    }
    if limits.max_depth == 0
        || !attributes.values().all(|value| within_depth(value, 2, limits.max_depth))
    {
        return Err(ValidationError::TooDeep {
            max_depth: limits.max_depth,
        });
    }
    let bytes = canonical_json_bytes(attributes)
        .map_err(|err| ValidationError::Serialization(err.to_string()))?;
    if bytes.len() > limits.max_entry_bytes {
        return Err(ValidationError::TooLarge {
            max_bytes: limits.max_entry_bytes,
            actual_bytes: bytes.len(),
        });
    }
    Ok(())
}

/// Returns true when `value`, found at `depth`, stays within `max_depth`.
///
/// Scalars never add depth; only nested containers do.
fn within_depth(value: &Value, depth: usize, max_depth: usize) -> bool {
    match value {
        Value::Array(items) => {
            depth <= max_depth && items.iter().all(|item| within_depth(item, depth + 1, max_depth))
        }
        Value::Object(map) => {
            depth <= max_depth && map.values().all(|item| within_depth(item, depth + 1, max_depth))
        }
        _ => true,
    }
}

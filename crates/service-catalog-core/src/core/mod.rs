// crates/service-catalog-core/src/core/mod.rs
// ============================================================================
// Module: Service Catalog Core Types
// Description: Entry model, identifiers, time, hashing, and validation.
// Purpose: Provide the data vocabulary shared by every catalog component.
// Dependencies: serde, serde_json, time, uuid
// ============================================================================

//! ## Overview
//! Pure data types with no I/O. Storage, controller, and transports all speak
//! in terms of these definitions.

pub mod entry;
pub mod hashing;
pub mod identifiers;
pub mod timestamp;
pub mod validation;

pub use entry::*;
pub use hashing::*;
pub use identifiers::*;
pub use timestamp::*;
pub use validation::*;

//! # Reef Core Types
//!
//! Shared type definitions, constants, and error types for the Reef CLMM
//! client core. Everything here is a pure value type: no identity, no
//! mutation after construction, no I/O.

pub mod apr;
pub mod constants;
pub mod errors;
pub mod position;

// Re-export all public types
pub use apr::*;
pub use constants::*;
pub use errors::*;
pub use position::*;

/// Result type alias using the shared error type
pub type ReefResult<T> = std::result::Result<T, ReefError>;

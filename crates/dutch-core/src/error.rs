//! # Error Types
//!
//! Domain-specific error types for dutch-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dutch-core errors (this file)                                         │
//! │  ├── CoreError        - Engine operations on unknown ids               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  dutch-extract errors (separate crate)                                 │
//! │  └── ExtractError     - Malformed payloads / transport failures        │
//! │                                                                         │
//! │  dutch-session errors (separate crate)                                 │
//! │  └── SessionError     - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → Frontend           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (the offending id)
//! 3. Errors are enum variants, never String
//! 4. A failed operation leaves the engine state untouched

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Engine errors.
///
/// Every variant is a synchronous, local validation failure: the engine is
/// never left partially mutated when one of these is returned.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced line item is not on the current receipt.
    ///
    /// ## When This Occurs
    /// - Assigning against an id that was removed or never existed
    /// - Editing an item the user just deleted on another screen
    #[error("Line item not found: {0}")]
    LineItemNotFound(i64),

    /// The referenced participant is not on the roster.
    ///
    /// Removed participants are NOT queryable: `allocated_share` on a
    /// participant that was deleted returns this rather than a stale zero.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// An index-based operation (reorder) pointed outside the list.
    #[error("Position {index} is out of range (receipt has {len} items)")]
    PositionOutOfRange { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before engine operations run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A collection reached its size cap.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

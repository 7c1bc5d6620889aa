//! # Validation Module
//!
//! Input validation utilities for Dutch.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session commands (dutch-session)                             │
//! │  └── THIS MODULE: business rule validation before engine calls         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine (dutch-core::engine)                                  │
//! │  └── Identity checks (NotFound on unknown ids), atomicity              │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the engine's own operations stay permissive where the product needs it
//! (`add_participant` always succeeds, amounts may be zero or negative); these
//! helpers exist for the command layer to reject obviously bad *input* before
//! it reaches the engine.

use crate::error::ValidationError;
use crate::{MAX_LINE_ITEMS, MAX_PARTICIPANTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a participant name.
///
/// ## Rules
/// - Must not be empty (a nameless row in the share list is unusable)
/// - Must be at most 100 characters
/// - Duplicates are explicitly ALLOWED (identity is the UUID, not the name)
///
/// ## Returns
/// The trimmed name.
pub fn validate_participant_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(name.to_string())
}

/// Validates a line-item description.
///
/// ## Rules
/// - MAY be empty: a freshly appended blank item starts with no text
/// - Must be at most 200 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Absolute cap on a single line-item amount: $100,000.00.
/// Catches OCR garbage like a phone number read as a price.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000;

/// Validates a line-item amount in cents.
///
/// ## Rules
/// - Zero is allowed (blank item being filled in)
/// - Negative is allowed (refund / discount lines)
/// - Magnitude must stay under [`MAX_AMOUNT_CENTS`]
pub fn validate_amount_cents(cents: i64) -> ValidationResult<()> {
    if cents.abs() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: -MAX_AMOUNT_CENTS,
            max: MAX_AMOUNT_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that the receipt can take one more line item.
pub fn validate_line_item_count(current: usize) -> ValidationResult<()> {
    if current >= MAX_LINE_ITEMS {
        return Err(ValidationError::TooMany {
            field: "line items".to_string(),
            max: MAX_LINE_ITEMS,
        });
    }

    Ok(())
}

/// Validates that the roster can take one more participant.
pub fn validate_participant_count(current: usize) -> ValidationResult<()> {
    if current >= MAX_PARTICIPANTS {
        return Err(ValidationError::TooMany {
            field: "participants".to_string(),
            max: MAX_PARTICIPANTS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

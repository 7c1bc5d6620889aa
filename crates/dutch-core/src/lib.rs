//! # dutch-core: Pure Business Logic for Dutch
//!
//! This crate is the **heart** of Dutch, the bill splitter. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Dutch Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Frontend (GUI)                             │   │
//! │  │    Camera ──► Scan Screen ──► Delegate Screen ──► Shares       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              dutch-session (state + projection)                 │   │
//! │  │    one engine per receipt, scan guard, SplitView                │   │
//! │  └───────────┬─────────────────────────────────┬───────────────────┘   │
//! │              │                                 │                        │
//! │  ┌───────────▼───────────────┐   ┌─────────────▼───────────────────┐   │
//! │  │  ★ dutch-core (THIS) ★    │   │  dutch-extract (OCR client)     │   │
//! │  │                           │   │                                 │   │
//! │  │  ┌────────┐ ┌─────────┐  │   │  image bytes ──► HTTP ──►       │   │
//! │  │  │ money  │ │ engine  │  │   │  Receipt | ExtractError         │   │
//! │  │  │ types  │ │validation│  │   └─────────────────────────────────┘   │
//! │  │  └────────┘ └─────────┘  │                                          │
//! │  │                           │                                          │
//! │  │  NO I/O • PURE FUNCTIONS  │                                          │
//! │  └───────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Receipt, LineItem, Participant, Vendor)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`engine`] - The allocation engine: assignments, shares, percent
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for the command layer
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every query is deterministic - same state = same
//!    output, recomputed on demand, no observer machinery
//! 2. **No I/O**: Network, camera and file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64); floats stop
//!    at the extraction wire boundary
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use dutch_core::engine::AllocationEngine;
//! use dutch_core::money::Money;
//! use dutch_core::types::{LineItem, Receipt, Vendor};
//!
//! let mut engine = AllocationEngine::new();
//! engine.load_receipt(Receipt {
//!     vendor: Vendor::new("Thai Palace", "restaurant"),
//!     line_items: vec![
//!         LineItem::new(1, "Pad Thai", Money::from_cents(6_000)),
//!         LineItem::new(2, "Green Curry", Money::from_cents(4_000)),
//!     ],
//!     subtotal_cents: 10_000,
//!     tax_cents: 1_000,
//!     total_cents: 11_000,
//! });
//!
//! let alice = engine.add_participant("Alice");
//! engine.assign(1, Some(&alice.id)).unwrap();
//!
//! // $60 of a $100 subtotal carries 60% of the $110 total
//! assert_eq!(engine.allocated_share(&alice.id).unwrap().cents(), 6_600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dutch_core::Money` instead of
// `use dutch_core::money::Money`

pub use engine::{AllocationEngine, LineItemPatch};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed on a single receipt
///
/// ## Business Reason
/// Real receipts top out far below this; the cap catches OCR responses that
/// exploded into garbage rows before they reach the UI.
pub const MAX_LINE_ITEMS: usize = 200;

/// Maximum participants on a single bill
///
/// ## Business Reason
/// Splitting with more than 50 people is a data-entry mistake, not a dinner.
pub const MAX_PARTICIPANTS: usize = 50;

//! # Domain Types
//!
//! Core domain types used throughout Dutch.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Receipt      │   │    LineItem     │   │  Participant    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  vendor         │   │  id (i64)       │   │  id (UUID)      │       │
//! │  │  line_items     │   │  description    │   │  name           │       │
//! │  │  subtotal_cents │   │  amount_cents   │   │                 │       │
//! │  │  tax_cents      │   │  unit_of_measure│   └─────────────────┘       │
//! │  │  total_cents    │   │  date           │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Rules
//! - `LineItem.id`: i64, unique within a receipt, stable across edits and
//!   reorders. Either carried over from the extraction payload or minted by
//!   the engine's monotonic counter. NEVER a list index - indices shift on
//!   reorder/delete and are an unsafe key.
//! - `Participant.id`: UUID v4 string, generated at creation, never reused.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Vendor
// =============================================================================

/// The merchant a receipt was scanned from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Merchant display name ("Scan from: {name}" in the UI).
    pub name: String,

    /// Merchant category as reported by the OCR service ("restaurant", etc.).
    pub category: String,
}

impl Vendor {
    /// Creates a vendor record.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Vendor {
            name: name.into(),
            category: category.into(),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced entry on a receipt.
///
/// ## Mutability
/// `description` and `amount_cents` are user-editable after the scan (OCR is
/// rarely perfect). `id` is immutable for the lifetime of the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable identifier, unique within the receipt.
    pub id: i64,

    /// Item text as scanned or as corrected by the user.
    pub description: String,

    /// Amount in cents. May be 0 (blank item being filled in) or negative
    /// (refund / discount lines).
    pub amount_cents: i64,

    /// Unit of measure when the OCR service reports one ("lb", "each", ...).
    pub unit_of_measure: Option<String>,

    /// Item-level date string when the OCR service reports one. Kept as raw
    /// text: scanned dates are too noisy to parse strictly.
    pub date: Option<String>,
}

impl LineItem {
    /// Creates a line item with the given id.
    pub fn new(id: i64, description: impl Into<String>, amount: Money) -> Self {
        LineItem {
            id,
            description: description.into(),
            amount_cents: amount.cents(),
            unit_of_measure: None,
            date: None,
        }
    }

    /// Returns the amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A scanned (or manually corrected) receipt.
///
/// ## Soft Invariant
/// `total ≈ subtotal + tax` on a clean scan, but OCR noise breaks it often
/// enough that the engine must tolerate any combination. The engine always
/// uses `subtotal_cents` and `total_cents` exactly as given and NEVER
/// recomputes them from the line items. `is_balanced()` exists so the UI can
/// warn, nothing more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Merchant the receipt came from.
    pub vendor: Vendor,

    /// Ordered line items. The order is user-visible and reorderable.
    pub line_items: Vec<LineItem>,

    /// Printed subtotal (pre-tax) in cents.
    pub subtotal_cents: i64,

    /// Printed tax in cents.
    pub tax_cents: i64,

    /// Printed grand total (tax-inclusive) in cents.
    pub total_cents: i64,
}

impl Receipt {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the tax as Money.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Reports whether the printed figures agree (`subtotal + tax == total`).
    ///
    /// Informational only; an unbalanced receipt is still fully usable.
    pub fn is_balanced(&self) -> bool {
        self.subtotal_cents + self.tax_cents == self.total_cents
    }

    /// Looks up a line item by its stable id.
    pub fn line_item(&self, id: i64) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    /// Largest line-item id currently on the receipt, 0 when empty.
    /// Used to seed the engine's monotonic id counter past wire-provided ids.
    pub fn max_line_item_id(&self) -> i64 {
        self.line_items.iter().map(|item| item.id).max().unwrap_or(0)
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A person splitting the bill.
///
/// Names are display text and MAY be duplicated across participants
/// (two friends named Sam); the UUID is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Opaque unique identifier (UUID v4). Never reused.
    pub id: String,

    /// Display name, mutable.
    pub name: String,
}

impl Participant {
    /// Creates a participant with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Participant {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Presentation Projection
//!
//! The read-only view the frontend renders after every mutation.
//!
//! ## Re-query, Don't Observe
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  user intent ──► session command ──► engine mutation                    │
//! │                                            │                            │
//! │                       SplitView::from_engine(&engine)  ◄── every time   │
//! │                                            │                            │
//! │                                            ▼                            │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  Scan from: Thai Palace                                        │    │
//! │  ├────────────────────────────────────────────────────────────────┤    │
//! │  │  Pad Thai          $60.00    → Alice                           │    │
//! │  │  Green Curry       $40.00    → (unassigned)                    │    │
//! │  ├────────────────────────────────────────────────────────────────┤    │
//! │  │  Alice                                   $66.00                │    │
//! │  │  Percent Paid                            60.0%                 │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The projection is rebuilt from engine state on demand - pure queries, no
//! observable-property plumbing to keep in sync.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use dutch_core::engine::AllocationEngine;

/// One line item as the frontend shows it, with its assignment label.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub id: i64,
    pub description: String,
    pub amount_cents: i64,

    /// Assigned participant id, if any.
    pub assigned_to: Option<String>,

    /// Assigned participant's display name, denormalized so the list row
    /// renders without a second lookup.
    pub assigned_name: Option<String>,
}

/// One participant row with their live share.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantShare {
    pub id: String,
    pub name: String,

    /// Allocated share of the tax-inclusive total, in cents. May be negative
    /// when the participant holds refund lines.
    pub share_cents: i64,
}

/// Everything the split screens need, in one read-only snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SplitView {
    pub vendor_name: String,
    pub line_items: Vec<LineItemView>,
    pub participants: Vec<ParticipantShare>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,

    /// Whether `subtotal + tax == total` on the current figures. Display a
    /// warning badge when false; everything still works.
    pub balanced: bool,

    /// Aggregate shares as a percent of the total, raw (may exceed 100).
    pub percent_allocated: f64,
}

impl SplitView {
    /// Builds the projection from current engine state.
    pub fn from_engine(engine: &AllocationEngine) -> Self {
        let receipt = engine.receipt();

        let line_items = receipt
            .line_items
            .iter()
            .map(|item| {
                let assigned_to = engine.assignment_of(item.id).map(str::to_string);
                let assigned_name = assigned_to
                    .as_deref()
                    .and_then(|pid| engine.participant(pid))
                    .map(|p| p.name.clone());
                LineItemView {
                    id: item.id,
                    description: item.description.clone(),
                    amount_cents: item.amount_cents,
                    assigned_to,
                    assigned_name,
                }
            })
            .collect();

        let participants = engine
            .participants()
            .iter()
            .map(|p| ParticipantShare {
                id: p.id.clone(),
                name: p.name.clone(),
                // The roster is the source of the ids, so the lookup cannot
                // miss; default keeps the projection total anyway.
                share_cents: engine.allocated_share(&p.id).unwrap_or_default().cents(),
            })
            .collect();

        SplitView {
            vendor_name: receipt.vendor.name.clone(),
            line_items,
            participants,
            subtotal_cents: receipt.subtotal_cents,
            tax_cents: receipt.tax_cents,
            total_cents: receipt.total_cents,
            balanced: receipt.is_balanced(),
            percent_allocated: engine.percent_allocated(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dutch_core::money::Money;
    use dutch_core::types::{LineItem, Receipt, Vendor};

    fn engine_with_split() -> AllocationEngine {
        let mut engine = AllocationEngine::new();
        engine.load_receipt(Receipt {
            vendor: Vendor::new("Thai Palace", "restaurant"),
            line_items: vec![
                LineItem::new(1, "Pad Thai", Money::from_cents(6_000)),
                LineItem::new(2, "Green Curry", Money::from_cents(4_000)),
            ],
            subtotal_cents: 10_000,
            tax_cents: 1_000,
            total_cents: 11_000,
        });
        let alice = engine.add_participant("Alice");
        engine.assign(1, Some(&alice.id)).unwrap();
        engine
    }

    #[test]
    fn test_projection_mirrors_engine_state() {
        let engine = engine_with_split();
        let view = SplitView::from_engine(&engine);

        assert_eq!(view.vendor_name, "Thai Palace");
        assert_eq!(view.total_cents, 11_000);
        assert!(view.balanced);

        assert_eq!(view.line_items.len(), 2);
        assert_eq!(view.line_items[0].assigned_name.as_deref(), Some("Alice"));
        assert!(view.line_items[1].assigned_to.is_none());

        assert_eq!(view.participants.len(), 1);
        assert_eq!(view.participants[0].share_cents, 6_600);
        assert!((view.percent_allocated - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_projection_serializes_camel_case() {
        let view = SplitView::from_engine(&engine_with_split());
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("vendorName").is_some());
        assert!(json.get("percentAllocated").is_some());
        assert!(json["lineItems"][0].get("amountCents").is_some());
        assert!(json["participants"][0].get("shareCents").is_some());
    }

    #[test]
    fn test_projection_of_empty_engine() {
        let view = SplitView::from_engine(&AllocationEngine::new());
        assert!(view.line_items.is_empty());
        assert!(view.participants.is_empty());
        assert_eq!(view.percent_allocated, 0.0);
    }
}

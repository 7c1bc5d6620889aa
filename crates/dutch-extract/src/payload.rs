//! # Wire Payload
//!
//! The document-processing API's JSON response shape, and its conversion into
//! a [`dutch_core::Receipt`].
//!
//! ## Wire Shape
//! ```text
//! {
//!   "line_items": [
//!     { "id": 101, "description": "Pad Thai", "total": 12.50,
//!       "type": "food", "date": null, "unit_of_measure": null }
//!   ],
//!   "subtotal": 100.00,
//!   "tax": 10.00,
//!   "total": 110.00,
//!   "vendor": { "name": "Thai Palace", "type": "restaurant" }
//! }
//! ```
//!
//! ## Validation Rules
//! - Optional fields (`date`, `unit_of_measure`) may be absent or null
//! - Missing `subtotal`, `tax`, `total`, `vendor.name`, or any line item's
//!   `id`/`total` ⇒ [`ExtractError::MalformedReceipt`] naming the field
//! - Duplicate line-item ids ⇒ [`ExtractError::DuplicateLineItem`] (ids key
//!   the assignment map downstream)
//! - Dollars→cents happens here and ONLY here; `dutch_core::Money` has no
//!   float constructor on purpose

use std::collections::HashSet;

use serde::Deserialize;

use dutch_core::types::{LineItem, Receipt, Vendor};

use crate::error::{ExtractError, ExtractResult};

// =============================================================================
// Wire Structs
// =============================================================================

/// Top-level extraction response. Every field is optional at the wire level
/// so that required-field failures come back as typed `MalformedReceipt`
/// errors instead of opaque deserialization noise.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptPayload {
    #[serde(default)]
    pub line_items: Vec<LineItemPayload>,
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    pub total: Option<f64>,
    pub vendor: Option<VendorPayload>,
}

/// One scanned line item as the service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemPayload {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub total: Option<f64>,
    /// Item category ("food", "discount", ...). Informational.
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub date: Option<String>,
    pub unit_of_measure: Option<String>,
}

/// The vendor block of the response.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts a wire dollar amount to integer cents.
///
/// The only float→Money crossing in the workspace. `round()` here absorbs
/// the representation error JSON floats carry ("12.50" arriving as
/// 12.499999...), after which everything is exact integer math.
fn to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

impl ReceiptPayload {
    /// Validates required fields and produces a domain [`Receipt`].
    pub fn into_receipt(self) -> ExtractResult<Receipt> {
        let subtotal = self.subtotal.ok_or_else(|| missing("subtotal"))?;
        let tax = self.tax.ok_or_else(|| missing("tax"))?;
        let total = self.total.ok_or_else(|| missing("total"))?;

        let vendor = self.vendor.ok_or_else(|| missing("vendor"))?;
        let vendor_name = vendor.name.ok_or_else(|| missing("vendor.name"))?;
        // Category is display-only; tolerate its absence
        let vendor = Vendor::new(vendor_name, vendor.category.unwrap_or_default());

        let mut seen = HashSet::new();
        let mut line_items = Vec::with_capacity(self.line_items.len());
        for (index, item) in self.line_items.into_iter().enumerate() {
            let id = item
                .id
                .ok_or_else(|| missing(&format!("line_items[{index}].id")))?;
            let amount = item
                .total
                .ok_or_else(|| missing(&format!("line_items[{index}].total")))?;

            if !seen.insert(id) {
                return Err(ExtractError::DuplicateLineItem(id));
            }

            line_items.push(LineItem {
                id,
                description: item.description.unwrap_or_default(),
                amount_cents: to_cents(amount),
                unit_of_measure: item.unit_of_measure,
                date: item.date,
            });
        }

        Ok(Receipt {
            vendor,
            line_items,
            subtotal_cents: to_cents(subtotal),
            tax_cents: to_cents(tax),
            total_cents: to_cents(total),
        })
    }
}

fn missing(field: &str) -> ExtractError {
    ExtractError::MalformedReceipt {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ReceiptPayload {
        serde_json::from_str(json).expect("test payload should deserialize")
    }

    const FULL_PAYLOAD: &str = r#"{
        "line_items": [
            { "id": 101, "description": "Pad Thai", "total": 12.50,
              "type": "food", "date": null, "unit_of_measure": null },
            { "id": 102, "description": "Green Curry", "total": 11.25,
              "type": "food", "date": "2023-07-31", "unit_of_measure": "each" }
        ],
        "subtotal": 23.75,
        "tax": 2.11,
        "total": 25.86,
        "vendor": { "name": "Thai Palace", "type": "restaurant" }
    }"#;

    #[test]
    fn test_full_payload_converts() {
        let receipt = parse(FULL_PAYLOAD).into_receipt().unwrap();

        assert_eq!(receipt.vendor.name, "Thai Palace");
        assert_eq!(receipt.vendor.category, "restaurant");
        assert_eq!(receipt.subtotal_cents, 2_375);
        assert_eq!(receipt.tax_cents, 211);
        assert_eq!(receipt.total_cents, 2_586);

        assert_eq!(receipt.line_items.len(), 2);
        let first = &receipt.line_items[0];
        assert_eq!(first.id, 101);
        assert_eq!(first.amount_cents, 1_250);
        assert!(first.date.is_none()); // null tolerated
        assert_eq!(receipt.line_items[1].date.as_deref(), Some("2023-07-31"));

        assert!(receipt.is_balanced());
    }

    #[test]
    fn test_optional_fields_may_be_absent_entirely() {
        let receipt = parse(
            r#"{
                "line_items": [ { "id": 1, "total": 5.00 } ],
                "subtotal": 5.00, "tax": 0.0, "total": 5.00,
                "vendor": { "name": "Corner Deli" }
            }"#,
        )
        .into_receipt()
        .unwrap();

        assert_eq!(receipt.line_items[0].description, "");
        assert!(receipt.line_items[0].unit_of_measure.is_none());
        assert_eq!(receipt.vendor.category, "");
    }

    #[test]
    fn test_missing_subtotal_is_malformed() {
        let err = parse(
            r#"{
                "line_items": [], "tax": 1.0, "total": 11.0,
                "vendor": { "name": "X" }
            }"#,
        )
        .into_receipt()
        .unwrap_err();

        match err {
            ExtractError::MalformedReceipt { field } => assert_eq!(field, "subtotal"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_vendor_name_is_malformed() {
        let err = parse(
            r#"{
                "line_items": [], "subtotal": 1.0, "tax": 0.0, "total": 1.0,
                "vendor": { "type": "restaurant" }
            }"#,
        )
        .into_receipt()
        .unwrap_err();

        match err {
            ExtractError::MalformedReceipt { field } => assert_eq!(field, "vendor.name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_line_item_total_names_the_index() {
        let err = parse(
            r#"{
                "line_items": [
                    { "id": 1, "total": 5.0 },
                    { "id": 2, "description": "???" }
                ],
                "subtotal": 5.0, "tax": 0.0, "total": 5.0,
                "vendor": { "name": "X" }
            }"#,
        )
        .into_receipt()
        .unwrap_err();

        match err {
            ExtractError::MalformedReceipt { field } => {
                assert_eq!(field, "line_items[1].total")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_line_item_ids_rejected() {
        let err = parse(
            r#"{
                "line_items": [
                    { "id": 7, "total": 5.0 },
                    { "id": 7, "total": 3.0 }
                ],
                "subtotal": 8.0, "tax": 0.0, "total": 8.0,
                "vendor": { "name": "X" }
            }"#,
        )
        .into_receipt()
        .unwrap_err();

        assert!(matches!(err, ExtractError::DuplicateLineItem(7)));
    }

    #[test]
    fn test_to_cents_absorbs_float_noise() {
        assert_eq!(to_cents(12.50), 1_250);
        assert_eq!(to_cents(0.1 + 0.2), 30); // 0.30000000000000004
        assert_eq!(to_cents(-5.50), -550); // refund line
        assert_eq!(to_cents(0.0), 0);
    }
}

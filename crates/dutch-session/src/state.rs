//! # Session State
//!
//! Manages the active receipt session: one allocation engine per receipt,
//! guarded by a single mutex, plus the single-in-flight scan rule.
//!
//! ## Thread Safety
//! The engine is wrapped in `Arc<Mutex<T>>` because:
//! 1. Commands may be invoked from concurrent frontend tasks
//! 2. Only one command may mutate the engine at a time - `assign`,
//!    `remove_participant` and `remove_line_item` are not safe to interleave
//!    (assign-after-concurrent-delete would create a dangling reference)
//! 3. All mutations therefore run under one mutual-exclusion domain
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Frontend Action         Session Command        Engine State Change     │
//! │  ───────────────         ───────────────        ───────────────────     │
//! │                                                                         │
//! │  Add Friend ────────────► add_participant() ──► roster.push            │
//! │  Pick in item row ──────► assign() ───────────► map[item] = who        │
//! │  Edit amount ───────────► update_line_item() ─► item.amount = n        │
//! │  Swipe to delete ───────► remove_line_item() ─► items.remove + unmap   │
//! │  Use this Image? ───────► scan_receipt() ─────► load_receipt (atomic)  │
//! │                                                                         │
//! │  Every command returns a fresh SplitView for the frontend to render.   │
//! │                                                                         │
//! │  NOTE: the scan guard lives OUTSIDE the engine: while a scan is in     │
//! │        flight the engine stays usable, but a second scan is refused.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use dutch_core::engine::{AllocationEngine, LineItemPatch};
use dutch_core::money::Money;
use dutch_core::types::Receipt;
use dutch_core::validation;
use dutch_extract::ExtractResult;

use crate::error::{SessionError, SessionResult};
use crate::projection::SplitView;

/// Whether an extraction request is currently pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanStatus {
    Idle,
    InFlight,
}

/// Everything the session owns, behind one lock.
#[derive(Debug)]
struct Session {
    engine: AllocationEngine,
    scan: ScanStatus,
    /// When the current receipt was ingested, for "scanned 2 min ago" UI.
    loaded_at: Option<DateTime<Utc>>,
}

/// Shared handle to the active receipt session.
///
/// ## Why Not RwLock?
/// Session operations are quick, and most of them mutate. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct SessionState {
    inner: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a session with an empty receipt and an empty roster.
    pub fn new() -> Self {
        SessionState {
            inner: Arc::new(Mutex::new(Session {
                engine: AllocationEngine::new(),
                scan: ScanStatus::Idle,
                loaded_at: None,
            })),
        }
    }

    /// Executes a function with read access to the engine.
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AllocationEngine) -> R,
    {
        let session = self.inner.lock().expect("session mutex poisoned");
        f(&session.engine)
    }

    /// Executes a function with write access to the engine.
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut AllocationEngine) -> R,
    {
        let mut session = self.inner.lock().expect("session mutex poisoned");
        f(&mut session.engine)
    }

    /// Current read-only projection for the frontend.
    pub fn view(&self) -> SplitView {
        self.with_engine(SplitView::from_engine)
    }

    /// When the current receipt was loaded, if one has been.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().expect("session mutex poisoned").loaded_at
    }

    // -------------------------------------------------------------------------
    // Participant commands
    // -------------------------------------------------------------------------

    /// Adds a participant after validating the name.
    pub fn add_participant(&self, name: &str) -> SessionResult<SplitView> {
        debug!(name = %name, "add_participant command");
        let name = validation::validate_participant_name(name).map_err(dutch_core::CoreError::from)?;

        Ok(self.with_engine_mut(|engine| {
            validation::validate_participant_count(engine.participants().len())
                .map_err(dutch_core::CoreError::from)?;
            engine.add_participant(name);
            Ok::<SplitView, SessionError>(SplitView::from_engine(engine))
        })?)
    }

    /// Renames a participant.
    pub fn rename_participant(&self, id: &str, name: &str) -> SessionResult<SplitView> {
        debug!(id = %id, "rename_participant command");
        let name = validation::validate_participant_name(name).map_err(dutch_core::CoreError::from)?;

        self.with_engine_mut(|engine| {
            engine.rename_participant(id, name)?;
            Ok(SplitView::from_engine(engine))
        })
    }

    /// Removes a participant; their items revert to unassigned.
    /// Idempotent, so it returns the view rather than a Result.
    pub fn remove_participant(&self, id: &str) -> SplitView {
        debug!(id = %id, "remove_participant command");
        self.with_engine_mut(|engine| {
            engine.remove_participant(id);
            SplitView::from_engine(engine)
        })
    }

    // -------------------------------------------------------------------------
    // Line item commands
    // -------------------------------------------------------------------------

    /// Appends a line item (a blank row starts with amount 0).
    pub fn add_line_item(&self, description: &str, amount_cents: i64) -> SessionResult<SplitView> {
        debug!(amount_cents, "add_line_item command");
        validation::validate_description(description).map_err(dutch_core::CoreError::from)?;
        validation::validate_amount_cents(amount_cents).map_err(dutch_core::CoreError::from)?;

        Ok(self.with_engine_mut(|engine| {
            validation::validate_line_item_count(engine.receipt().line_items.len())
                .map_err(dutch_core::CoreError::from)?;
            engine.add_line_item(description, Money::from_cents(amount_cents));
            Ok::<SplitView, SessionError>(SplitView::from_engine(engine))
        })?)
    }

    /// Edits a line item's description and/or amount.
    pub fn update_line_item(&self, id: i64, patch: LineItemPatch) -> SessionResult<SplitView> {
        debug!(id, "update_line_item command");
        if let Some(description) = patch.description.as_deref() {
            validation::validate_description(description).map_err(dutch_core::CoreError::from)?;
        }
        if let Some(amount_cents) = patch.amount_cents {
            validation::validate_amount_cents(amount_cents).map_err(dutch_core::CoreError::from)?;
        }

        self.with_engine_mut(|engine| {
            engine.update_line_item(id, patch)?;
            Ok(SplitView::from_engine(engine))
        })
    }

    /// Removes a line item. Idempotent.
    pub fn remove_line_item(&self, id: i64) -> SplitView {
        debug!(id, "remove_line_item command");
        self.with_engine_mut(|engine| {
            engine.remove_line_item(id);
            SplitView::from_engine(engine)
        })
    }

    /// Reorders the receipt's items (drag-to-reorder).
    pub fn move_line_item(&self, from: usize, to: usize) -> SessionResult<SplitView> {
        debug!(from, to, "move_line_item command");
        self.with_engine_mut(|engine| {
            engine.move_line_item(from, to)?;
            Ok(SplitView::from_engine(engine))
        })
    }

    /// Assigns a line item to a participant (`None` clears it).
    pub fn assign(&self, line_item_id: i64, participant_id: Option<&str>) -> SessionResult<SplitView> {
        debug!(line_item_id, assigned = participant_id.is_some(), "assign command");
        self.with_engine_mut(|engine| {
            engine.assign(line_item_id, participant_id)?;
            Ok(SplitView::from_engine(engine))
        })
    }

    // -------------------------------------------------------------------------
    // Scan lifecycle
    // -------------------------------------------------------------------------

    /// Marks a scan as in flight.
    ///
    /// Fails with [`SessionError::ScanInFlight`] if one already is: the
    /// caller must disable re-trigger until the prior call resolves or
    /// fails. There is no cancellation of a pending scan.
    pub fn begin_scan(&self) -> SessionResult<()> {
        let mut session = self.inner.lock().expect("session mutex poisoned");
        if session.scan == ScanStatus::InFlight {
            warn!("scan requested while another is in flight");
            return Err(SessionError::ScanInFlight);
        }
        session.scan = ScanStatus::InFlight;
        Ok(())
    }

    /// Ingests an extracted receipt and clears the scan flag.
    ///
    /// Replacement is atomic under the session lock: receipt, roster and
    /// assignments all change together, and no reader can observe a half
    /// state.
    pub fn complete_scan(&self, receipt: Receipt) -> SplitView {
        let mut session = self.inner.lock().expect("session mutex poisoned");
        info!(
            vendor = %receipt.vendor.name,
            items = receipt.line_items.len(),
            "scan complete, loading receipt"
        );
        session.engine.load_receipt(receipt);
        session.scan = ScanStatus::Idle;
        session.loaded_at = Some(Utc::now());
        SplitView::from_engine(&session.engine)
    }

    /// Clears the scan flag after a failed extraction. Engine untouched;
    /// the presentation layer surfaces the error for user-visible retry.
    pub fn fail_scan(&self) {
        let mut session = self.inner.lock().expect("session mutex poisoned");
        session.scan = ScanStatus::Idle;
    }

    /// Whether an extraction is currently pending.
    pub fn scan_in_flight(&self) -> bool {
        self.inner.lock().expect("session mutex poisoned").scan == ScanStatus::InFlight
    }

    /// Drives one full scan cycle around an extraction future: guard, await,
    /// ingest-or-release.
    ///
    /// The lock is NOT held across the await; the engine stays usable for
    /// edits to the previous receipt while the upload runs, exactly like the
    /// original flow (the sheet shows a spinner, the old list stays live).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let view = session.scan_receipt(client.extract(&image_bytes)).await?;
    /// ```
    pub async fn scan_receipt<F>(&self, extraction: F) -> SessionResult<SplitView>
    where
        F: Future<Output = ExtractResult<Receipt>>,
    {
        self.begin_scan()?;

        match extraction.await {
            Ok(receipt) => Ok(self.complete_scan(receipt)),
            Err(err) => {
                warn!(error = %err, "extraction failed");
                self.fail_scan();
                Err(err.into())
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dutch_core::types::{LineItem, Vendor};
    use dutch_extract::ExtractError;

    fn sixty_forty_receipt() -> Receipt {
        Receipt {
            vendor: Vendor::new("Thai Palace", "restaurant"),
            line_items: vec![
                LineItem::new(1, "Pad Thai", Money::from_cents(6_000)),
                LineItem::new(2, "Green Curry", Money::from_cents(4_000)),
            ],
            subtotal_cents: 10_000,
            tax_cents: 1_000,
            total_cents: 11_000,
        }
    }

    #[test]
    fn test_commands_return_fresh_projection() {
        let session = SessionState::new();
        session.complete_scan(sixty_forty_receipt());

        let view = session.add_participant("Alice").unwrap();
        assert_eq!(view.participants.len(), 1);

        let alice_id = view.participants[0].id.clone();
        let view = session.assign(1, Some(&alice_id)).unwrap();
        assert_eq!(view.participants[0].share_cents, 6_600);
        assert!((view.percent_allocated - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_command_validation_rejects_bad_input() {
        let session = SessionState::new();

        assert!(session.add_participant("   ").is_err());
        assert!(session
            .add_line_item(&"x".repeat(300), 100)
            .is_err());
        assert!(session
            .add_line_item("ok", validation::MAX_AMOUNT_CENTS + 1)
            .is_err());

        // Nothing leaked into the engine
        let view = session.view();
        assert!(view.participants.is_empty());
        assert!(view.line_items.is_empty());
    }

    #[test]
    fn test_remove_commands_are_idempotent() {
        let session = SessionState::new();
        session.complete_scan(sixty_forty_receipt());

        let view = session.remove_line_item(1);
        assert_eq!(view.line_items.len(), 1);
        let view = session.remove_line_item(1); // unknown id: no-op
        assert_eq!(view.line_items.len(), 1);

        session.remove_participant("never-existed"); // no panic, no error
    }

    #[test]
    fn test_scan_guard_refuses_duplicate() {
        let session = SessionState::new();

        session.begin_scan().unwrap();
        assert!(session.scan_in_flight());
        assert!(matches!(
            session.begin_scan(),
            Err(SessionError::ScanInFlight)
        ));

        session.fail_scan();
        assert!(!session.scan_in_flight());
        session.begin_scan().unwrap(); // usable again
    }

    #[tokio::test]
    async fn test_scan_receipt_success_replaces_state() {
        let session = SessionState::new();
        session.complete_scan(sixty_forty_receipt());
        session.add_participant("Alice").unwrap();

        let receipt = Receipt {
            vendor: Vendor::new("Corner Deli", "grocery"),
            line_items: vec![LineItem::new(9, "Sandwich", Money::from_cents(850))],
            subtotal_cents: 850,
            tax_cents: 0,
            total_cents: 850,
        };
        let view = session.scan_receipt(async { Ok(receipt) }).await.unwrap();

        // Prior roster and assignments replaced atomically with the receipt
        assert_eq!(view.vendor_name, "Corner Deli");
        assert!(view.participants.is_empty());
        assert!(!session.scan_in_flight());
        assert!(session.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_scan_receipt_failure_releases_guard_and_keeps_state() {
        let session = SessionState::new();
        session.complete_scan(sixty_forty_receipt());

        let result = session
            .scan_receipt(async { Err(ExtractError::ServiceStatus { status: 503 }) })
            .await;

        assert!(matches!(
            result,
            Err(SessionError::Extract(ExtractError::ServiceStatus { status: 503 }))
        ));
        // Guard released for a retry, previous receipt untouched
        assert!(!session.scan_in_flight());
        assert_eq!(session.view().vendor_name, "Thai Palace");
    }

    #[tokio::test]
    async fn test_scan_receipt_refused_while_in_flight() {
        let session = SessionState::new();
        session.begin_scan().unwrap();

        let result = session
            .scan_receipt(async { Ok(sixty_forty_receipt()) })
            .await;
        assert!(matches!(result, Err(SessionError::ScanInFlight)));
    }
}

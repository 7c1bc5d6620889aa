//! # dutch-session: Session Orchestration for Dutch
//!
//! The thin layer between the frontend and the pure core:
//!
//! - [`state::SessionState`] - one allocation engine per active receipt,
//!   behind a single mutex, plus the single-in-flight scan guard
//! - [`projection::SplitView`] - the read-only snapshot the frontend renders
//!   after every mutation
//! - [`error::SessionError`] - what commands return when they fail
//!
//! ## Command Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  frontend intent ──► SessionState command ──► engine mutation           │
//! │                                                      │                  │
//! │  frontend render  ◄── SplitView (fresh) ◄────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scan path is the only async boundary:
//! `session.scan_receipt(client.extract(&image)).await` guards, awaits the
//! extraction, and atomically replaces the session on success.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod projection;
pub mod state;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{SessionError, SessionResult};
pub use projection::{LineItemView, ParticipantShare, SplitView};
pub use state::SessionState;

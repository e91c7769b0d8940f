//! # fleet-core: Pure Business Logic for Fleet Supply
//!
//! This crate holds the stock model and every rule that does not need a
//! database: money arithmetic, request validation, stock-line signatures
//! and the quantity bookkeeping behind allocations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fleet Supply Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport (out of scope)                        │   │
//! │  │     JSON payloads ──► ApiResponse { success, message, data }    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 fleet-engine (services)                         │   │
//! │  │     InventoryService, AllocationEngine, ledger ports            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fleet-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ signature │  │ validation│  │   │
//! │  │   │ PoolItem  │  │   Money   │  │ StockLine │  │  drafts   │  │   │
//! │  │   │Assignment │  │  line_tot │  │ MergeKey  │  │  orders   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                        ┌────────────┐                           │   │
//! │  │                        │ allocation │                           │   │
//! │  │                        └────────────┘                           │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fleet-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PoolItem, Assignment, Fleet, Boat)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation of loose request payloads
//! - [`signature`] - Stock-line matching keys
//! - [`allocation`] - Quantity transfer rules between pool and assignments
//!
//! ## Example Usage
//!
//! ```rust
//! use fleet_core::money::Money;
//!
//! // 12 hooks sold in packs of 4 at $3.50 per pack
//! let total = Money::from_cents(350).line_total(12, 4);
//! assert_eq!(total.cents(), 1050);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod signature;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use signature::{AssignmentMergeKey, PoolDuplicateKey, StockLineKey};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a stock line name.
pub const MAX_NAME_LEN: usize = 40;

/// Maximum length of a stock line note.
pub const MAX_NOTE_LEN: usize = 120;

/// Largest quantity a single pool record may hold.
pub const MAX_QUANTITY: i64 = 10_000;

/// Largest unit price, in cents ($1,000,000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Placeholder the intake form submits when no unit was picked.
///
/// A `selectUnit` equal to this value is treated as missing.
pub const UNIT_PLACEHOLDER: &str = "Unit";

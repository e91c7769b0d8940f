//! Ledger store adapters.
//!
//! - [`SqliteStore`] - production store, one sqlx transaction per unit of work
//! - [`MemoryStore`] - vectors behind an async mutex, for tests and demos

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, MemoryTx};
pub use sqlite::{SqliteStore, SqliteTx};

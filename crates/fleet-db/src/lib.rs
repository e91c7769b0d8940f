//! # fleet-db: Database Layer for Fleet Supply
//!
//! This crate provides database access for the Fleet Supply ledgers.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Fleet Supply Data Flow                            │
//! │                                                                         │
//! │  AllocationEngine::assign (fleet-engine)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fleet-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ PoolItemRepo  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ AssignmentRepo│    │ 001_init.sql │  │   │
//! │  │   │ begin()       │    │ FleetRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./fleet_supply.db (FLEET_DATABASE_PATH)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (pool items, assignments, fleets)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fleet_db::{Database, DbConfig, PoolItemRepository};
//!
//! let db = Database::new(DbConfig::new("fleet_supply.db")).await?;
//!
//! let mut tx = db.begin().await?;
//! let items = PoolItemRepository::new(&mut tx).list_all().await?;
//! tx.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbTransaction};

// Repository re-exports for convenience
pub use repository::assignment::AssignmentRepository;
pub use repository::fleet::FleetRepository;
pub use repository::pool_item::PoolItemRepository;

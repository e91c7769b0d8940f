//! # fleet-engine: Services for Fleet Supply
//!
//! The allocation engine and inventory service, written against storage
//! ports so they run unchanged over SQLite or the in-memory store.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         fleet-engine                                    │
//! │                                                                         │
//! │  JSON payload (AssignRequest, PoolItemRequest, ...)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fleet_core::validation ──✗──► EngineError ──► ApiResponse (400)       │
//! │       │ ✓                                                               │
//! │       ▼                                                                 │
//! │  ┌─────────────────────┐     ┌─────────────────────┐                   │
//! │  │  InventoryService   │     │  AllocationEngine   │                   │
//! │  │  list/get/create/   │     │  assign/modify/     │                   │
//! │  │  edit/remove        │     │  release/archive    │                   │
//! │  └──────────┬──────────┘     └──────────┬──────────┘                   │
//! │             └──────────┬───────────────┘                               │
//! │                        ▼                                                │
//! │         LedgerStore::begin() ──► LedgerTx ──► commit()                 │
//! │                        │                                                │
//! │          ┌─────────────┴─────────────┐                                 │
//! │          ▼                           ▼                                 │
//! │    SqliteStore (fleet-db)      MemoryStore                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`allocation`] - Assign, re-balance, release, bulk archive
//! - [`inventory`] - Pool CRUD
//! - [`ports`] - Ledger traits the services depend on
//! - [`store`] - SQLite and in-memory ledger stores
//! - [`response`] - `ApiResponse` envelope and error codes
//! - [`dto`] - Records as API consumers see them
//! - [`config`] - Environment configuration
//! - [`telemetry`] - `tracing` subscriber setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fleet_engine::{AllocationEngine, ApiResponse, FleetConfig, SqliteStore};
//! use fleet_engine::dto::AssignmentDto;
//!
//! let config = FleetConfig::load()?;
//! let store = SqliteStore::connect(&config).await?;
//! let engine = AllocationEngine::with_policy(store, config.allocation_policy());
//!
//! let result = engine.assign(&request).await;
//! let response: ApiResponse<AssignmentDto> =
//!     ApiResponse::from_result(result, config.expose_error_detail, |outcome| {
//!         (outcome.message().to_string(), Some(outcome.into()))
//!     });
//! ```

pub mod allocation;
pub mod config;
pub mod dto;
pub mod error;
pub mod inventory;
pub mod ports;
pub mod response;
pub mod store;
pub mod telemetry;

pub use allocation::{
    AllocationEngine, AllocationPolicy, AssignOutcome, BulkArchiveReport, ModifyOutcome,
};
pub use config::{ConfigError, Environment, FleetConfig};
pub use error::{EngineError, EngineResult};
pub use inventory::InventoryService;
pub use ports::{AssignmentLedger, FleetDirectory, LedgerStore, LedgerTx, PoolLedger};
pub use response::{ApiResponse, ErrorCode};
pub use store::{MemoryStore, SqliteStore};

//! # Repository Module
//!
//! Database repository implementations for Fleet Supply.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  fleet-engine SqliteTx (one sqlx::Transaction)                         │
//! │       │                                                                 │
//! │       │  PoolItemRepository::new(&mut tx).find_stock_line(&key, None)  │
//! │       ▼                                                                 │
//! │  PoolItemRepository      AssignmentRepository      FleetRepository     │
//! │  ├── list_all            ├── list_detailed         ├── find_*_by_name  │
//! │  ├── get_by_id           ├── get_by_id             ├── get_fleet/boat  │
//! │  ├── find_duplicate      ├── find_merge_target     └── insert_*        │
//! │  ├── find_stock_line     ├── insert / update                           │
//! │  └── insert/update/del   └── set_archived / delete                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories borrow a `&mut SqliteConnection`, so the same calls run  │
//! │  on a pooled connection or inside a transaction.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`PoolItemRepository`](pool_item::PoolItemRepository) - Pool ledger
//! - [`AssignmentRepository`](assignment::AssignmentRepository) - Assignment ledger
//! - [`FleetRepository`](fleet::FleetRepository) - Fleet/boat directory

pub mod assignment;
pub mod fleet;
pub mod pool_item;

//! JS Foods ordering and inventory core.
//!
//! Data-access layer for the JS Foods wholesale distribution system. All
//! state lives in a single-file SQLite database; the public surface is plain
//! library calls consumed by the UI portals.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Configuration
//! ├── db/            # Pool setup, models, repositories
//! ├── pricing/       # Discount rule matching
//! ├── orders/        # Order placement transaction manager
//! └── utils/         # Logging, time, ID generation
//! ```
//!
//! The one subsystem with a hard correctness contract is order placement
//! ([`OrderManager::place_order`]): the order header, its line items, the
//! stock deductions, and the inventory log entries commit or roll back as a
//! single SQLite transaction.

pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod utils;

pub use core::Config;
pub use db::DbService;
pub use db::repository::{RepoError, RepoResult};
pub use orders::OrderManager;
pub use utils::logger::init_logger;

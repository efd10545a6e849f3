//! Order placement and lifecycle.

pub mod manager;

pub use manager::OrderManager;

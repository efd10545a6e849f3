//! Inventory Log Model

use serde::{Deserialize, Serialize};

/// Append-only inventory audit record.
///
/// Every stock mutation writes exactly one entry in the same transaction,
/// so for any product the sum of `change_amount` over its entries equals
/// its current stock.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryLogEntry {
    pub log_id: i64,
    pub product_id: i64,
    /// Signed change in kilograms; negative for deductions.
    pub change_amount: f64,
    /// Stock level after applying the change.
    pub new_stock: f64,
    pub reason: String,
    pub logged_by: i64,
    pub logged_at: i64,
}

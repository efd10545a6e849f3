//! Stock Ledger
//!
//! Every stock mutation goes through this module: the quantity update on
//! the product row and the inventory log append happen in the same
//! transaction, so the ledger always reconciles with current stock.
//!
//! Non-negativity is enforced here rather than trusted to callers: the
//! guarded UPDATE refuses any delta that would drive stock below zero, and
//! doubles as the per-product serialization point for concurrent
//! deductions (two writers cannot both observe the same prior stock).

use super::{RepoError, RepoResult};
use crate::db::models::InventoryLogEntry;
use crate::utils::time::now_millis;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Adjust a product's stock by `delta` (negative for deductions) in its own
/// transaction, recording the change in the inventory log.
pub async fn adjust(
    pool: &SqlitePool,
    product_id: i64,
    delta: f64,
    reason: &str,
    actor_id: i64,
) -> RepoResult<InventoryLogEntry> {
    if delta == 0.0 {
        return Err(RepoError::Validation("stock delta cannot be zero".into()));
    }

    let mut tx = pool.begin().await?;
    let entry = apply(&mut tx, product_id, delta, reason, actor_id).await?;
    tx.commit().await?;

    tracing::info!(
        product_id,
        delta,
        new_stock = entry.new_stock,
        reason,
        "stock adjusted"
    );
    Ok(entry)
}

/// Apply a stock change inside an existing transaction.
///
/// Fails with [`RepoError::NotFound`] when the product does not exist and
/// [`RepoError::Conflict`] when the delta would drive stock negative; in
/// both cases nothing has been written through this call.
pub(crate) async fn apply(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: i64,
    delta: f64,
    reason: &str,
    actor_id: i64,
) -> RepoResult<InventoryLogEntry> {
    let new_stock: Option<f64> = sqlx::query_scalar(
        "UPDATE products SET current_stock_kg = current_stock_kg + ?1 \
         WHERE product_id = ?2 AND current_stock_kg + ?1 >= 0 \
         RETURNING current_stock_kg",
    )
    .bind(delta)
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(new_stock) = new_stock else {
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT product_id FROM products WHERE product_id = ?")
                .bind(product_id)
                .fetch_optional(&mut **tx)
                .await?;
        return match exists {
            Some(_) => Err(RepoError::Conflict(format!(
                "Insufficient stock for product {product_id}: cannot apply delta {delta}"
            ))),
            None => Err(RepoError::NotFound(format!("Product {product_id} not found"))),
        };
    };

    let logged_at = now_millis();
    let log_id: i64 = sqlx::query_scalar(
        "INSERT INTO inventory_log (product_id, change_amount, new_stock, reason, logged_by, logged_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING log_id",
    )
    .bind(product_id)
    .bind(delta)
    .bind(new_stock)
    .bind(reason)
    .bind(actor_id)
    .bind(logged_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(InventoryLogEntry {
        log_id,
        product_id,
        change_amount: delta,
        new_stock,
        reason: reason.to_string(),
        logged_by: actor_id,
        logged_at,
    })
}

/// Ledger entries for a product, newest first.
pub async fn history(
    pool: &SqlitePool,
    product_id: i64,
    limit: i64,
) -> RepoResult<Vec<InventoryLogEntry>> {
    let entries = sqlx::query_as::<_, InventoryLogEntry>(
        "SELECT log_id, product_id, change_amount, new_stock, reason, logged_by, logged_at \
         FROM inventory_log WHERE product_id = ? ORDER BY log_id DESC LIMIT ?",
    )
    .bind(product_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

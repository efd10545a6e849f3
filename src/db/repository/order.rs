//! Order Repository
//!
//! Read-side queries and status updates for orders. Order creation is the
//! multi-step transaction owned by [`crate::orders::OrderManager`].

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderItemDetail, OrderStatus, OrderSummary};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT order_id, customer_id, created_at, total_amount, status, delivery_date, delivery_address, payment_method, notes FROM orders";

pub async fn find_by_id(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE order_id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Line items of an order joined with product name and category.
pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let items = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.item_id, oi.order_id, oi.product_id, p.name AS product_name, p.category, \
                oi.quantity_kg, oi.unit_price, oi.discount_percent, oi.final_price \
         FROM order_items oi \
         JOIN products p ON oi.product_id = p.product_id \
         WHERE oi.order_id = ? \
         ORDER BY oi.item_id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Recent orders for one customer, newest first, with per-order line counts.
pub async fn find_for_customer(
    pool: &SqlitePool,
    customer_id: i64,
    limit: i64,
) -> RepoResult<Vec<OrderSummary>> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.order_id, o.customer_id, o.created_at, o.total_amount, o.status, o.delivery_date, \
                (SELECT COUNT(*) FROM order_items WHERE order_id = o.order_id) AS item_count \
         FROM orders o \
         WHERE o.customer_id = ? \
         ORDER BY o.created_at DESC, o.order_id DESC \
         LIMIT ?",
    )
    .bind(customer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Orders with a given status, oldest first (fulfillment queue view).
pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at ASC");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Guarded status write: only succeeds while the order is still in
/// `from`, so a transition validated against a stale read cannot land.
/// Transition rules are enforced by
/// [`crate::orders::OrderManager::update_status`].
pub(crate) async fn set_status(
    pool: &SqlitePool,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE order_id = ? AND status = ?")
        .bind(to)
        .bind(order_id)
        .bind(from)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_id} is no longer {}",
            from.as_str()
        )));
    }
    Ok(())
}

//! Order Transaction Manager
//!
//! Owns the one multi-step write in the system: creating an order header,
//! its line items, the stock deductions, and the inventory log entries as a
//! single SQLite transaction. Any failure on any line unwinds everything;
//! readers never observe a partial order.

use crate::db::models::{
    Order, OrderInfo, OrderItemDetail, OrderItemInput, OrderStatus, OrderSummary, Product,
};
use crate::db::repository::{RepoError, RepoResult, discount_rule, order, stock};
use crate::utils::time::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Orchestrates order placement and status changes over an injected pool.
#[derive(Clone)]
pub struct OrderManager {
    pool: SqlitePool,
}

/// One priced line, resolved inside the placement transaction.
struct PricedLine {
    input: OrderItemInput,
    discount_percent: f64,
    final_price: f64,
}

impl OrderManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order for `customer_id`.
    ///
    /// For each line, in input order: the discount is resolved against the
    /// product's category and quantity, the line is written with the
    /// caller's unit-price snapshot, and the quantity is deducted through
    /// the stock ledger with reason `Order #<id>`. The stored total is the
    /// sum of the final line prices; callers do not supply it.
    ///
    /// Errors: [`RepoError::Validation`] for an empty cart or non-positive
    /// quantity, [`RepoError::NotFound`] for a missing or inactive product,
    /// [`RepoError::Conflict`] when a line would drive stock negative. All
    /// of them leave the store exactly as it was.
    pub async fn place_order(
        &self,
        customer_id: i64,
        info: OrderInfo,
        items: &[OrderItemInput],
    ) -> RepoResult<i64> {
        if items.is_empty() {
            return Err(RepoError::Validation("order has no line items".into()));
        }
        for item in items {
            if item.quantity_kg <= 0.0 {
                return Err(RepoError::Validation(format!(
                    "quantity must be positive for product {}: {}",
                    item.product_id, item.quantity_kg
                )));
            }
            if item.unit_price < 0.0 {
                return Err(RepoError::Validation(format!(
                    "unit price cannot be negative for product {}: {}",
                    item.product_id, item.unit_price
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        // Price every line first: product lookup, discount resolution,
        // final price. Nothing is written until the total is known.
        let mut priced = Vec::with_capacity(items.len());
        for item in items {
            let product: Option<Product> = sqlx::query_as(
                "SELECT product_id, name, category, price_per_kg, current_stock_kg, min_stock_kg, is_active FROM products WHERE product_id = ?",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let product = product.ok_or_else(|| {
                RepoError::NotFound(format!("Product {} not found", item.product_id))
            })?;
            if !product.is_active {
                return Err(RepoError::NotFound(format!(
                    "Product {} is no longer available",
                    item.product_id
                )));
            }

            let discount_percent = discount_rule::resolve_for_category(
                &mut tx,
                product.category.as_str(),
                item.quantity_kg,
            )
            .await?;
            let final_price =
                item.quantity_kg * item.unit_price * (1.0 - discount_percent / 100.0);

            priced.push(PricedLine {
                input: item.clone(),
                discount_percent,
                final_price,
            });
        }

        let total_amount: f64 = priced.iter().map(|l| l.final_price).sum();
        let order_id = snowflake_id();

        sqlx::query(
            "INSERT INTO orders (order_id, customer_id, created_at, total_amount, status, delivery_date, delivery_address, payment_method, notes) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(customer_id)
        .bind(now_millis())
        .bind(total_amount)
        .bind(OrderStatus::Pending)
        .bind(&info.delivery_date)
        .bind(&info.delivery_address)
        .bind(info.payment_method.as_deref().unwrap_or("cash"))
        .bind(&info.notes)
        .execute(&mut *tx)
        .await?;

        let reason = format!("Order #{order_id}");
        for line in &priced {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity_kg, unit_price, discount_percent, final_price) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(line.input.product_id)
            .bind(line.input.quantity_kg)
            .bind(line.input.unit_price)
            .bind(line.discount_percent)
            .bind(line.final_price)
            .execute(&mut *tx)
            .await?;

            stock::apply(
                &mut tx,
                line.input.product_id,
                -line.input.quantity_kg,
                &reason,
                customer_id,
            )
            .await?;
        }

        tx.commit().await?;
        tracing::info!(
            order_id,
            customer_id,
            total_amount,
            lines = priced.len(),
            "order placed"
        );
        Ok(order_id)
    }

    /// Fetch an order with its line items.
    pub async fn get_order(&self, order_id: i64) -> RepoResult<(Order, Vec<OrderItemDetail>)> {
        let header = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
        let items = order::find_items(&self.pool, order_id).await?;
        Ok((header, items))
    }

    /// Recent orders for a customer, newest first.
    pub async fn orders_for_customer(
        &self,
        customer_id: i64,
        limit: i64,
    ) -> RepoResult<Vec<OrderSummary>> {
        order::find_for_customer(&self.pool, customer_id, limit).await
    }

    /// Move an order to `new_status`, enforcing the modeled lifecycle.
    ///
    /// The write is guarded on the status the transition was validated
    /// against, so two staff members racing on the same order cannot both
    /// win; the loser gets [`RepoError::Conflict`].
    ///
    /// Cancelling does not restock: fulfilled quantities stay deducted and
    /// any return is booked as an explicit ledger adjustment.
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatus) -> RepoResult<Order> {
        let current = order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;

        if !current.status.can_transition_to(new_status) {
            return Err(RepoError::Conflict(format!(
                "Order {order_id} cannot move from {} to {}",
                current.status.as_str(),
                new_status.as_str()
            )));
        }

        order::set_status(&self.pool, order_id, current.status, new_status).await?;
        tracing::info!(
            order_id,
            from = current.status.as_str(),
            to = new_status.as_str(),
            "order status updated"
        );

        order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

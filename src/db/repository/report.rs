//! Sales Reporting
//!
//! Aggregation queries over completed orders. Cancelled orders are always
//! excluded.

use super::RepoResult;
use crate::db::models::Category;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Headline figures for a reporting period.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalesTotals {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
}

/// Revenue breakdown for one category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategorySales {
    pub category: Category,
    pub total_kg: f64,
    pub total_revenue: f64,
    pub order_count: i64,
}

/// One row of the top-products ranking.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopProduct {
    pub name: String,
    pub category: Category,
    pub total_kg: f64,
    pub total_revenue: f64,
    pub times_ordered: i64,
}

/// Sales report for a time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub start_ms: i64,
    pub end_ms: i64,
    pub totals: SalesTotals,
    pub by_category: Vec<CategorySales>,
    pub top_products: Vec<TopProduct>,
}

/// Aggregate sales between two UTC millisecond timestamps (inclusive).
pub async fn sales_summary(pool: &SqlitePool, start_ms: i64, end_ms: i64) -> RepoResult<SalesSummary> {
    let totals = sqlx::query_as::<_, SalesTotals>(
        "SELECT COUNT(*) AS total_orders, \
                COALESCE(SUM(total_amount), 0.0) AS total_revenue, \
                COALESCE(AVG(total_amount), 0.0) AS avg_order_value \
         FROM orders \
         WHERE created_at BETWEEN ? AND ? AND status != 'cancelled'",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_one(pool)
    .await?;

    let by_category = sqlx::query_as::<_, CategorySales>(
        "SELECT p.category, \
                SUM(oi.quantity_kg) AS total_kg, \
                SUM(oi.final_price) AS total_revenue, \
                COUNT(DISTINCT o.order_id) AS order_count \
         FROM order_items oi \
         JOIN orders o ON oi.order_id = o.order_id \
         JOIN products p ON oi.product_id = p.product_id \
         WHERE o.created_at BETWEEN ? AND ? AND o.status != 'cancelled' \
         GROUP BY p.category \
         ORDER BY total_revenue DESC",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_all(pool)
    .await?;

    let top_products = sqlx::query_as::<_, TopProduct>(
        "SELECT p.name, p.category, \
                SUM(oi.quantity_kg) AS total_kg, \
                SUM(oi.final_price) AS total_revenue, \
                COUNT(*) AS times_ordered \
         FROM order_items oi \
         JOIN orders o ON oi.order_id = o.order_id \
         JOIN products p ON oi.product_id = p.product_id \
         WHERE o.created_at BETWEEN ? AND ? AND o.status != 'cancelled' \
         GROUP BY p.product_id \
         ORDER BY total_revenue DESC \
         LIMIT 10",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_all(pool)
    .await?;

    Ok(SalesSummary {
        start_ms,
        end_ms,
        totals,
        by_category,
        top_products,
    })
}

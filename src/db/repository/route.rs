//! Delivery Route Repository
//!
//! Route records and order-to-route assignment. Stop sequence is whatever
//! the dispatcher enters; there is no route optimization.

use super::{RepoError, RepoResult};
use crate::db::models::{DeliveryRoute, DeliveryRouteCreate, RouteStop};
use crate::utils::time::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ROUTE_SELECT: &str = "SELECT route_id, route_name, employee_id, delivery_date, vehicle_info, notes, created_at FROM delivery_routes";

pub async fn find_by_id(pool: &SqlitePool, route_id: i64) -> RepoResult<Option<DeliveryRoute>> {
    let sql = format!("{ROUTE_SELECT} WHERE route_id = ?");
    let route = sqlx::query_as::<_, DeliveryRoute>(&sql)
        .bind(route_id)
        .fetch_optional(pool)
        .await?;
    Ok(route)
}

/// Routes scheduled for a delivery date (`YYYY-MM-DD`).
pub async fn find_by_date(pool: &SqlitePool, delivery_date: &str) -> RepoResult<Vec<DeliveryRoute>> {
    let sql = format!("{ROUTE_SELECT} WHERE delivery_date = ? ORDER BY route_name");
    let routes = sqlx::query_as::<_, DeliveryRoute>(&sql)
        .bind(delivery_date)
        .fetch_all(pool)
        .await?;
    Ok(routes)
}

pub async fn create(pool: &SqlitePool, data: DeliveryRouteCreate) -> RepoResult<DeliveryRoute> {
    if data.route_name.trim().is_empty() {
        return Err(RepoError::Validation("route name cannot be empty".into()));
    }

    let route_id = snowflake_id();
    sqlx::query(
        "INSERT INTO delivery_routes (route_id, route_name, employee_id, delivery_date, vehicle_info, notes, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(route_id)
    .bind(&data.route_name)
    .bind(data.employee_id)
    .bind(&data.delivery_date)
    .bind(&data.vehicle_info)
    .bind(&data.notes)
    .bind(now_millis())
    .execute(pool)
    .await?;

    tracing::info!(route_id, route_name = %data.route_name, "delivery route created");

    find_by_id(pool, route_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create route".into()))
}

/// Assign an order to a route at the given stop sequence.
pub async fn assign_order(
    pool: &SqlitePool,
    route_id: i64,
    order_id: i64,
    sequence_number: i64,
) -> RepoResult<()> {
    if find_by_id(pool, route_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Route {route_id} not found")));
    }
    let order_exists: Option<(i64,)> =
        sqlx::query_as("SELECT order_id FROM orders WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(pool)
            .await?;
    if order_exists.is_none() {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }

    let result = sqlx::query(
        "INSERT INTO route_orders (id, route_id, order_id, sequence_number) VALUES (?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(route_id)
    .bind(order_id)
    .bind(sequence_number)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        // route_orders has UNIQUE(route_id, order_id)
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(RepoError::Conflict(
            format!("Order {order_id} is already on route {route_id}"),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Stops on a route in delivery sequence.
pub async fn stops(pool: &SqlitePool, route_id: i64) -> RepoResult<Vec<RouteStop>> {
    let stops = sqlx::query_as::<_, RouteStop>(
        "SELECT ro.sequence_number, o.order_id, o.customer_id, o.status, o.delivery_address, o.total_amount \
         FROM route_orders ro \
         JOIN orders o ON ro.order_id = o.order_id \
         WHERE ro.route_id = ? \
         ORDER BY ro.sequence_number",
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;
    Ok(stops)
}

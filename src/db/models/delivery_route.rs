//! Delivery Route Model

use super::OrderStatus;
use serde::{Deserialize, Serialize};

/// Delivery route entity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeliveryRoute {
    pub route_id: i64,
    pub route_name: String,
    pub employee_id: Option<i64>,
    pub delivery_date: String,
    pub vehicle_info: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create delivery route payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRouteCreate {
    pub route_name: String,
    pub employee_id: Option<i64>,
    pub delivery_date: String,
    pub vehicle_info: Option<String>,
    pub notes: Option<String>,
}

/// One stop on a route: the assigned order with its delivery details.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RouteStop {
    pub sequence_number: i64,
    pub order_id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub total_amount: f64,
}

//! Order Model

use super::Category;
use serde::{Deserialize, Serialize};

/// Order status lifecycle, stored lowercase.
///
/// `pending → confirmed → processing → ready → delivered`, with `cancelled`
/// reachable from any non-terminal state. No other transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further status change is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `next` is a modeled transition from this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            OrderStatus::Cancelled => true,
            OrderStatus::Confirmed => *self == OrderStatus::Pending,
            OrderStatus::Processing => *self == OrderStatus::Confirmed,
            OrderStatus::Ready => *self == OrderStatus::Processing,
            OrderStatus::Delivered => *self == OrderStatus::Ready,
            OrderStatus::Pending => false,
        }
    }
}

/// Order header entity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub created_at: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub delivery_date: Option<String>,
    pub delivery_address: Option<String>,
    pub payment_method: String,
    pub notes: Option<String>,
}

/// Order line item entity. Immutable once written; `unit_price` is the
/// price snapshot taken at order time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity_kg: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub final_price: f64,
}

/// Line item joined with product name and category, for detail views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemDetail {
    pub item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category: Category,
    pub quantity_kg: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub final_price: f64,
}

/// Delivery and payment details supplied when placing an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInfo {
    pub delivery_date: Option<String>,
    pub delivery_address: Option<String>,
    /// Defaults to `cash` when unset.
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity_kg: f64,
    pub unit_price: f64,
}

/// Order header with its line count, for list views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub order_id: i64,
    pub customer_id: i64,
    pub created_at: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub delivery_date: Option<String>,
    pub item_count: i64,
}

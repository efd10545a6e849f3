//! Discount Rule Model

use serde::{Deserialize, Serialize};

/// Quantity-threshold discount rule.
///
/// A rule applies when the ordered quantity reaches `min_quantity_kg`, the
/// category filter is unset or contains the product's category, and today
/// falls inside the validity window (either bound may be open).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiscountRule {
    pub rule_id: i64,
    pub min_quantity_kg: f64,
    pub discount_percent: f64,
    /// Comma-separated category names; `None` applies to all categories.
    pub applicable_categories: Option<String>,
    pub is_active: bool,
    /// Inclusive `YYYY-MM-DD` lower bound, open when unset.
    pub start_date: Option<String>,
    /// Inclusive `YYYY-MM-DD` upper bound, open when unset.
    pub end_date: Option<String>,
}

/// Create discount rule payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRuleCreate {
    pub min_quantity_kg: f64,
    pub discount_percent: f64,
    pub applicable_categories: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

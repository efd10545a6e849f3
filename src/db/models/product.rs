//! Product Model

use serde::{Deserialize, Serialize};

/// Product category. Fixed set, stored capitalized in the `category` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Category {
    Beef,
    Pork,
    Poultry,
    Lamb,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Beef => "Beef",
            Category::Pork => "Pork",
            Category::Poultry => "Poultry",
            Category::Lamb => "Lamb",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product entity. Stock quantities are kilograms.
///
/// `current_stock_kg` is mutated only through the stock ledger
/// (`repository::stock`); products are soft-deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: Category,
    pub price_per_kg: f64,
    pub current_stock_kg: f64,
    pub min_stock_kg: f64,
    pub is_active: bool,
}

/// Create product payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category: Category,
    pub price_per_kg: f64,
    pub initial_stock_kg: f64,
    pub min_stock_kg: f64,
}

/// Product with its stock level relative to the minimum threshold, for the
/// low-stock alert view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LowStockProduct {
    pub product_id: i64,
    pub name: String,
    pub category: Category,
    pub price_per_kg: f64,
    pub current_stock_kg: f64,
    pub min_stock_kg: f64,
    pub stock_fraction: f64,
}

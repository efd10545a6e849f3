//! Product Repository

use super::{RepoError, RepoResult, stock};
use crate::db::models::{Category, LowStockProduct, Product, ProductCreate};
use crate::utils::time::snowflake_id;
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT product_id, name, category, price_per_kg, current_stock_kg, min_stock_kg, is_active FROM products";

pub async fn find_by_id(pool: &SqlitePool, product_id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE product_id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// List products, optionally restricted to a category.
pub async fn list(
    pool: &SqlitePool,
    category: Option<Category>,
    active_only: bool,
) -> RepoResult<Vec<Product>> {
    let mut sql = PRODUCT_SELECT.to_string();
    match (category, active_only) {
        (Some(_), true) => sql.push_str(" WHERE category = ? AND is_active = 1"),
        (Some(_), false) => sql.push_str(" WHERE category = ?"),
        (None, true) => sql.push_str(" WHERE is_active = 1"),
        (None, false) => {}
    }
    sql.push_str(" ORDER BY name");

    let mut query = sqlx::query_as::<_, Product>(&sql);
    if let Some(category) = category {
        query = query.bind(category);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Create a product. A non-zero initial stock is booked through the stock
/// ledger in the same transaction, so the ledger reconciles from creation.
pub async fn create(pool: &SqlitePool, data: ProductCreate, actor_id: i64) -> RepoResult<Product> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("product name cannot be empty".into()));
    }
    if data.price_per_kg < 0.0 {
        return Err(RepoError::Validation(format!(
            "price_per_kg cannot be negative: {}",
            data.price_per_kg
        )));
    }
    if data.initial_stock_kg < 0.0 {
        return Err(RepoError::Validation(format!(
            "initial_stock_kg cannot be negative: {}",
            data.initial_stock_kg
        )));
    }
    if data.min_stock_kg < 0.0 {
        return Err(RepoError::Validation(format!(
            "min_stock_kg cannot be negative: {}",
            data.min_stock_kg
        )));
    }

    let product_id = snowflake_id();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO products (product_id, name, category, price_per_kg, current_stock_kg, min_stock_kg, is_active) VALUES (?, ?, ?, ?, 0, ?, 1)",
    )
    .bind(product_id)
    .bind(&data.name)
    .bind(data.category)
    .bind(data.price_per_kg)
    .bind(data.min_stock_kg)
    .execute(&mut *tx)
    .await?;

    if data.initial_stock_kg > 0.0 {
        stock::apply(
            &mut tx,
            product_id,
            data.initial_stock_kg,
            "Initial stock",
            actor_id,
        )
        .await?;
    }

    tx.commit().await?;
    tracing::info!(product_id, name = %data.name, "product created");

    find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Soft-deactivate a product; it stays referenced by past orders.
pub async fn deactivate(pool: &SqlitePool, product_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE products SET is_active = 0 WHERE product_id = ?")
        .bind(product_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Product {product_id} not found"
        )));
    }
    tracing::info!(product_id, "product deactivated");
    Ok(())
}

/// Change the listed price. Past order lines keep their snapshotted price.
pub async fn update_price(pool: &SqlitePool, product_id: i64, price_per_kg: f64) -> RepoResult<()> {
    if price_per_kg < 0.0 {
        return Err(RepoError::Validation(format!(
            "price_per_kg cannot be negative: {price_per_kg}"
        )));
    }
    let rows = sqlx::query("UPDATE products SET price_per_kg = ? WHERE product_id = ?")
        .bind(price_per_kg)
        .bind(product_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Product {product_id} not found"
        )));
    }
    Ok(())
}

/// Active products at or below `threshold_fraction` of their minimum stock
/// level, most depleted first.
pub async fn low_stock(
    pool: &SqlitePool,
    threshold_fraction: f64,
) -> RepoResult<Vec<LowStockProduct>> {
    let products = sqlx::query_as::<_, LowStockProduct>(
        "SELECT product_id, name, category, price_per_kg, current_stock_kg, min_stock_kg, \
                CASE WHEN min_stock_kg > 0 THEN current_stock_kg / min_stock_kg ELSE 0.0 END AS stock_fraction \
         FROM products \
         WHERE is_active = 1 AND current_stock_kg <= min_stock_kg * ? \
         ORDER BY stock_fraction ASC",
    )
    .bind(threshold_fraction)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

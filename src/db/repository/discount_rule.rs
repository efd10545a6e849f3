//! Discount Rule Repository
//!
//! Rule CRUD plus the discount resolver used during order placement.

use super::{RepoError, RepoResult};
use crate::db::models::{DiscountRule, DiscountRuleCreate};
use crate::pricing;
use crate::utils::time::{snowflake_id, today};
use sqlx::{SqliteConnection, SqlitePool};

const RULE_SELECT: &str = "SELECT rule_id, min_quantity_kg, discount_percent, applicable_categories, is_active, start_date, end_date FROM discount_rules";

pub async fn find_by_id(pool: &SqlitePool, rule_id: i64) -> RepoResult<Option<DiscountRule>> {
    let sql = format!("{RULE_SELECT} WHERE rule_id = ?");
    let rule = sqlx::query_as::<_, DiscountRule>(&sql)
        .bind(rule_id)
        .fetch_optional(pool)
        .await?;
    Ok(rule)
}

pub async fn list(pool: &SqlitePool, active_only: bool) -> RepoResult<Vec<DiscountRule>> {
    let sql = if active_only {
        format!("{RULE_SELECT} WHERE is_active = 1 ORDER BY min_quantity_kg")
    } else {
        format!("{RULE_SELECT} ORDER BY min_quantity_kg")
    };
    Ok(sqlx::query_as::<_, DiscountRule>(&sql)
        .fetch_all(pool)
        .await?)
}

pub async fn create(pool: &SqlitePool, data: DiscountRuleCreate) -> RepoResult<DiscountRule> {
    if data.min_quantity_kg <= 0.0 {
        return Err(RepoError::Validation(format!(
            "min_quantity_kg must be positive: {}",
            data.min_quantity_kg
        )));
    }
    if !(0.0..=100.0).contains(&data.discount_percent) {
        return Err(RepoError::Validation(format!(
            "discount_percent must be between 0 and 100: {}",
            data.discount_percent
        )));
    }
    if let (Some(start), Some(end)) = (&data.start_date, &data.end_date)
        && start > end
    {
        return Err(RepoError::Validation(format!(
            "start_date {start} is after end_date {end}"
        )));
    }

    let rule_id = snowflake_id();
    sqlx::query(
        "INSERT INTO discount_rules (rule_id, min_quantity_kg, discount_percent, applicable_categories, is_active, start_date, end_date) VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(rule_id)
    .bind(data.min_quantity_kg)
    .bind(data.discount_percent)
    .bind(&data.applicable_categories)
    .bind(&data.start_date)
    .bind(&data.end_date)
    .execute(pool)
    .await?;

    tracing::info!(
        rule_id,
        min_quantity_kg = data.min_quantity_kg,
        discount_percent = data.discount_percent,
        "discount rule created"
    );

    find_by_id(pool, rule_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount rule".into()))
}

pub async fn deactivate(pool: &SqlitePool, rule_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE discount_rules SET is_active = 0 WHERE rule_id = ?")
        .bind(rule_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Rule {rule_id} not found")));
    }
    Ok(())
}

/// Resolve the discount percentage for ordering `quantity_kg` of a product.
///
/// Returns 0 when no rule applies. A missing product also resolves to 0
/// rather than an error: discount lookup is advisory and must never fail an
/// otherwise valid price display.
pub async fn resolve(pool: &SqlitePool, product_id: i64, quantity_kg: f64) -> RepoResult<f64> {
    let mut conn = pool.acquire().await?;
    resolve_on(&mut conn, product_id, quantity_kg).await
}

/// Resolver core, usable inside an open transaction.
pub(crate) async fn resolve_on(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity_kg: f64,
) -> RepoResult<f64> {
    let category: Option<String> =
        sqlx::query_scalar("SELECT category FROM products WHERE product_id = ?")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;
    let Some(category) = category else {
        tracing::debug!(product_id, "discount lookup for unknown product, defaulting to 0");
        return Ok(0.0);
    };

    resolve_for_category(conn, &category, quantity_kg).await
}

/// Resolve against an already-known category, skipping the product lookup.
pub(crate) async fn resolve_for_category(
    conn: &mut SqliteConnection,
    category: &str,
    quantity_kg: f64,
) -> RepoResult<f64> {
    let sql = format!("{RULE_SELECT} WHERE is_active = 1 AND min_quantity_kg <= ?");
    let candidates = sqlx::query_as::<_, DiscountRule>(&sql)
        .bind(quantity_kg)
        .fetch_all(&mut *conn)
        .await?;

    let percent = pricing::select_rule(&candidates, category, quantity_kg, &today())
        .map(|r| r.discount_percent)
        .unwrap_or(0.0);
    Ok(percent)
}

//! Shared helpers for integration tests: temp-file database setup and
//! fixture records.

#![allow(dead_code)]

use jsfoods_store::DbService;
use jsfoods_store::db::models::{Category, DiscountRuleCreate, ProductCreate, Role, UserCreate};
use jsfoods_store::db::repository::{discount_rule, product, user};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Open a fresh database in a temp directory. Keep the returned `TempDir`
/// alive for the duration of the test.
pub async fn setup() -> (DbService, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.db");
    let db = DbService::new(path.to_str().expect("utf-8 path"))
        .await
        .expect("open test database");
    (db, dir)
}

pub async fn create_customer(pool: &SqlitePool, username: &str) -> i64 {
    user::create(
        pool,
        UserCreate {
            username: username.into(),
            password: "password123".into(),
            role: Role::Customer,
            first_name: "Test".into(),
            last_name: "Customer".into(),
            email: format!("{username}@example.com"),
            phone: None,
            address: Some("1 Test Street".into()),
        },
    )
    .await
    .expect("create customer")
    .user_id
}

pub async fn create_product(
    pool: &SqlitePool,
    actor_id: i64,
    name: &str,
    category: Category,
    price_per_kg: f64,
    initial_stock_kg: f64,
) -> i64 {
    product::create(
        pool,
        ProductCreate {
            name: name.into(),
            category,
            price_per_kg,
            initial_stock_kg,
            min_stock_kg: 10.0,
        },
        actor_id,
    )
    .await
    .expect("create product")
    .product_id
}

pub async fn add_rule(pool: &SqlitePool, min_quantity_kg: f64, discount_percent: f64) -> i64 {
    discount_rule::create(
        pool,
        DiscountRuleCreate {
            min_quantity_kg,
            discount_percent,
            applicable_categories: None,
            start_date: None,
            end_date: None,
        },
    )
    .await
    .expect("create discount rule")
    .rule_id
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

pub async fn stock_of(pool: &SqlitePool, product_id: i64) -> f64 {
    product::find_by_id(pool, product_id)
        .await
        .expect("load product")
        .expect("product exists")
        .current_stock_kg
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::{Role, User, UserCreate, UserStats};
use crate::utils::time::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT user_id, username, password_hash, role, first_name, last_name, email, phone, address, registered_at FROM users";

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE user_id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// List users, optionally restricted to one role, ordered by name.
pub async fn list(pool: &SqlitePool, role: Option<Role>) -> RepoResult<Vec<User>> {
    let users = match role {
        Some(role) => {
            let sql = format!("{USER_SELECT} WHERE role = ? ORDER BY last_name, first_name");
            sqlx::query_as::<_, User>(&sql)
                .bind(role)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{USER_SELECT} ORDER BY last_name, first_name");
            sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?
        }
    };
    Ok(users)
}

/// Create a new user with an argon2-hashed password.
pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if data.username.trim().is_empty() {
        return Err(RepoError::Validation("username cannot be empty".into()));
    }
    if data.password.is_empty() {
        return Err(RepoError::Validation("password cannot be empty".into()));
    }
    if !data.email.contains('@') {
        return Err(RepoError::Validation(format!(
            "invalid email: {}",
            data.email
        )));
    }

    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT user_id FROM users WHERE username = ? OR email = ?")
            .bind(&data.username)
            .bind(&data.email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(RepoError::Conflict(format!(
            "Username or email already registered: {}",
            data.username
        )));
    }

    let password_hash = User::hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let user_id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO users (user_id, username, password_hash, role, first_name, last_name, email, phone, address, registered_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&data.username)
    .bind(&password_hash)
    .bind(data.role)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::info!(user_id, username = %data.username, role = data.role.as_str(), "user created");

    find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Verify login credentials. Returns `None` for an unknown username or a
/// password mismatch; both cases are logged but not distinguished to the
/// caller.
pub async fn verify_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RepoResult<Option<User>> {
    let Some(user) = find_by_username(pool, username).await? else {
        tracing::warn!(username, "login failed: unknown user");
        return Ok(None);
    };

    let ok = user
        .verify_password(password)
        .map_err(|e| RepoError::Database(format!("Password verification failed: {e}")))?;
    if ok {
        tracing::info!(username, "login successful");
        Ok(Some(user))
    } else {
        tracing::warn!(username, "login failed: password mismatch");
        Ok(None)
    }
}

/// User counts for the admin dashboard.
pub async fn stats(pool: &SqlitePool) -> RepoResult<UserStats> {
    let count_role = |role: &'static str| {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?").bind(role)
    };

    let total_customers = count_role("customer").fetch_one(pool).await?;
    let total_employees = count_role("employee").fetch_one(pool).await?;
    let total_managers = count_role("manager").fetch_one(pool).await?;

    let now = chrono::Utc::now();
    let month_start = {
        use chrono::{Datelike, TimeZone};
        chrono::Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .map(|d| d.timestamp_millis())
            .unwrap_or(0)
    };
    let new_this_month =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE registered_at >= ?")
            .bind(month_start)
            .fetch_one(pool)
            .await?;

    Ok(UserStats {
        total_customers,
        total_employees,
        total_managers,
        new_this_month,
    })
}

/// Seed the default accounts for a fresh database. Safe to call on every
/// startup; existing usernames are left untouched.
pub async fn seed_defaults(pool: &SqlitePool) -> RepoResult<()> {
    let defaults = [
        ("john_customer", "password123", Role::Customer, "John", "Doe", "john@example.com"),
        ("jane_employee", "password123", Role::Employee, "Jane", "Smith", "jane@example.com"),
        ("bob_manager", "password123", Role::Manager, "Bob", "Johnson", "bob@example.com"),
        ("admin", "admin123", Role::Owner, "Admin", "User", "admin@example.com"),
    ];

    for (username, password, role, first, last, email) in defaults {
        if find_by_username(pool, username).await?.is_some() {
            continue;
        }
        create(
            pool,
            UserCreate {
                username: username.into(),
                password: password.into(),
                role,
                first_name: first.into(),
                last_name: last.into(),
                email: email.into(),
                phone: None,
                address: None,
            },
        )
        .await?;
    }
    Ok(())
}

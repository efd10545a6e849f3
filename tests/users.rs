//! User accounts: creation, credential checks, seeding, and dashboard
//! stats.

mod common;

use common::setup;
use jsfoods_store::db::models::{Role, UserCreate};
use jsfoods_store::db::repository::{RepoError, user};

fn payload(username: &str, email: &str, role: Role) -> UserCreate {
    UserCreate {
        username: username.into(),
        password: "hunter2hunter2".into(),
        role,
        first_name: "Pat".into(),
        last_name: "Tester".into(),
        email: email.into(),
        phone: Some("0400000000".into()),
        address: None,
    }
}

#[tokio::test]
async fn create_and_verify_credentials() {
    let (db, _dir) = setup().await;
    let pool = db.pool();

    let created = user::create(pool, payload("pat", "pat@example.com", Role::Customer))
        .await
        .unwrap();
    assert_eq!(created.role, Role::Customer);
    assert_ne!(created.password_hash, "hunter2hunter2"); // stored hashed

    let verified = user::verify_credentials(pool, "pat", "hunter2hunter2")
        .await
        .unwrap();
    assert_eq!(verified.unwrap().user_id, created.user_id);

    assert!(
        user::verify_credentials(pool, "pat", "wrong")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        user::verify_credentials(pool, "nobody", "hunter2hunter2")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() {
    let (db, _dir) = setup().await;
    let pool = db.pool();

    user::create(pool, payload("dup", "dup@example.com", Role::Customer))
        .await
        .unwrap();

    let err = user::create(pool, payload("dup", "fresh@example.com", Role::Customer))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let err = user::create(pool, payload("fresh", "dup@example.com", Role::Customer))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let (db, _dir) = setup().await;
    let pool = db.pool();

    let mut no_name = payload("", "a@example.com", Role::Customer);
    no_name.username = "".into();
    assert!(matches!(
        user::create(pool, no_name).await.unwrap_err(),
        RepoError::Validation(_)
    ));

    let bad_email = payload("someone", "not-an-email", Role::Customer);
    assert!(matches!(
        user::create(pool, bad_email).await.unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[tokio::test]
async fn seeding_is_idempotent_and_admin_can_log_in() {
    let (db, _dir) = setup().await;
    let pool = db.pool();

    user::seed_defaults(pool).await.unwrap();
    user::seed_defaults(pool).await.unwrap();

    let all = user::list(pool, None).await.unwrap();
    assert_eq!(all.len(), 4);

    let admin = user::verify_credentials(pool, "admin", "admin123")
        .await
        .unwrap()
        .expect("admin seeded");
    assert_eq!(admin.role, Role::Owner);
}

#[tokio::test]
async fn stats_count_roles_and_recent_signups() {
    let (db, _dir) = setup().await;
    let pool = db.pool();

    for (name, role) in [
        ("c1", Role::Customer),
        ("c2", Role::Customer),
        ("e1", Role::Employee),
        ("m1", Role::Manager),
    ] {
        user::create(pool, payload(name, &format!("{name}@example.com"), role))
            .await
            .unwrap();
    }

    let stats = user::stats(pool).await.unwrap();
    assert_eq!(stats.total_customers, 2);
    assert_eq!(stats.total_employees, 1);
    assert_eq!(stats.total_managers, 1);
    // Everyone registered just now, within the current month.
    assert_eq!(stats.new_this_month, 4);
}

#[tokio::test]
async fn list_filters_by_role() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    user::seed_defaults(pool).await.unwrap();

    let customers = user::list(pool, Some(Role::Customer)).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].username, "john_customer");
}

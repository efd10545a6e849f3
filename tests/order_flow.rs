//! End-to-end order placement: pricing, stock deduction, atomic rollback,
//! and the status lifecycle.

mod common;

use common::{approx_eq, count, create_customer, create_product, setup, stock_of};
use jsfoods_store::db::models::{Category, OrderInfo, OrderItemInput, OrderStatus};
use jsfoods_store::db::repository::{RepoError, stock};
use jsfoods_store::orders::OrderManager;

fn line(product_id: i64, quantity_kg: f64, unit_price: f64) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity_kg,
        unit_price,
    }
}

#[tokio::test]
async fn sixty_kilos_of_beef_with_bulk_discount() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "beef_buyer").await;
    let product = create_product(pool, customer, "Ribeye", Category::Beef, 10.0, 100.0).await;
    common::add_rule(pool, 50.0, 10.0).await;

    let manager = OrderManager::new(pool.clone());
    let order_id = manager
        .place_order(customer, OrderInfo::default(), &[line(product, 60.0, 10.0)])
        .await
        .unwrap();

    let (header, items) = manager.get_order(order_id).await.unwrap();
    assert_eq!(header.status, OrderStatus::Pending);
    assert!(approx_eq(header.total_amount, 540.0));
    assert_eq!(items.len(), 1);
    assert!(approx_eq(items[0].discount_percent, 10.0));
    assert!(approx_eq(items[0].final_price, 540.0));
    assert_eq!(items[0].product_name, "Ribeye");

    assert!(approx_eq(stock_of(pool, product).await, 40.0));

    // Newest ledger entry is the order deduction.
    let history = stock::history(pool, product, 10).await.unwrap();
    assert_eq!(history.len(), 2); // initial stock + order
    assert!(approx_eq(history[0].change_amount, -60.0));
    assert!(approx_eq(history[0].new_stock, 40.0));
    assert_eq!(history[0].reason, format!("Order #{order_id}"));
    assert_eq!(history[0].logged_by, customer);
}

#[tokio::test]
async fn total_is_the_sum_of_line_prices() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "mixed_buyer").await;
    let beef = create_product(pool, customer, "Chuck", Category::Beef, 8.5, 500.0).await;
    let pork = create_product(pool, customer, "Belly", Category::Pork, 6.25, 500.0).await;
    common::add_rule(pool, 100.0, 7.5).await;

    let manager = OrderManager::new(pool.clone());
    let order_id = manager
        .place_order(
            customer,
            OrderInfo {
                delivery_address: Some("Dock 4".into()),
                ..Default::default()
            },
            &[line(beef, 120.0, 8.5), line(pork, 30.0, 6.25)],
        )
        .await
        .unwrap();

    let (header, items) = manager.get_order(order_id).await.unwrap();
    assert_eq!(items.len(), 2);

    let mut expected_total = 0.0;
    for item in &items {
        let expected =
            item.quantity_kg * item.unit_price * (1.0 - item.discount_percent / 100.0);
        assert!(approx_eq(item.final_price, expected));
        expected_total += expected;
    }
    assert!(approx_eq(header.total_amount, expected_total));

    // Only the 120kg line crosses the 100kg threshold.
    assert!(approx_eq(items[0].discount_percent, 7.5));
    assert!(approx_eq(items[1].discount_percent, 0.0));
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "empty_cart").await;

    let manager = OrderManager::new(pool.clone());
    let err = manager
        .place_order(customer, OrderInfo::default(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "zero_qty").await;
    let product = create_product(pool, customer, "Mince", Category::Beef, 9.0, 50.0).await;

    let manager = OrderManager::new(pool.clone());
    for qty in [0.0, -5.0] {
        let err = manager
            .place_order(customer, OrderInfo::default(), &[line(product, qty, 9.0)])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
    assert!(approx_eq(stock_of(pool, product).await, 50.0));
}

#[tokio::test]
async fn missing_product_rolls_back_the_whole_order() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "rollback_missing").await;
    let a = create_product(pool, customer, "Shoulder", Category::Lamb, 12.0, 80.0).await;
    let b = create_product(pool, customer, "Leg", Category::Lamb, 14.0, 80.0).await;

    let manager = OrderManager::new(pool.clone());
    let err = manager
        .place_order(
            customer,
            OrderInfo::default(),
            &[line(a, 10.0, 12.0), line(b, 10.0, 14.0), line(999_999, 5.0, 1.0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_items").await, 0);
    assert!(approx_eq(stock_of(pool, a).await, 80.0));
    assert!(approx_eq(stock_of(pool, b).await, 80.0));
    // Only the two initial-stock entries exist.
    assert_eq!(count(pool, "inventory_log").await, 2);
}

#[tokio::test]
async fn insufficient_stock_on_a_later_line_rolls_back_earlier_lines() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "rollback_stock").await;
    let a = create_product(pool, customer, "Wings", Category::Poultry, 4.0, 200.0).await;
    let b = create_product(pool, customer, "Thighs", Category::Poultry, 5.0, 200.0).await;
    let scarce = create_product(pool, customer, "Breast", Category::Poultry, 7.0, 10.0).await;

    let manager = OrderManager::new(pool.clone());
    let err = manager
        .place_order(
            customer,
            OrderInfo::default(),
            &[
                line(a, 50.0, 4.0),
                line(b, 50.0, 5.0),
                line(scarce, 25.0, 7.0), // only 10kg available
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    // The header and the first two lines were written inside the
    // transaction before the conflict; none of it may survive.
    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_items").await, 0);
    assert!(approx_eq(stock_of(pool, a).await, 200.0));
    assert!(approx_eq(stock_of(pool, b).await, 200.0));
    assert!(approx_eq(stock_of(pool, scarce).await, 10.0));
    assert_eq!(count(pool, "inventory_log").await, 3);
}

#[tokio::test]
async fn deactivated_product_cannot_be_ordered() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "inactive_buyer").await;
    let product = create_product(pool, customer, "Offal", Category::Other, 2.0, 30.0).await;
    jsfoods_store::db::repository::product::deactivate(pool, product)
        .await
        .unwrap();

    let manager = OrderManager::new(pool.clone());
    let err = manager
        .place_order(customer, OrderInfo::default(), &[line(product, 5.0, 2.0)])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    assert!(approx_eq(stock_of(pool, product).await, 30.0));
}

#[tokio::test]
async fn status_walks_the_lifecycle_and_stops_at_terminal() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "lifecycle").await;
    let product = create_product(pool, customer, "Loin", Category::Pork, 9.0, 100.0).await;

    let manager = OrderManager::new(pool.clone());
    let order_id = manager
        .place_order(customer, OrderInfo::default(), &[line(product, 20.0, 9.0)])
        .await
        .unwrap();

    // Skipping a stage is rejected.
    let err = manager
        .update_status(order_id, OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ] {
        let order = manager.update_status(order_id, next).await.unwrap();
        assert_eq!(order.status, next);
    }

    let err = manager
        .update_status(order_id, OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn racing_status_updates_let_exactly_one_win() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "racer").await;
    let product = create_product(pool, customer, "Fillet", Category::Beef, 15.0, 100.0).await;

    let manager = OrderManager::new(pool.clone());
    let order_id = manager
        .place_order(customer, OrderInfo::default(), &[line(product, 10.0, 15.0)])
        .await
        .unwrap();
    for next in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Ready,
    ] {
        manager.update_status(order_id, next).await.unwrap();
    }

    // Deliver and cancel race from the same Ready state; the status write
    // is guarded, so exactly one lands and the loser conflicts.
    let deliverer = manager.clone();
    let canceller = manager.clone();
    let (delivered, cancelled) = tokio::join!(
        deliverer.update_status(order_id, OrderStatus::Delivered),
        canceller.update_status(order_id, OrderStatus::Cancelled),
    );

    assert_eq!(delivered.is_ok() as u8 + cancelled.is_ok() as u8, 1);
    let loser = if delivered.is_ok() {
        cancelled.unwrap_err()
    } else {
        delivered.unwrap_err()
    };
    assert!(matches!(loser, RepoError::Conflict(_)));

    let (header, _) = manager.get_order(order_id).await.unwrap();
    assert!(header.status.is_terminal());
}

#[tokio::test]
async fn cancelling_does_not_restock() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "canceller").await;
    let product = create_product(pool, customer, "Drumsticks", Category::Poultry, 3.5, 60.0).await;

    let manager = OrderManager::new(pool.clone());
    let order_id = manager
        .place_order(customer, OrderInfo::default(), &[line(product, 15.0, 3.5)])
        .await
        .unwrap();
    assert!(approx_eq(stock_of(pool, product).await, 45.0));

    let order = manager
        .update_status(order_id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    // Returns are booked as explicit ledger adjustments, not implicitly.
    assert!(approx_eq(stock_of(pool, product).await, 45.0));
}

#[tokio::test]
async fn customer_order_listing_counts_lines() {
    let (db, _dir) = setup().await;
    let pool = db.pool();
    let customer = create_customer(pool, "lister").await;
    let other = create_customer(pool, "other_lister").await;
    let a = create_product(pool, customer, "Brisket", Category::Beef, 11.0, 300.0).await;
    let b = create_product(pool, customer, "Shank", Category::Beef, 7.0, 300.0).await;

    let manager = OrderManager::new(pool.clone());
    manager
        .place_order(
            customer,
            OrderInfo::default(),
            &[line(a, 5.0, 11.0), line(b, 5.0, 7.0)],
        )
        .await
        .unwrap();
    manager
        .place_order(other, OrderInfo::default(), &[line(a, 2.0, 11.0)])
        .await
        .unwrap();

    let mine = manager.orders_for_customer(customer, 50).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].item_count, 2);

    let theirs = manager.orders_for_customer(other, 50).await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].item_count, 1);
}

//! End-to-end checkout flows against the in-memory stores.

use std::time::Duration;

use canteen_core::MealId;
use canteen_integration_tests::{MemoryStore, SlowOrders, amount, meal, unique_user};
use canteen_server::checkout::{Cart, CartLine, Checkout, CheckoutError, CheckoutSession, PaymentMethod};

fn cart(lines: &[(i32, u32)]) -> Cart {
    Cart::from_lines(lines.iter().map(|&(id, quantity)| CartLine {
        meal_id: MealId::new(id),
        quantity,
    }))
    .expect("valid cart")
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.put_meal(meal(1, "Masala Dosa", 4000, 10));
    store.put_meal(meal(2, "Samosa", 1500, 5));
    store
}

#[tokio::test]
async fn test_wallet_checkout_debits_and_commits() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 2), (2, 1)]));

    let summary = checkout.review(&mut session).await.expect("review");
    assert_eq!(summary.total, amount(9500));
    assert_eq!(summary.balance, amount(20_000));

    let receipt = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect("payment");
    assert_eq!(receipt.total, amount(9500));
    assert_eq!(receipt.balance, Some(amount(10_500)));

    assert_eq!(store.balance_of(&user), amount(10_500));
    assert_eq!(store.stock_of(MealId::new(1)), 8);
    assert_eq!(store.stock_of(MealId::new(2)), 4);
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_two_plates_worked_example() {
    let store = MemoryStore::new();
    store.put_meal(meal(1, "Veg Thali", 5000, 5));
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 2)]));
    checkout.review(&mut session).await.expect("review");
    checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect("payment");

    assert_eq!(store.balance_of(&user), amount(10_000));
    assert_eq!(store.stock_of(MealId::new(1)), 3);

    // Same cart, but a wallet that cannot cover it: nothing moves.
    let poor = unique_user();
    store.put_balance(&poor, amount(5000));
    let mut session = CheckoutSession::new(poor.clone(), cart(&[(1, 2)]));
    checkout.review(&mut session).await.expect("review");
    let err = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect_err("short wallet");
    assert!(matches!(err, CheckoutError::InsufficientFunds { .. }));
    assert_eq!(store.balance_of(&poor), amount(5000));
    assert_eq!(store.stock_of(MealId::new(1)), 3);
}

#[tokio::test]
async fn test_order_history_lists_committed_order() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 1)]));
    checkout.review(&mut session).await.expect("review");
    let receipt = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect("payment");

    let ids = canteen_server::checkout::OrderStore::ids_for_user(&store, &user)
        .await
        .expect("history");
    assert_eq!(ids, vec![receipt.order_id]);
}

#[tokio::test]
async fn test_insufficient_funds_writes_nothing() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(1000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 1)]));
    checkout.review(&mut session).await.expect("review");

    let err = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect_err("short wallet must be rejected");
    match err {
        CheckoutError::InsufficientFunds { balance, total } => {
            assert_eq!(balance, amount(1000));
            assert_eq!(total, amount(4000));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(store.balance_of(&user), amount(1000));
    assert_eq!(store.stock_of(MealId::new(1)), 10);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_upi_checkout_skips_wallet() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(500));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 1)]));
    checkout.review(&mut session).await.expect("review");

    let receipt = checkout
        .pay(&mut session, PaymentMethod::Upi)
        .await
        .expect("upi payment ignores the wallet");
    assert_eq!(receipt.balance, None);

    // Wallet untouched; stock and orders committed as usual.
    assert_eq!(store.balance_of(&user), amount(500));
    assert_eq!(store.stock_of(MealId::new(1)), 9);
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_failed_commit_refunds_wallet() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 2)]));
    checkout.review(&mut session).await.expect("review");

    store.fail_commits(true);
    let err = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect_err("injected commit failure");
    assert!(matches!(err, CheckoutError::Persistence(_)));

    // The debit was reversed and no stock moved.
    assert_eq!(store.balance_of(&user), amount(20_000));
    assert_eq!(store.stock_of(MealId::new(1)), 10);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_commit_timeout_refunds_wallet() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let slow = SlowOrders::new(store.clone(), Duration::from_secs(60));
    let checkout = Checkout::new(store.clone(), store.clone(), slow)
        .with_timeout(Duration::from_millis(50));
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 1)]));
    checkout.review(&mut session).await.expect("review");

    let err = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect_err("stalled order store must time out");
    assert!(matches!(err, CheckoutError::Timeout));

    assert_eq!(store.balance_of(&user), amount(20_000));
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_unknown_meal_rejected_at_review() {
    let store = seeded_store();
    let user = unique_user();

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user, cart(&[(99, 1)]));

    let err = checkout
        .review(&mut session)
        .await
        .expect_err("unknown meal must fail review");
    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_price_snapshot_taken_at_commit() {
    let store = seeded_store();
    let user = unique_user();
    store.put_balance(&user, amount(20_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());
    let mut session = CheckoutSession::new(user.clone(), cart(&[(1, 1)]));
    let summary = checkout.review(&mut session).await.expect("review");
    assert_eq!(summary.total, amount(4000));

    // Price changes between review and payment; the commit charges the
    // current price, not the reviewed one.
    store.put_meal(meal(1, "Masala Dosa", 5000, 10));
    let receipt = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect("payment");
    assert_eq!(receipt.total, amount(5000));
    assert_eq!(store.balance_of(&user), amount(15_000));
}

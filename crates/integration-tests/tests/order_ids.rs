//! Order id uniqueness under collisions and retry exhaustion.

use std::collections::HashSet;

use canteen_core::{MealId, OrderId};
use canteen_integration_tests::{
    FixedGenerator, MemoryStore, ScriptedGenerator, amount, meal, unique_user,
};
use canteen_server::checkout::{
    Cart, CartLine, Checkout, CheckoutError, CheckoutSession, PaymentMethod,
};

fn single_meal_cart() -> Cart {
    Cart::from_lines([CartLine {
        meal_id: MealId::new(1),
        quantity: 1,
    }])
    .expect("valid cart")
}

#[tokio::test]
async fn test_sequential_checkouts_get_distinct_ids() {
    let store = MemoryStore::new();
    store.put_meal(meal(1, "Samosa", 1500, 100));
    let user = unique_user();
    store.put_balance(&user, amount(1_000_000));

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone());

    let mut ids = HashSet::new();
    for _ in 0..20 {
        let mut session = CheckoutSession::new(user.clone(), single_meal_cart());
        checkout.review(&mut session).await.expect("review");
        let receipt = checkout
            .pay(&mut session, PaymentMethod::Wallet)
            .await
            .expect("payment");
        assert!(ids.insert(receipt.order_id), "duplicate id issued");
    }
    assert_eq!(store.order_count(), 20);
}

#[tokio::test]
async fn test_collision_triggers_exactly_one_regeneration() {
    let store = MemoryStore::new();
    store.put_meal(meal(1, "Samosa", 1500, 10));
    let user = unique_user();
    store.put_balance(&user, amount(10_000));

    let taken = OrderId::parse("0000aa").expect("valid");
    let fresh = OrderId::parse("0000bb").expect("valid");
    store.put_order(taken, &unique_user());

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone())
        .with_generator(ScriptedGenerator::new([taken, fresh]));
    let mut session = CheckoutSession::new(user, single_meal_cart());
    checkout.review(&mut session).await.expect("review");

    let receipt = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect("payment");
    assert_eq!(receipt.order_id, fresh);
}

#[tokio::test]
async fn test_retry_exhaustion_fails_and_refunds() {
    let store = MemoryStore::new();
    store.put_meal(meal(1, "Samosa", 1500, 10));
    let user = unique_user();
    store.put_balance(&user, amount(10_000));

    // Every candidate collides with an already-issued id.
    let stuck = OrderId::parse("deadbe").expect("valid");
    store.put_order(stuck, &unique_user());

    let checkout = Checkout::new(store.clone(), store.clone(), store.clone())
        .with_generator(FixedGenerator(stuck));
    let mut session = CheckoutSession::new(user.clone(), single_meal_cart());
    checkout.review(&mut session).await.expect("review");

    let err = checkout
        .pay(&mut session, PaymentMethod::Wallet)
        .await
        .expect_err("exhausted id retries must fail");
    assert!(matches!(err, CheckoutError::Persistence(_)));

    // The debit was reversed; only the pre-registered order remains.
    assert_eq!(store.balance_of(&user), amount(10_000));
    assert_eq!(store.order_count(), 1);
}

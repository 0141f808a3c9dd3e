//! Wallet ledger semantics.

use canteen_integration_tests::{MemoryStore, amount, unique_user};
use canteen_server::checkout::{DebitOutcome, WalletStore};

#[tokio::test]
async fn test_unknown_wallet_reads_as_zero() {
    let store = MemoryStore::new();
    let user = unique_user();
    let balance = store.balance(&user).await.expect("balance");
    assert!(balance.is_zero());
}

#[tokio::test]
async fn test_credit_creates_wallet() {
    let store = MemoryStore::new();
    let user = unique_user();

    let balance = store.credit(&user, amount(5000)).await.expect("credit");
    assert_eq!(balance, amount(5000));

    let balance = store.credit(&user, amount(2500)).await.expect("credit");
    assert_eq!(balance, amount(7500));
}

#[tokio::test]
async fn test_debit_applies_when_covered() {
    let store = MemoryStore::new();
    let user = unique_user();
    store.put_balance(&user, amount(5000));

    let outcome = store.debit(&user, amount(3000)).await.expect("debit");
    assert_eq!(
        outcome,
        DebitOutcome::Applied {
            new_balance: amount(2000)
        }
    );
    assert_eq!(store.balance_of(&user), amount(2000));
}

#[tokio::test]
async fn test_debit_exact_balance_to_zero() {
    let store = MemoryStore::new();
    let user = unique_user();
    store.put_balance(&user, amount(3000));

    let outcome = store.debit(&user, amount(3000)).await.expect("debit");
    assert_eq!(
        outcome,
        DebitOutcome::Applied {
            new_balance: amount(0)
        }
    );
}

#[tokio::test]
async fn test_short_debit_leaves_balance_untouched() {
    let store = MemoryStore::new();
    let user = unique_user();
    store.put_balance(&user, amount(1000));

    let outcome = store.debit(&user, amount(3000)).await.expect("debit");
    assert_eq!(
        outcome,
        DebitOutcome::Insufficient {
            balance: amount(1000)
        }
    );
    assert_eq!(store.balance_of(&user), amount(1000));
}

//! SurrealStore against a throwaway RocksDB directory
//! Run: cargo test -p pos-server --test surreal_store -- --nocapture

use pos_server::db::{BillStore, RepoError, ShiftStore, SurrealStore, TimeRange};
use shared::models::{Bill, CartItem, Shift, ShiftStatus};

fn bill(id: i64, invoice: &str, total: f64, created_at: i64, shift_id: Option<i64>) -> Bill {
    Bill {
        id,
        invoice_number: invoice.into(),
        cashier_name: "Ana".into(),
        customer_name: None,
        customer_number: Some("0917".into()),
        payment_mode: Some("cash".into()),
        cart_items: vec![CartItem {
            item: "Rice".into(),
            qty: 2,
            price: total / 2.0,
        }],
        sub_total: total,
        vat_sales: 0.0,
        vat_amount: 0.0,
        cash: total,
        change: 0.0,
        total_amount: total,
        discount: 0.0,
        is_senior_or_pwd: false,
        shift_id,
        voided: false,
        voided_at: None,
        created_at,
    }
}

fn shift(id: i64, cashier: &str, start_time: i64) -> Shift {
    Shift {
        id,
        cashier_id: None,
        cashier_name: cashier.into(),
        status: ShiftStatus::Open,
        start_time,
        end_time: None,
        starting_cash: 500.0,
        ending_cash: None,
        note: None,
        created_at: start_time,
        updated_at: start_time,
    }
}

#[tokio::test]
async fn bills_round_trip_through_rocksdb() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SurrealStore::open(tmp.path().join("database").join("pos.db"))
        .await
        .unwrap();

    for (i, total) in [100.0, 250.5, 75.25].into_iter().enumerate() {
        let i = i as i64;
        BillStore::insert(&store, bill(10 + i, &format!("INV-00{i}"), total, 1_000 * (i + 1), Some(7)))
            .await
            .unwrap();
    }

    let found = store.find_by_invoice("INV-001").await.unwrap().unwrap();
    assert_eq!(found.id, 11);
    assert_eq!(found.total_amount, 250.5);
    assert_eq!(found.cart_items.len(), 1);
    assert_eq!(found.customer_number.as_deref(), Some("0917"));
    assert!(store.find_by_invoice("INV-999").await.unwrap().is_none());

    let dup = BillStore::insert(&store, bill(99, "INV-000", 1.0, 5_000, None)).await;
    assert!(matches!(dup, Err(RepoError::Duplicate(_))));

    // half-open excludes the end, inclusive keeps it
    let half = BillStore::find_in_range(&store, TimeRange::half_open(1_000, 3_000)).await.unwrap();
    assert_eq!(half.iter().map(|b| b.id).collect::<Vec<_>>(), vec![10, 11]);
    let inclusive = BillStore::find_in_range(&store, TimeRange::inclusive(1_000, 3_000)).await.unwrap();
    assert_eq!(inclusive.len(), 3);

    assert_eq!(store.find_by_shift(7).await.unwrap().len(), 3);

    let newest = BillStore::list(&store, 2, 0).await.unwrap();
    assert_eq!(newest.iter().map(|b| b.id).collect::<Vec<_>>(), vec![12, 11]);

    let mut voided = found.clone();
    voided.voided = true;
    voided.voided_at = Some(9_000);
    BillStore::update(&store, voided).await.unwrap();
    let reloaded = store.find_by_invoice("INV-001").await.unwrap().unwrap();
    assert!(reloaded.voided);
    assert_eq!(reloaded.voided_at, Some(9_000));

    let missing = BillStore::update(&store, bill(404, "INV-404", 1.0, 1, None)).await;
    assert!(matches!(missing, Err(RepoError::NotFound(_))));
}

#[tokio::test]
async fn shifts_round_trip_through_rocksdb() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SurrealStore::open(tmp.path().join("pos.db")).await.unwrap();

    ShiftStore::insert(&store, shift(1, "Ana", 1_000)).await.unwrap();
    ShiftStore::insert(&store, shift(2, "Ben", 2_000)).await.unwrap();

    let open = store.find_open_by_cashier("Ana").await.unwrap().unwrap();
    assert_eq!(open.id, 1);
    assert!(store.find_open_by_cashier("ana").await.unwrap().is_none());

    // one OPEN shift per cashier, enforced by the unique index
    let second = ShiftStore::insert(&store, shift(3, "Ana", 1_500)).await;
    assert!(matches!(second, Err(RepoError::Duplicate(_))));
    assert!(store.find_by_id(3).await.unwrap().is_none());

    let mut closed = open.clone();
    closed.status = ShiftStatus::Closed;
    closed.end_time = Some(5_000);
    closed.ending_cash = Some(1650.0);
    ShiftStore::update(&store, closed).await.unwrap();

    assert!(store.find_open_by_cashier("Ana").await.unwrap().is_none());

    // closing frees the cashier for a new OPEN shift
    ShiftStore::insert(&store, shift(5, "Ana", 6_000)).await.unwrap();
    let reloaded = store.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(reloaded.status, ShiftStatus::Closed);
    assert_eq!(reloaded.ending_cash, Some(1650.0));

    let in_range = ShiftStore::find_in_range(&store, TimeRange::half_open(0, 10_000))
        .await
        .unwrap();
    assert_eq!(in_range.iter().map(|s| s.id).collect::<Vec<_>>(), vec![5, 2, 1]);

    assert_eq!(ShiftStore::list(&store, 10, 1).await.unwrap().len(), 2);
    assert!(store.find_by_id(4).await.unwrap().is_none());
}

//! `invoice-counter` commands against a real database
//!
//! Requires Docker; run with `cargo test -p interface_cli -- --ignored`.

use infra_db::PostgresInvoiceNumberAllocator;
use interface_cli::CounterCommand;
use test_utils::database::create_isolated_test_database;
use test_utils::fixtures::date;

#[tokio::test]
#[ignore] // Requires Docker
async fn test_peek_next_seed() {
    let db = create_isolated_test_database().await.unwrap();
    let allocator = PostgresInvoiceNumberAllocator::new(db.pool().clone());
    let today = date(2024, 6, 1);

    let peek = CounterCommand::Peek { year: None };
    assert_eq!(peek.execute(&allocator, today).await.unwrap(), "2024: no invoices yet, next 1/2024");

    let next = CounterCommand::Next { year: None };
    assert_eq!(next.execute(&allocator, today).await.unwrap(), "1/2024");

    let seed = CounterCommand::Seed { year: 2024, last: 130 };
    assert_eq!(seed.execute(&allocator, today).await.unwrap(), "2024: last 130, next 131/2024");

    // seeding lower keeps the counter
    let lower = CounterCommand::Seed { year: 2024, last: 12 };
    assert_eq!(lower.execute(&allocator, today).await.unwrap(), "2024: last 130, next 131/2024");

    assert_eq!(next.execute(&allocator, today).await.unwrap(), "131/2024");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_resync_on_empty_year() {
    let db = create_isolated_test_database().await.unwrap();
    let allocator = PostgresInvoiceNumberAllocator::new(db.pool().clone());
    db.set_counter(2023, 17).await.unwrap();

    let resync = CounterCommand::Resync { year: Some(2023) };
    // no stored invoices, the counter stays where it is
    assert_eq!(
        resync.execute(&allocator, date(2024, 1, 2)).await.unwrap(),
        "2023: last 17, next 18/2023"
    );
}

//! PostgreSQL adapter tests
//!
//! Each test starts its own container, so these need Docker and are ignored
//! by default. Run with `cargo test -p infra_db -- --ignored`.

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::{InvoiceId, OperationMetadata};
use domain_invoicing::{
    InvoiceFilter, InvoiceNumberAllocator, InvoiceService, InvoiceStatus, InvoiceStore,
};
use infra_db::adapters::{PostgresInvoiceNumberAllocator, PostgresInvoiceStore};
use infra_db::repositories::ClientRepository;
use infra_db::DatabaseError;
use test_utils::assertions::assert_contiguous_from_one;
use test_utils::builders::InvoiceDraftBuilder;
use test_utils::database::{create_isolated_test_database, DatabaseTestAssertions};
use test_utils::fixtures::{date, sample_client, scenario_item_a, scenario_item_b};

mod counter_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore] // Requires Docker
    async fn test_concurrent_allocations_are_unique() {
        let db = create_isolated_test_database().await.unwrap();
        let allocator = Arc::new(PostgresInvoiceNumberAllocator::new(db.pool().clone()));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                tokio::spawn(async move { allocator.next_invoice_number(2024).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap());
        }

        assert_contiguous_from_one(&numbers);
        assert_eq!(allocator.current_counter(2024).await.unwrap(), 50);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_allocation_continues_from_stored_counter() {
        let db = create_isolated_test_database().await.unwrap();
        db.set_counter(2024, 5).await.unwrap();
        let allocator = PostgresInvoiceNumberAllocator::new(db.pool().clone());

        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 6);
        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 7);
        assert_eq!(allocator.next_invoice_number(2025).await.unwrap(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_seed_never_lowers_counter() {
        let db = create_isolated_test_database().await.unwrap();
        let allocator = PostgresInvoiceNumberAllocator::new(db.pool().clone());

        assert_eq!(allocator.seed_counter(2024, 40).await.unwrap(), 40);
        assert_eq!(allocator.seed_counter(2024, 10).await.unwrap(), 40);
        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 41);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_resync_follows_imported_invoices() {
        let db = create_isolated_test_database().await.unwrap();
        let client = sample_client();
        ClientRepository::new(db.pool().clone()).insert(&client).await.unwrap();

        let allocator = Arc::new(PostgresInvoiceNumberAllocator::new(db.pool().clone()));
        let service = InvoiceService::new(
            allocator.clone(),
            Arc::new(PostgresInvoiceStore::new(db.pool().clone())),
        );
        for _ in 0..3 {
            service
                .create_invoice(
                    InvoiceDraftBuilder::new().client(client.id).item(scenario_item_b()).build(),
                    2024,
                    OperationMetadata::default(),
                )
                .await
                .unwrap();
        }

        // counter lost, e.g. restored from a backup without it
        sqlx::query("DELETE FROM invoice_counters").execute(db.pool()).await.unwrap();
        assert_eq!(allocator.current_counter(2024).await.unwrap(), 0);

        assert_eq!(allocator.resync_counter(2024).await.unwrap(), 3);
        assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 4);
        assert_eq!(allocator.resync_counter(2025).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_negative_counter_rejected_by_schema() {
        let db = create_isolated_test_database().await.unwrap();
        let err = sqlx::query("INSERT INTO invoice_counters (year, last_number) VALUES (2024, -1)")
            .execute(db.pool())
            .await
            .unwrap_err();

        assert!(DatabaseError::from(err).is_constraint_violation());
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_closed_pool_fails_allocation() {
        let db = create_isolated_test_database().await.unwrap();
        let allocator = PostgresInvoiceNumberAllocator::new(db.pool().clone());
        db.pool().close().await;

        let err = allocator.next_invoice_number(2024).await.unwrap_err();
        assert!(err.is_allocation_failure());
    }
}

mod client_tests {
    use super::*;
    use domain_party::Client;

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_insert_get_and_search_clients() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = ClientRepository::new(db.pool().clone());
        let client = sample_client();
        repo.insert(&client).await.unwrap();
        repo.insert(&Client::new("Podrum Zupa", "109876543", "21098765")).await.unwrap();

        let loaded = repo.get(client.id).await.unwrap();
        assert_eq!(loaded.name, "Vinoteka Nis");
        assert_eq!(loaded.pib, "101234567");
        assert_eq!(loaded.mb, "20123456");

        let found = repo.search("vino").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, client.id);
        assert_eq!(repo.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_invalid_and_missing_clients() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = ClientRepository::new(db.pool().clone());

        let err = repo.insert(&Client::new("Bez PIB-a", "12", "20123456")).await.unwrap_err();
        assert!(err.is_constraint_violation());

        let err = repo.get(core_kernel::ClientId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

mod store_tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_create_and_load_invoice() {
        let db = create_isolated_test_database().await.unwrap();
        let client = sample_client();
        ClientRepository::new(db.pool().clone()).insert(&client).await.unwrap();

        let service = InvoiceService::new(
            Arc::new(PostgresInvoiceNumberAllocator::new(db.pool().clone())),
            Arc::new(PostgresInvoiceStore::new(db.pool().clone())),
        );
        let draft = InvoiceDraftBuilder::new()
            .client(client.id)
            .item(scenario_item_a())
            .item(scenario_item_b())
            .build();
        let invoice = service
            .create_invoice(draft, 2024, OperationMetadata::default())
            .await
            .unwrap();

        let record = service.get_invoice(invoice.id).await.unwrap();
        // created_at loses sub-microsecond precision in the database
        assert_eq!(record.invoice.number(), invoice.number());
        assert_eq!(record.invoice.header, invoice.header);
        assert_eq!(record.invoice.items(), invoice.items());
        assert_eq!(record.client_name.as_deref(), Some("Vinoteka Nis"));
        assert_eq!(record.invoice.calculate().display_totals().total, dec!(8276.00));
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_duplicate_number_is_a_conflict() {
        let db = create_isolated_test_database().await.unwrap();
        let client = sample_client();
        ClientRepository::new(db.pool().clone()).insert(&client).await.unwrap();

        let allocator = Arc::new(PostgresInvoiceNumberAllocator::new(db.pool().clone()));
        let store = PostgresInvoiceStore::new(db.pool().clone());
        let service = InvoiceService::new(allocator, Arc::new(store.clone()));

        let invoice = service
            .create_invoice(
                InvoiceDraftBuilder::new().client(client.id).item(scenario_item_b()).build(),
                2024,
                OperationMetadata::default(),
            )
            .await
            .unwrap();

        // same number under a new id
        let mut copy = invoice.clone();
        copy.id = InvoiceId::new();
        let err = store.insert_invoice(&copy).await.unwrap_err();
        assert!(matches!(err, core_kernel::PortError::Conflict { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_update_and_filter() {
        let db = create_isolated_test_database().await.unwrap();
        let client = sample_client();
        ClientRepository::new(db.pool().clone()).insert(&client).await.unwrap();

        let service = InvoiceService::new(
            Arc::new(PostgresInvoiceNumberAllocator::new(db.pool().clone())),
            Arc::new(PostgresInvoiceStore::new(db.pool().clone())),
        );

        for (issued, item) in [(date(2024, 1, 10), scenario_item_a()), (date(2024, 2, 10), scenario_item_b())] {
            service
                .create_invoice(
                    InvoiceDraftBuilder::new().client(client.id).issued(issued).item(item).build(),
                    2024,
                    OperationMetadata::default(),
                )
                .await
                .unwrap();
        }

        let all = service.list_invoices(&InvoiceFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].invoice.number().to_string(), "2/2024");

        let first = all[1].invoice.id;
        service.set_status(first, InvoiceStatus::Paid).await.unwrap();

        let paid = service
            .list_invoices(&InvoiceFilter::all().with_status(InvoiceStatus::Paid))
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].invoice.id, first);

        let february = service
            .list_invoices(&InvoiceFilter::all().issued_between(date(2024, 2, 1), date(2024, 2, 29)))
            .await
            .unwrap();
        assert_eq!(february.len(), 1);

        let by_number = service.list_invoices(&InvoiceFilter::search("1/2024")).await.unwrap();
        assert_eq!(by_number.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn test_clear_data() {
        let db = create_isolated_test_database().await.unwrap();
        db.set_counter(2024, 3).await.unwrap();
        db.clear_data().await.unwrap();

        let result = sqlx::query("DELETE FROM invoice_counters").execute(db.pool()).await.unwrap();
        result.assert_rows_affected(0);
    }
}

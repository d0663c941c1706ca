//! Invoice number allocation tests against the in-memory counter

use std::collections::HashSet;
use std::sync::Arc;

use domain_invoicing::adapters::InMemoryInvoiceNumberAllocator;
use domain_invoicing::{InvoiceNumber, InvoiceNumberAllocator, InvoiceNumberAllocatorExt, InvoicingError};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_are_distinct() {
    let allocator = Arc::new(InMemoryInvoiceNumberAllocator::new());

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let allocator = Arc::clone(&allocator);
            tokio::spawn(async move { allocator.next_invoice_number(2024).await })
        })
        .collect();

    let mut numbers = HashSet::new();
    for handle in handles {
        let number = handle.await.unwrap().unwrap();
        assert!(number >= 1);
        assert!(numbers.insert(number), "number {} handed out twice", number);
    }

    assert_eq!(numbers.len(), 100);
    assert_eq!(allocator.current(2024).await, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_racing_calls_from_five() {
    let allocator = Arc::new(InMemoryInvoiceNumberAllocator::with_counter(2024, 5));

    let a = {
        let allocator = Arc::clone(&allocator);
        tokio::spawn(async move { allocator.next_invoice_number(2024).await })
    };
    let b = {
        let allocator = Arc::clone(&allocator);
        tokio::spawn(async move { allocator.next_invoice_number(2024).await })
    };

    let mut results = vec![a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
    results.sort_unstable();
    assert_eq!(results, vec![6, 7]);
}

#[tokio::test]
async fn test_sequential_allocations_never_reuse() {
    let allocator = InMemoryInvoiceNumberAllocator::new();

    let mut previous = 0;
    for _ in 0..20 {
        let number = allocator.next_invoice_number(2024).await.unwrap();
        assert!(number > previous);
        previous = number;
    }
}

#[tokio::test]
async fn test_years_are_independent() {
    let allocator = InMemoryInvoiceNumberAllocator::new();

    assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 1);
    assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 2);
    assert_eq!(allocator.next_invoice_number(2025).await.unwrap(), 1);
    assert_eq!(allocator.next_invoice_number(2024).await.unwrap(), 3);
    assert_eq!(allocator.next_invoice_number(2025).await.unwrap(), 2);
    // backfilling an earlier year starts fresh too
    assert_eq!(allocator.next_invoice_number(2019).await.unwrap(), 1);
}

#[tokio::test]
async fn test_allocate_pairs_number_with_year() {
    let allocator = InMemoryInvoiceNumberAllocator::with_counter(2024, 5);

    let number = allocator.allocate(2024).await.unwrap();
    assert_eq!(number, InvoiceNumber::new(6, 2024).unwrap());
    assert_eq!(number.to_string(), "6/2024");
}

#[tokio::test]
async fn test_unavailable_store_reports_allocation_failed() {
    let allocator = InMemoryInvoiceNumberAllocator::new();
    allocator.set_available(false);

    let err = allocator.allocate(2024).await.unwrap_err();
    match err {
        InvoicingError::AllocationFailed { year, .. } => assert_eq!(year, 2024),
        other => panic!("expected AllocationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_allocator_behind_trait_object() {
    let allocator: Arc<dyn InvoiceNumberAllocator> = Arc::new(InMemoryInvoiceNumberAllocator::new());

    let first = allocator.allocate(2024).await.unwrap();
    let second = allocator.allocate(2024).await.unwrap();
    assert!(second > first);
}

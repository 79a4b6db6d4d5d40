//! Concurrency and listing tests for the in-memory store

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use futures::future::join_all;
use slotbook_core::environment::Clock;
use slotbook_core::query::ResourceQuery;
use slotbook_core::store::{BookingStore, ResourceStore, StoreError};
use slotbook_core::types::{Booking, BookingCode, BookingId, BookingStatus, ResourceId};
use slotbook_testing::{InMemoryStore, ResourceBuilder, date, test_clock};

fn booking(resource_id: ResourceId, customer: usize) -> Booking {
    let now = test_clock().now();
    Booking {
        id: BookingId::new(),
        booking_code: BookingCode::generate(now),
        resource_id,
        customer_name: format!("Customer {customer}"),
        customer_email: format!("customer{customer}@example.com"),
        customer_phone: "5551234567".to_string(),
        notes: String::new(),
        date: date("2025-01-02"),
        start_time: "09:00".to_string(),
        end_time: "10:00".to_string(),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reservations_commit_exactly_once() {
    let store = InMemoryStore::new();
    let resource = ResourceBuilder::new("Dr. Sarah Wilson")
        .slot(date("2025-01-02"), "09:00", "10:00")
        .build();
    let id = resource.id();
    store.insert_resource(resource).await.unwrap();

    let attempts = (0..32).map(|n| {
        let store = store.clone();
        tokio::spawn(async move { store.reserve_slot(booking(id, n)).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task should not panic"))
        .collect();

    let committed = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::Conflict)))
        .count();

    assert_eq!(committed, 1);
    assert_eq!(conflicts, 31);
    assert_eq!(store.booking_count().await, 1);
}

#[tokio::test]
async fn listing_sorts_by_rating_then_name_and_pages() {
    let store = InMemoryStore::new();
    for (name, rating) in [("Bravo", 4.5), ("Alpha", 4.5), ("Charlie", 4.9), ("Delta", 3.0)] {
        store
            .insert_resource(ResourceBuilder::new(name).rating(rating).build())
            .await
            .unwrap();
    }

    let first = store
        .list_resources(ResourceQuery::new(Some(1), Some(3), None, None, None))
        .await
        .unwrap();
    let names: Vec<_> = first.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Charlie", "Alpha", "Bravo"]);
    assert_eq!(first.pagination.total, 4);
    assert_eq!(first.pagination.pages, 2);

    let second = store
        .list_resources(ResourceQuery::new(Some(2), Some(3), None, None, None))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "Delta");
}

#[tokio::test]
async fn listing_filters_inactive_category_and_search() {
    let store = InMemoryStore::new();
    for resource in [
        ResourceBuilder::new("Central Library").category("Library").build(),
        ResourceBuilder::new("Code Wizards")
            .category("Technology")
            .bio("Cloud support")
            .build(),
        ResourceBuilder::new("Old Desk").category("Library").inactive().build(),
    ] {
        store.insert_resource(resource).await.unwrap();
    }

    let libraries = store
        .list_resources(ResourceQuery::new(None, None, None, Some("Library".into()), None))
        .await
        .unwrap();
    assert_eq!(libraries.pagination.total, 1);

    let search = store
        .list_resources(ResourceQuery::new(None, None, Some("cloud".into()), None, None))
        .await
        .unwrap();
    assert_eq!(search.items[0].name, "Code Wizards");

    let everything = store
        .list_resources(ResourceQuery::new(None, None, None, Some("all".into()), Some(false)))
        .await
        .unwrap();
    assert_eq!(everything.pagination.total, 3);
}

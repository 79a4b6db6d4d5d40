//! Property tests for catalog pagination.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use slotbook_core::query::ResourceQuery;
use slotbook_core::store::ResourceStore;
use slotbook_core::types::ResourceProfile;
use slotbook_server::CatalogService;
use slotbook_testing::{InMemoryStore, ResourceBuilder, test_clock};
use std::collections::HashSet;
use std::sync::Arc;

fn walk_all_pages(ratings: &[u8], limit: u32) -> (u64, Vec<ResourceProfile>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    runtime.block_on(async {
        let store = InMemoryStore::new();
        for (n, rating) in ratings.iter().enumerate() {
            // Few distinct names and ratings, so ties are common.
            let resource = ResourceBuilder::new(&format!("Resource {}", n % 3))
                .rating(f64::from(*rating) / 2.0)
                .build();
            store.insert_resource(resource).await.unwrap();
        }
        let catalog = CatalogService::new(
            Arc::new(store.clone()),
            Arc::new(store),
            Arc::new(test_clock()),
        );

        let first = catalog
            .list_resources(ResourceQuery::new(Some(1), Some(limit), None, None, None))
            .await
            .unwrap();
        let pages = first.pagination.pages;
        let mut items = first.items;
        for page in 2..=pages {
            let next = catalog
                .list_resources(ResourceQuery::new(
                    Some(u32::try_from(page).unwrap()),
                    Some(limit),
                    None,
                    None,
                    None,
                ))
                .await
                .unwrap();
            items.extend(next.items);
        }
        (pages, items)
    })
}

proptest! {
    #[test]
    fn pages_cover_every_resource_once_in_order(
        ratings in prop::collection::vec(0u8..=10, 0..40),
        limit in 1u32..12,
    ) {
        let (pages, items) = walk_all_pages(&ratings, limit);
        let n = ratings.len() as u64;

        prop_assert_eq!(pages, n.div_ceil(u64::from(limit)));
        prop_assert_eq!(items.len() as u64, n);

        let ids: HashSet<_> = items.iter().map(|r| r.id).collect();
        prop_assert_eq!(ids.len(), items.len());

        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.rating > b.rating || (a.rating == b.rating && a.name <= b.name),
                "{} ({}) listed before {} ({})",
                a.name, a.rating, b.name, b.rating
            );
        }
    }
}

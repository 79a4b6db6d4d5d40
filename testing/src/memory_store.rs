//! In-memory implementation of the resource and booking stores.
//!
//! One `tokio::sync::Mutex` guards both collections, so every operation
//! (including the reservation transaction) is atomic with respect to every
//! other operation on the same store.

use chrono::{DateTime, NaiveDate, Utc};
use slotbook_core::query::{Page, ResourceQuery};
use slotbook_core::store::{BookingStore, ResourceStore, StoreError, StoreFuture};
use slotbook_core::types::{
    Booking, BookingId, BookingStatus, CustomerBooking, Resource, ResourceContact, ResourceId,
    ResourceProfile,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

type SlotKey = (ResourceId, NaiveDate, String);

#[derive(Debug, Default)]
struct State {
    resources: HashMap<ResourceId, Resource>,
    bookings: Vec<Booking>,
    // Uniqueness index for (resource, date, start time)
    booked_slots: HashMap<SlotKey, BookingId>,
    booking_codes: HashSet<String>,
}

impl State {
    fn contact(&self, resource_id: ResourceId) -> Option<ResourceContact> {
        self.resources.get(&resource_id).map(|r| ResourceContact {
            id: r.profile.id,
            name: r.profile.name.clone(),
            category: r.profile.category.clone(),
            email: r.profile.email.clone(),
            phone: r.profile.phone.clone(),
        })
    }

    fn enrich(&self, booking: Booking) -> CustomerBooking {
        let resource = self.contact(booking.resource_id);
        CustomerBooking { booking, resource }
    }
}

/// In-memory store for fast, deterministic testing.
///
/// Implements both [`ResourceStore`] and [`BookingStore`] with the same
/// uniqueness guarantees as the `PostgreSQL` store. Clones share state.
///
/// # Example
///
/// ```
/// use slotbook_testing::{InMemoryStore, ResourceBuilder, date};
/// use slotbook_core::store::ResourceStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// let resource = ResourceBuilder::new("Central Library")
///     .slot(date("2025-01-02"), "09:00", "10:00")
///     .build();
/// let id = resource.id();
///
/// store.insert_resource(resource).await?;
/// assert!(store.find_resource(id).await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`StoreError::Unavailable`]
    /// (or succeed again when `false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Record a booking without flagging its slot.
    ///
    /// Simulates a reservation that committed after the caller read the
    /// resource, so the caller's pre-check still sees the slot as open.
    pub async fn seed_booking(&self, booking: Booking) {
        let mut state = self.state.lock().await;
        state.booked_slots.insert(
            (booking.resource_id, booking.date, booking.start_time.clone()),
            booking.id,
        );
        state
            .booking_codes
            .insert(booking.booking_code.as_str().to_string());
        state.bookings.push(booking);
    }

    /// All bookings, in insertion order
    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.clone()
    }

    /// Number of stored bookings
    pub async fn booking_count(&self) -> usize {
        self.state.lock().await.bookings.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl ResourceStore for InMemoryStore {
    fn find_resource(&self, id: ResourceId) -> StoreFuture<'_, Option<Resource>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.state.lock().await.resources.get(&id).cloned())
        })
    }

    fn list_resources(&self, query: ResourceQuery) -> StoreFuture<'_, Page<ResourceProfile>> {
        Box::pin(async move {
            self.check_available()?;
            let state = self.state.lock().await;

            let mut matching: Vec<&ResourceProfile> = state
                .resources
                .values()
                .map(|r| &r.profile)
                .filter(|p| query.matches(&p.name, &p.bio, &p.category, p.is_active))
                .collect();
            matching.sort_by(|a, b| {
                b.rating
                    .total_cmp(&a.rating)
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.id.cmp(&b.id))
            });

            let total = matching.len() as u64;
            let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
            let items = matching
                .into_iter()
                .skip(offset)
                .take(query.limit() as usize)
                .cloned()
                .collect();

            Ok(Page::new(items, &query, total))
        })
    }

    fn insert_resource(&self, resource: Resource) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.check_available()?;
            let mut state = self.state.lock().await;

            if state
                .resources
                .values()
                .any(|r| r.profile.email == resource.profile.email)
            {
                return Err(StoreError::Duplicate(resource.profile.email));
            }

            let mut seen = HashSet::new();
            for slot in &resource.time_slots {
                if !seen.insert((slot.date, slot.start_time.as_str())) {
                    return Err(StoreError::Database(format!(
                        "duplicate slot {} {}",
                        slot.date, slot.start_time
                    )));
                }
            }

            state.resources.insert(resource.id(), resource);
            Ok(())
        })
    }

    fn delete_resource(&self, id: ResourceId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.state.lock().await.resources.remove(&id).is_some())
        })
    }

    fn clear_resources(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            self.check_available()?;
            let mut state = self.state.lock().await;
            let removed = state.resources.len() as u64;
            state.resources.clear();
            Ok(removed)
        })
    }

    fn categories(&self) -> StoreFuture<'_, Vec<String>> {
        Box::pin(async move {
            self.check_available()?;
            let state = self.state.lock().await;
            let categories: BTreeSet<String> = state
                .resources
                .values()
                .filter(|r| r.profile.is_active)
                .map(|r| r.profile.category.clone())
                .collect();
            Ok(categories.into_iter().collect())
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.check_available() })
    }
}

impl BookingStore for InMemoryStore {
    fn reserve_slot(&self, booking: Booking) -> StoreFuture<'_, Booking> {
        Box::pin(async move {
            self.check_available()?;
            let mut state = self.state.lock().await;

            let key = (booking.resource_id, booking.date, booking.start_time.clone());
            if state.booked_slots.contains_key(&key) {
                return Err(StoreError::Conflict);
            }
            if state.booking_codes.contains(booking.booking_code.as_str()) {
                return Err(StoreError::Database(format!(
                    "duplicate booking code {}",
                    booking.booking_code
                )));
            }

            // Every check happens before the first write, so an error leaves
            // both collections untouched.
            let slot = state
                .resources
                .get_mut(&booking.resource_id)
                .and_then(|r| {
                    r.time_slots
                        .iter_mut()
                        .find(|s| s.is_at(booking.date, &booking.start_time) && !s.is_booked)
                })
                .ok_or_else(|| StoreError::SlotNotFound {
                    date: booking.date,
                    start_time: booking.start_time.clone(),
                })?;
            slot.is_booked = true;

            state.booked_slots.insert(key, booking.id);
            state
                .booking_codes
                .insert(booking.booking_code.as_str().to_string());
            state.bookings.push(booking.clone());
            Ok(booking)
        })
    }

    fn bookings_for_email(&self, email: String) -> StoreFuture<'_, Vec<CustomerBooking>> {
        Box::pin(async move {
            self.check_available()?;
            let state = self.state.lock().await;
            let email = email.to_lowercase();

            let mut bookings: Vec<Booking> = state
                .bookings
                .iter()
                .filter(|b| b.customer_email == email)
                .cloned()
                .collect();
            bookings.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });

            Ok(bookings.into_iter().map(|b| state.enrich(b)).collect())
        })
    }

    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<CustomerBooking>> {
        Box::pin(async move {
            self.check_available()?;
            let mut state = self.state.lock().await;

            let Some(booking) = state.bookings.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            booking.status = status;
            booking.updated_at = updated_at;
            let booking = booking.clone();

            Ok(Some(state.enrich(booking)))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fixtures::{ResourceBuilder, date};
    use crate::mocks::test_clock;
    use slotbook_core::environment::Clock;
    use slotbook_core::types::BookingCode;

    fn booking_for(resource_id: ResourceId, day: &str, start: &str, email: &str) -> Booking {
        let now = test_clock().now();
        Booking {
            id: BookingId::new(),
            booking_code: BookingCode::generate(now),
            resource_id,
            customer_name: "Ada Lovelace".to_string(),
            customer_email: email.to_string(),
            customer_phone: "5551234567".to_string(),
            notes: String::new(),
            date: date(day),
            start_time: start.to_string(),
            end_time: "10:00".to_string(),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn reserve_slot_flags_the_slot_and_stores_the_booking() {
        let store = InMemoryStore::new();
        let resource = ResourceBuilder::new("Dr. Sarah Wilson")
            .slot(date("2025-01-02"), "09:00", "10:00")
            .build();
        let id = resource.id();
        store.insert_resource(resource).await.unwrap();

        store
            .reserve_slot(booking_for(id, "2025-01-02", "09:00", "ada@example.com"))
            .await
            .unwrap();

        let resource = store.find_resource(id).await.unwrap().unwrap();
        assert!(resource.time_slots[0].is_booked);
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn second_reservation_for_the_same_slot_conflicts() {
        let store = InMemoryStore::new();
        let resource = ResourceBuilder::new("Dr. Sarah Wilson")
            .slot(date("2025-01-02"), "09:00", "10:00")
            .build();
        let id = resource.id();
        store.insert_resource(resource).await.unwrap();

        store
            .reserve_slot(booking_for(id, "2025-01-02", "09:00", "a@example.com"))
            .await
            .unwrap();
        let err = store
            .reserve_slot(booking_for(id, "2025-01-02", "09:00", "b@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict));
        assert_eq!(store.booking_count().await, 1);
    }

    #[tokio::test]
    async fn missing_slot_leaves_nothing_behind() {
        let store = InMemoryStore::new();
        let resource = ResourceBuilder::new("Dr. Sarah Wilson")
            .slot(date("2025-01-02"), "09:00", "10:00")
            .build();
        let id = resource.id();
        store.insert_resource(resource).await.unwrap();

        let err = store
            .reserve_slot(booking_for(id, "2025-01-02", "13:00", "a@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::SlotNotFound { .. }));
        assert_eq!(store.booking_count().await, 0);
        let resource = store.find_resource(id).await.unwrap().unwrap();
        assert!(!resource.time_slots[0].is_booked);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        store
            .insert_resource(ResourceBuilder::new("A").email("same@example.com").build())
            .await
            .unwrap();
        let err = store
            .insert_resource(ResourceBuilder::new("B").email("same@example.com").build())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(email) if email == "same@example.com"));
    }

    #[tokio::test]
    async fn bookings_survive_resource_deletion_without_contact() {
        let store = InMemoryStore::new();
        let resource = ResourceBuilder::new("Central Library")
            .slot(date("2025-01-02"), "09:00", "10:00")
            .build();
        let id = resource.id();
        store.insert_resource(resource).await.unwrap();
        store
            .reserve_slot(booking_for(id, "2025-01-02", "09:00", "ada@example.com"))
            .await
            .unwrap();

        assert!(store.delete_resource(id).await.unwrap());
        assert!(!store.delete_resource(id).await.unwrap());

        let bookings = store
            .bookings_for_email("ADA@example.com".to_string())
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
        assert!(bookings[0].resource.is_none());
    }

    #[tokio::test]
    async fn categories_are_distinct_sorted_and_active_only() {
        let store = InMemoryStore::new();
        for resource in [
            ResourceBuilder::new("A").category("Technology").build(),
            ResourceBuilder::new("B").category("Library").build(),
            ResourceBuilder::new("C").category("Technology").build(),
            ResourceBuilder::new("D").category("Closed").inactive().build(),
        ] {
            store.insert_resource(resource).await.unwrap();
        }

        assert_eq!(
            store.categories().await.unwrap(),
            vec!["Library".to_string(), "Technology".to_string()]
        );
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.find_resource(ResourceId::new()).await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}

//! Fixture builders for resources and reservation requests.

#![allow(clippy::missing_panics_doc)]

use crate::mocks::test_clock;
use chrono::NaiveDate;
use slotbook_core::environment::Clock;
use slotbook_core::types::{Resource, ResourceId, ResourceProfile, ResourceType, TimeSlot};
use slotbook_core::validation::ReservationRequest;

/// Parse a `YYYY-MM-DD` literal.
///
/// # Panics
///
/// Panics if `s` is not a valid date.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture dates are YYYY-MM-DD")
}

/// A valid reservation request for `resource_id` at `date` / `start_time`.
///
/// The end time is fixed at one hour after a `HH:00` start.
#[must_use]
pub fn reservation_request(resource_id: ResourceId, date: &str, start_time: &str) -> ReservationRequest {
    ReservationRequest {
        resource_id: Some(resource_id.to_string()),
        customer_name: Some("Ada Lovelace".to_string()),
        customer_email: Some("ada@example.com".to_string()),
        customer_phone: Some("5551234567".to_string()),
        date: Some(date.to_string()),
        start_time: Some(start_time.to_string()),
        end_time: Some(one_hour_after(start_time)),
        notes: None,
    }
}

fn one_hour_after(start_time: &str) -> String {
    start_time
        .split_once(':')
        .and_then(|(hour, minute)| Some((hour.parse::<u32>().ok()?, minute)))
        .map_or_else(
            || start_time.to_string(),
            |(hour, minute)| format!("{:02}:{minute}", (hour + 1) % 24),
        )
}

/// Fluent builder for [`Resource`] fixtures.
///
/// Defaults: category `Healthcare`, type `Person`, rating 4.0, active, a
/// unique email derived from the id, timestamps from [`test_clock`].
#[derive(Clone, Debug)]
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    /// Start a resource called `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let id = ResourceId::new();
        let now = test_clock().now();
        Self {
            resource: Resource {
                profile: ResourceProfile {
                    id,
                    name: name.to_string(),
                    category: "Healthcare".to_string(),
                    resource_type: ResourceType::Person,
                    company_name: "Independent".to_string(),
                    experience: 5,
                    rating: 4.0,
                    email: format!("resource-{id}@example.com"),
                    phone: "5550000000".to_string(),
                    bio: format!("{name} takes appointments"),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                },
                time_slots: Vec::new(),
            },
        }
    }

    /// Set the category label
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.resource.profile.category = category.to_string();
        self
    }

    /// Set the structured subtype
    #[must_use]
    pub const fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource.profile.resource_type = resource_type;
        self
    }

    /// Set the rating
    #[must_use]
    pub const fn rating(mut self, rating: f64) -> Self {
        self.resource.profile.rating = rating;
        self
    }

    /// Set the contact email
    #[must_use]
    pub fn email(mut self, email: &str) -> Self {
        self.resource.profile.email = email.to_string();
        self
    }

    /// Set the bio
    #[must_use]
    pub fn bio(mut self, bio: &str) -> Self {
        self.resource.profile.bio = bio.to_string();
        self
    }

    /// Mark the resource inactive
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.resource.profile.is_active = false;
        self
    }

    /// Append an open slot
    #[must_use]
    pub fn slot(mut self, date: NaiveDate, start_time: &str, end_time: &str) -> Self {
        self.resource
            .time_slots
            .push(TimeSlot::open(date, start_time, end_time));
        self
    }

    /// Append an already booked slot
    #[must_use]
    pub fn booked_slot(mut self, date: NaiveDate, start_time: &str, end_time: &str) -> Self {
        let mut slot = TimeSlot::open(date, start_time, end_time);
        slot.is_booked = true;
        self.resource.time_slots.push(slot);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Resource {
        self.resource
    }
}

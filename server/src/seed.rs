//! Sample catalog for development databases.

use chrono::{DateTime, Days, NaiveDate, Utc};
use slotbook_core::environment::Clock;
use slotbook_core::store::{ResourceStore, StoreError};
use slotbook_core::types::{Resource, ResourceId, ResourceProfile, ResourceType, TimeSlot};
use tracing::info;

/// Days of availability generated per resource, starting today.
pub const SEED_DAYS: u64 = 7;

/// Daily one-hour slots as (start, end).
pub const SEED_SLOTS: [(&str, &str); 4] = [
    ("09:00", "10:00"),
    ("11:00", "12:00"),
    ("14:00", "15:00"),
    ("16:00", "17:00"),
];

struct Sample {
    name: &'static str,
    category: &'static str,
    resource_type: ResourceType,
    company_name: &'static str,
    experience: u32,
    rating: f64,
    email: &'static str,
    phone: &'static str,
    bio: &'static str,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        name: "Dr. Sarah Smith",
        category: "Healthcare",
        resource_type: ResourceType::Person,
        company_name: "City Hospital",
        experience: 15,
        rating: 4.8,
        email: "doc@city.com",
        phone: "5550100001",
        bio: "General practitioner focused on preventive care.",
    },
    Sample {
        name: "Code Wizards",
        category: "Technology",
        resource_type: ResourceType::Service,
        company_name: "CodeWiz Inc",
        experience: 8,
        rating: 4.6,
        email: "code@wiz.com",
        phone: "5550100002",
        bio: "Tech support for laptops, phones and home networks.",
    },
    Sample {
        name: "Central Library",
        category: "Library",
        resource_type: ResourceType::Place,
        company_name: "Government",
        experience: 0,
        rating: 4.5,
        email: "lib@city.com",
        phone: "5550100003",
        bio: "Book a quiet study room.",
    },
    Sample {
        name: "Avengers: Secret Wars",
        category: "Movie",
        resource_type: ResourceType::Item,
        company_name: "CinemaPlus",
        experience: 0,
        rating: 4.2,
        email: "movies@cinema.com",
        phone: "5550100004",
        bio: "Reserve a theater seat.",
    },
    Sample {
        name: "Prof. Miller",
        category: "Consulting",
        resource_type: ResourceType::Person,
        company_name: "Independent",
        experience: 20,
        rating: 4.9,
        email: "miller@prof.com",
        phone: "5550100005",
        bio: "Career and study counseling.",
    },
];

/// The sample catalog, with slots for [`SEED_DAYS`] days from `today`.
#[must_use]
pub fn sample_resources(today: NaiveDate, now: DateTime<Utc>) -> Vec<Resource> {
    let slots: Vec<(NaiveDate, &str, &str)> = (0..SEED_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .flat_map(|date| SEED_SLOTS.iter().map(move |(start, end)| (date, *start, *end)))
        .collect();

    SAMPLES
        .iter()
        .map(|sample| Resource {
            profile: ResourceProfile {
                id: ResourceId::new(),
                name: sample.name.to_string(),
                category: sample.category.to_string(),
                resource_type: sample.resource_type,
                company_name: sample.company_name.to_string(),
                experience: sample.experience,
                rating: sample.rating,
                email: sample.email.to_string(),
                phone: sample.phone.to_string(),
                bio: sample.bio.to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            time_slots: slots
                .iter()
                .map(|(date, start, end)| TimeSlot::open(*date, *start, *end))
                .collect(),
        })
        .collect()
}

/// Replace every resource in `store` with the sample catalog.
///
/// Existing bookings are left alone.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn seed(store: &dyn ResourceStore, clock: &dyn Clock) -> Result<usize, StoreError> {
    let now = clock.now();
    let removed = store.clear_resources().await?;
    info!(removed, "Cleared existing resources");

    let resources = sample_resources(now.date_naive(), now);
    let count = resources.len();
    for resource in resources {
        info!(name = %resource.name(), slots = resource.time_slots.len(), "Inserting resource");
        store.insert_resource(resource).await?;
    }

    Ok(count)
}

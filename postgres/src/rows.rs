//! Row types and their conversion into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use slotbook_core::store::StoreError;
use slotbook_core::types::{
    Booking, BookingCode, BookingId, CustomerBooking, ResourceContact, ResourceId, ResourceProfile,
    SlotId, TimeSlot,
};
use uuid::Uuid;

/// Columns selected for a resource profile.
pub const RESOURCE_COLUMNS: &str = "id, name, category, resource_type, company_name, experience, \
     rating, email, phone, bio, is_active, created_at, updated_at";

/// Booking columns (aliased `b`) plus the joined resource contact (aliased `r`).
pub const CUSTOMER_BOOKING_COLUMNS: &str = "b.id, b.booking_code, b.resource_id, \
     b.customer_name, b.customer_email, b.customer_phone, b.notes, b.booking_date, \
     b.start_time, b.end_time, b.status, b.created_at, b.updated_at, \
     r.name AS resource_name, r.category AS resource_category, \
     r.email AS resource_email, r.phone AS resource_phone";

#[derive(sqlx::FromRow)]
pub struct ResourceRow {
    id: Uuid,
    name: String,
    category: String,
    resource_type: String,
    company_name: String,
    experience: i32,
    rating: f64,
    email: String,
    phone: String,
    bio: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ResourceRow> for ResourceProfile {
    type Error = StoreError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ResourceId::from_uuid(row.id),
            name: row.name,
            category: row.category,
            resource_type: row
                .resource_type
                .parse()
                .map_err(|e| StoreError::Database(format!("corrupt resource row: {e}")))?,
            company_name: row.company_name,
            experience: u32::try_from(row.experience)
                .map_err(|e| StoreError::Database(format!("corrupt resource row: {e}")))?,
            rating: row.rating,
            email: row.email,
            phone: row.phone,
            bio: row.bio,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct SlotRow {
    id: Uuid,
    slot_date: NaiveDate,
    start_time: String,
    end_time: String,
    is_booked: bool,
}

impl From<SlotRow> for TimeSlot {
    fn from(row: SlotRow) -> Self {
        Self {
            id: SlotId::from_uuid(row.id),
            date: row.slot_date,
            start_time: row.start_time,
            end_time: row.end_time,
            is_booked: row.is_booked,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct CustomerBookingRow {
    id: Uuid,
    booking_code: String,
    resource_id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    notes: String,
    booking_date: NaiveDate,
    start_time: String,
    end_time: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    resource_name: Option<String>,
    resource_category: Option<String>,
    resource_email: Option<String>,
    resource_phone: Option<String>,
}

impl TryFrom<CustomerBookingRow> for CustomerBooking {
    type Error = StoreError;

    fn try_from(row: CustomerBookingRow) -> Result<Self, Self::Error> {
        let resource_id = ResourceId::from_uuid(row.resource_id);

        // A deleted resource leaves every joined column NULL.
        let resource = match (
            row.resource_name,
            row.resource_category,
            row.resource_email,
            row.resource_phone,
        ) {
            (Some(name), Some(category), Some(email), Some(phone)) => Some(ResourceContact {
                id: resource_id,
                name,
                category,
                email,
                phone,
            }),
            _ => None,
        };

        Ok(Self {
            booking: Booking {
                id: BookingId::from_uuid(row.id),
                booking_code: BookingCode::new(row.booking_code),
                resource_id,
                customer_name: row.customer_name,
                customer_email: row.customer_email,
                customer_phone: row.customer_phone,
                notes: row.notes,
                date: row.booking_date,
                start_time: row.start_time,
                end_time: row.end_time,
                status: row
                    .status
                    .parse()
                    .map_err(|e| StoreError::Database(format!("corrupt booking row: {e}")))?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            resource,
        })
    }
}

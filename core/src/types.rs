//! Domain types for the booking platform.
//!
//! Resources own an ordered list of time slots. Bookings reference a resource
//! weakly (by id) and claim exactly one of its slots.

use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a bookable resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Creates a new random `ResourceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ResourceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Unique identifier for a time slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(Uuid);

impl SlotId {
    /// Creates a new random `SlotId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `SlotId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SlotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Human-facing booking reference, e.g. `BK1717228800000X7K2P9QAB`.
///
/// Composed of `BK`, the creation time in epoch milliseconds and a
/// nine character uppercase alphanumeric suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingCode(String);

impl BookingCode {
    /// Length of the random suffix.
    pub const SUFFIX_LEN: usize = 9;

    /// Generate a fresh code for a booking created at `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(format!("BK{}{suffix}", now.timestamp_millis()))
    }

    /// Wrap an already persisted code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Returned when a stored or submitted enum value is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// Structured subtype of a resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// A person (doctor, consultant, tutor)
    #[default]
    Person,
    /// A place (room, library desk, court)
    Place,
    /// An item (seat, equipment)
    Item,
    /// A service (support desk, repair)
    Service,
}

impl ResourceType {
    /// Canonical string form, as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Place => "Place",
            Self::Item => "Item",
            Self::Service => "Service",
        }
    }
}

impl FromStr for ResourceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Person" => Ok(Self::Person),
            "Place" => Ok(Self::Place),
            "Item" => Ok(Self::Item),
            "Service" => Ok(Self::Service),
            other => Err(ParseEnumError {
                kind: "resource type",
                value: other.to_string(),
            }),
        }
    }
}

/// Booking lifecycle status.
///
/// No transition graph is enforced: any status may be set from any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Created, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the resource owner
    Confirmed,
    /// Appointment took place
    Completed,
    /// Cancelled by either side
    Cancelled,
}

impl BookingStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Canonical string form, as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Resources and slots
// ============================================================================

/// A bookable time interval on a resource.
///
/// Times are fixed-format local time-of-day strings (`"09:00"`), not
/// time-zone aware.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Slot identifier (for clients; reservations address slots by date and start time)
    pub id: SlotId,
    /// Calendar date
    pub date: NaiveDate,
    /// Start time of day
    pub start_time: String,
    /// End time of day
    pub end_time: String,
    /// Whether a booking has claimed this slot
    pub is_booked: bool,
}

impl TimeSlot {
    /// Create an unbooked slot.
    #[must_use]
    pub fn open(date: NaiveDate, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            id: SlotId::new(),
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_booked: false,
        }
    }

    /// Whether this slot sits at the given date and start time.
    #[must_use]
    pub fn is_at(&self, date: NaiveDate, start_time: &str) -> bool {
        self.date == date && self.start_time == start_time
    }
}

/// Slot as shown in the grouped detail view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    /// Slot identifier
    pub slot_id: SlotId,
    /// Start time of day
    pub start_time: String,
    /// End time of day
    pub end_time: String,
    /// Whether the slot is taken
    pub is_booked: bool,
}

impl From<&TimeSlot> for SlotView {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            slot_id: slot.id,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            is_booked: slot.is_booked,
        }
    }
}

/// Slots keyed by `YYYY-MM-DD`, dates ascending, slots in collection order.
pub type GroupedSlots = BTreeMap<String, Vec<SlotView>>;

/// Everything about a resource except its slots (the listing shape).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProfile {
    /// Resource identifier
    pub id: ResourceId,
    /// Display name
    pub name: String,
    /// Free-form category label ("Healthcare", "Library", ...)
    pub category: String,
    /// Structured subtype
    pub resource_type: ResourceType,
    /// Owning organisation
    pub company_name: String,
    /// Years of experience
    pub experience: u32,
    /// Quality score in `[0, 5]`
    pub rating: f64,
    /// Contact email (unique across resources)
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Descriptive text
    pub bio: String,
    /// Inactive resources are hidden from the default listing
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A bookable resource together with its slot collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Descriptive fields
    #[serde(flatten)]
    pub profile: ResourceProfile,
    /// Ordered slot collection
    pub time_slots: Vec<TimeSlot>,
}

impl Resource {
    /// Resource identifier
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        self.profile.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Find the unbooked slot at `date` / `start_time`, if any.
    #[must_use]
    pub fn find_open_slot(&self, date: NaiveDate, start_time: &str) -> Option<&TimeSlot> {
        self.time_slots
            .iter()
            .find(|slot| slot.is_at(date, start_time) && !slot.is_booked)
    }

    /// Group slots by calendar date for the detail view.
    #[must_use]
    pub fn grouped_slots(&self) -> GroupedSlots {
        let mut grouped = GroupedSlots::new();
        for slot in &self.time_slots {
            grouped
                .entry(slot.date.format("%Y-%m-%d").to_string())
                .or_default()
                .push(SlotView::from(slot));
        }
        grouped
    }
}

/// Resource detail response: profile plus slots grouped by date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetail {
    /// Descriptive fields
    #[serde(flatten)]
    pub profile: ResourceProfile,
    /// Slots grouped by date
    pub grouped_time_slots: GroupedSlots,
}

impl From<&Resource> for ResourceDetail {
    fn from(resource: &Resource) -> Self {
        Self {
            profile: resource.profile.clone(),
            grouped_time_slots: resource.grouped_slots(),
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// A customer's claim on exactly one slot of one resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Internal identifier
    pub id: BookingId,
    /// Human-facing reference
    pub booking_code: BookingCode,
    /// The booked resource
    pub resource_id: ResourceId,
    /// Customer display name
    pub customer_name: String,
    /// Customer email (lowercase)
    pub customer_email: String,
    /// Customer phone
    pub customer_phone: String,
    /// Free-text notes, empty when none were given
    pub notes: String,
    /// Slot date
    pub date: NaiveDate,
    /// Slot start time
    pub start_time: String,
    /// Slot end time
    pub end_time: String,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Resource fields shown next to a customer's booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContact {
    /// Resource identifier
    pub id: ResourceId,
    /// Display name
    pub name: String,
    /// Category label
    pub category: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// A booking enriched with the booked resource's contact fields.
///
/// `resource` is `None` when the resource was deleted after the booking
/// was made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBooking {
    /// The booking
    #[serde(flatten)]
    pub booking: Booking,
    /// The booked resource, if it still exists
    pub resource: Option<ResourceContact>,
}

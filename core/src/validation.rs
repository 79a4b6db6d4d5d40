//! Input validation for reservation and catalog requests.
//!
//! Raw request bodies deserialize into the `*Request` types with every field
//! optional, so a missing field produces a field-level [`ValidationError`]
//! instead of a generic deserialization failure.

use crate::error::ValidationError;
use crate::types::{Resource, ResourceId, ResourceProfile, ResourceType, TimeSlot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;

/// Shortest accepted customer name.
pub const CUSTOMER_NAME_MIN: usize = 2;
/// Longest accepted customer name.
pub const CUSTOMER_NAME_MAX: usize = 50;
/// Fewest digits in a customer phone number.
pub const PHONE_DIGITS_MIN: usize = 10;
/// Most digits in a customer phone number.
pub const PHONE_DIGITS_MAX: usize = 15;
/// Longest accepted booking note.
pub const NOTES_MAX: usize = 500;

/// Reservation request as received on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Resource to book (`expertId` accepted for older clients)
    #[serde(alias = "expertId")]
    pub resource_id: Option<String>,
    /// Customer display name
    pub customer_name: Option<String>,
    /// Customer email
    pub customer_email: Option<String>,
    /// Customer phone
    pub customer_phone: Option<String>,
    /// Slot date, `YYYY-MM-DD` or RFC 3339
    pub date: Option<String>,
    /// Slot start time
    pub start_time: Option<String>,
    /// Slot end time
    pub end_time: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

/// A reservation request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationInput {
    /// Resource to book
    pub resource_id: ResourceId,
    /// Trimmed customer name
    pub customer_name: String,
    /// Lowercased, trimmed customer email
    pub customer_email: String,
    /// Customer phone as given (trimmed)
    pub customer_phone: String,
    /// Slot date
    pub date: NaiveDate,
    /// Slot start time
    pub start_time: String,
    /// Slot end time
    pub end_time: String,
    /// Notes, empty when absent
    pub notes: String,
}

/// Validate a reservation request. Stops at the first invalid field.
///
/// # Errors
///
/// Returns the first field that fails validation.
pub fn validate_reservation(request: &ReservationRequest) -> Result<ReservationInput, ValidationError> {
    let resource_id = required(request.resource_id.as_deref(), "resourceId")?
        .parse::<ResourceId>()
        .map_err(|_| ValidationError::new("resourceId", "must be a valid id"))?;

    let customer_name = required(request.customer_name.as_deref(), "customerName")?;
    let name_len = customer_name.chars().count();
    if !(CUSTOMER_NAME_MIN..=CUSTOMER_NAME_MAX).contains(&name_len) {
        return Err(ValidationError::new(
            "customerName",
            format!("must be between {CUSTOMER_NAME_MIN} and {CUSTOMER_NAME_MAX} characters"),
        ));
    }

    let customer_email = required(request.customer_email.as_deref(), "customerEmail")?;
    if !is_valid_email(customer_email) {
        return Err(ValidationError::new("customerEmail", "must be a valid email"));
    }

    let customer_phone = required(request.customer_phone.as_deref(), "customerPhone")?;
    if !is_valid_phone(customer_phone) {
        return Err(ValidationError::new(
            "customerPhone",
            format!("must contain {PHONE_DIGITS_MIN} to {PHONE_DIGITS_MAX} digits"),
        ));
    }

    let date = required(request.date.as_deref(), "date")?;
    let date = parse_date(date).ok_or_else(|| ValidationError::new("date", "must be a valid date"))?;

    let start_time = required(request.start_time.as_deref(), "startTime")?;
    let end_time = required(request.end_time.as_deref(), "endTime")?;

    let notes = request.notes.as_deref().unwrap_or_default();
    if notes.chars().count() > NOTES_MAX {
        return Err(ValidationError::new(
            "notes",
            format!("must be at most {NOTES_MAX} characters"),
        ));
    }

    Ok(ReservationInput {
        resource_id,
        customer_name: customer_name.to_string(),
        customer_email: customer_email.to_lowercase(),
        customer_phone: customer_phone.to_string(),
        date,
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        notes: notes.to_string(),
    })
}

/// Slot entry in a resource creation request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotRequest {
    /// Slot date, `YYYY-MM-DD` or RFC 3339
    pub date: Option<String>,
    /// Start time of day
    pub start_time: Option<String>,
    /// End time of day
    pub end_time: Option<String>,
    /// Pre-booked flag (seed data only)
    #[serde(default)]
    pub is_booked: bool,
}

/// Resource creation request as received on the wire.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResourceRequest {
    /// Display name
    pub name: Option<String>,
    /// Category label
    pub category: Option<String>,
    /// Structured subtype, defaults to `Person`
    pub resource_type: Option<String>,
    /// Owning organisation, defaults to `Independent`
    pub company_name: Option<String>,
    /// Years of experience, defaults to 0
    pub experience: Option<i64>,
    /// Quality score in `[0, 5]`, defaults to 0
    pub rating: Option<f64>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Descriptive text
    pub bio: Option<String>,
    /// Defaults to `true`
    pub is_active: Option<bool>,
    /// Initial slots
    #[serde(default)]
    pub time_slots: Vec<TimeSlotRequest>,
}

/// Validate a resource creation request and build the resource.
///
/// Slot (date, start time) pairs must be unique within the request.
///
/// # Errors
///
/// Returns the first field that fails validation.
pub fn validate_new_resource(
    request: &NewResourceRequest,
    now: DateTime<Utc>,
) -> Result<Resource, ValidationError> {
    let name = required(request.name.as_deref(), "name")?;
    let category = required(request.category.as_deref(), "category")?;
    let email = required(request.email.as_deref(), "email")?;
    if !is_valid_email(email) {
        return Err(ValidationError::new("email", "must be a valid email"));
    }
    let phone = required(request.phone.as_deref(), "phone")?;
    let bio = required(request.bio.as_deref(), "bio")?;

    let resource_type = match request.resource_type.as_deref().map(str::trim) {
        None | Some("") => ResourceType::default(),
        Some(raw) => raw
            .parse()
            .map_err(|_| ValidationError::new("resourceType", "must be one of Person, Place, Item, Service"))?,
    };

    let experience = u32::try_from(request.experience.unwrap_or(0))
        .map_err(|_| ValidationError::new("experience", "must be zero or more"))?;

    let rating = request.rating.unwrap_or(0.0);
    if !(0.0..=5.0).contains(&rating) {
        return Err(ValidationError::new("rating", "must be between 0 and 5"));
    }

    let mut seen = HashSet::new();
    let mut time_slots = Vec::with_capacity(request.time_slots.len());
    for slot in &request.time_slots {
        let date = required(slot.date.as_deref(), "timeSlots.date")?;
        let date = parse_date(date)
            .ok_or_else(|| ValidationError::new("timeSlots.date", "must be a valid date"))?;
        let start_time = required(slot.start_time.as_deref(), "timeSlots.startTime")?;
        let end_time = required(slot.end_time.as_deref(), "timeSlots.endTime")?;

        if !seen.insert((date, start_time.to_string())) {
            return Err(ValidationError::new(
                "timeSlots",
                format!("duplicate slot {date} {start_time}"),
            ));
        }

        let mut time_slot = TimeSlot::open(date, start_time, end_time);
        time_slot.is_booked = slot.is_booked;
        time_slots.push(time_slot);
    }

    Ok(Resource {
        profile: ResourceProfile {
            id: ResourceId::new(),
            name: name.to_string(),
            category: category.to_string(),
            resource_type,
            company_name: request
                .company_name
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("Independent")
                .to_string(),
            experience,
            rating,
            email: email.to_lowercase(),
            phone: phone.to_string(),
            bio: bio.to_string(),
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        },
        time_slots,
    })
}

/// Validate the customer email used to look up bookings.
///
/// # Errors
///
/// Returns an error if the email is missing or blank.
pub fn validate_lookup_email(email: Option<&str>) -> Result<String, ValidationError> {
    required(email, "email").map(str::to_lowercase)
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
/// (whose UTC date is used).
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Validate email address format.
///
/// This performs basic RFC 5322 validation:
/// - Must contain exactly one `@`
/// - Must have non-empty local and domain parts
/// - Domain must contain a dot, with non-empty labels
/// - Length must be between 3 and 255 characters
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local_chars =
        |c: char| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '_';
    let valid_domain_chars = |c: char| c.is_alphanumeric() || c == '.' || c == '-';

    if !local.chars().all(valid_local_chars) || !domain.chars().all(valid_domain_chars) {
        return false;
    }

    domain.split('.').all(|label| !label.is_empty())
}

/// Phone numbers are 10 to 15 ASCII digits with an optional leading `+`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::new(field, "is required"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn valid_request() -> ReservationRequest {
        ReservationRequest {
            resource_id: Some(ResourceId::new().to_string()),
            customer_name: Some("Ada Lovelace".to_string()),
            customer_email: Some("Ada@Example.com".to_string()),
            customer_phone: Some("5551234567".to_string()),
            date: Some("2024-06-01".to_string()),
            start_time: Some("09:00".to_string()),
            end_time: Some("10:00".to_string()),
            notes: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let input = validate_reservation(&valid_request()).unwrap();
        assert_eq!(input.customer_email, "ada@example.com");
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(input.notes, "");
    }

    #[test]
    fn rejects_a_malformed_email() {
        let request = ReservationRequest {
            customer_email: Some("not-an-email".to_string()),
            ..valid_request()
        };
        let err = validate_reservation(&request).unwrap_err();
        assert_eq!(err.field, "customerEmail");
    }

    #[test]
    fn enforces_name_length_bounds() {
        for name in ["A", &"x".repeat(51)] {
            let request = ReservationRequest {
                customer_name: Some(name.to_string()),
                ..valid_request()
            };
            assert_eq!(validate_reservation(&request).unwrap_err().field, "customerName");
        }
    }

    #[test]
    fn enforces_phone_digit_count() {
        assert!(is_valid_phone("+441234567890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("555-123-4567"));
    }

    #[test]
    fn rejects_long_notes() {
        let request = ReservationRequest {
            notes: Some("n".repeat(NOTES_MAX + 1)),
            ..valid_request()
        };
        assert_eq!(validate_reservation(&request).unwrap_err().field, "notes");
    }

    #[test]
    fn rejects_impossible_dates() {
        let request = ReservationRequest {
            date: Some("2024-02-30".to_string()),
            ..valid_request()
        };
        assert_eq!(validate_reservation(&request).unwrap_err().field, "date");
    }

    #[test]
    fn accepts_rfc3339_dates_using_the_utc_day() {
        assert_eq!(
            parse_date("2024-06-01T23:30:00-02:00"),
            NaiveDate::from_ymd_opt(2024, 6, 2)
        );
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let request = ReservationRequest {
            start_time: Some("   ".to_string()),
            ..valid_request()
        };
        assert_eq!(validate_reservation(&request).unwrap_err().field, "startTime");

        let err = validate_reservation(&ReservationRequest::default()).unwrap_err();
        assert_eq!(err.field, "resourceId");
    }

    #[test]
    fn email_validation_matches_common_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user+tag@subdomain.example.com"));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn new_resource_defaults_and_duplicate_slots() {
        let now = Utc::now();
        let mut request = NewResourceRequest {
            name: Some("Prof. Miller".to_string()),
            category: Some("Consulting".to_string()),
            email: Some("Miller@Prof.com".to_string()),
            phone: Some("5".to_string()),
            bio: Some("Counseling".to_string()),
            time_slots: vec![TimeSlotRequest {
                date: Some("2024-06-01".to_string()),
                start_time: Some("09:00".to_string()),
                end_time: Some("10:00".to_string()),
                is_booked: false,
            }],
            ..NewResourceRequest::default()
        };

        let resource = validate_new_resource(&request, now).unwrap();
        assert_eq!(resource.profile.resource_type, ResourceType::Person);
        assert_eq!(resource.profile.company_name, "Independent");
        assert_eq!(resource.profile.email, "miller@prof.com");
        assert!(resource.profile.is_active);
        assert_eq!(resource.time_slots.len(), 1);

        request.time_slots.push(request.time_slots[0].clone());
        assert_eq!(validate_new_resource(&request, now).unwrap_err().field, "timeSlots");
    }

    #[test]
    fn new_resource_rejects_out_of_range_numbers() {
        let base = NewResourceRequest {
            name: Some("Code Wizards".to_string()),
            category: Some("Technology".to_string()),
            email: Some("code@wiz.com".to_string()),
            phone: Some("2".to_string()),
            bio: Some("Tech Support".to_string()),
            ..NewResourceRequest::default()
        };

        let rating = NewResourceRequest { rating: Some(5.5), ..base.clone() };
        assert_eq!(validate_new_resource(&rating, Utc::now()).unwrap_err().field, "rating");

        let experience = NewResourceRequest { experience: Some(-1), ..base };
        assert_eq!(
            validate_new_resource(&experience, Utc::now()).unwrap_err().field,
            "experience"
        );
    }

    #[test]
    fn lookup_email_is_required_and_lowercased() {
        assert_eq!(validate_lookup_email(Some(" Ada@Example.com ")).unwrap(), "ada@example.com");
        assert_eq!(validate_lookup_email(None).unwrap_err().field, "email");
        assert_eq!(validate_lookup_email(Some("")).unwrap_err().field, "email");
    }
}

//! Read-side queries and catalog management.

use crate::metrics;
use slotbook_core::environment::Clock;
use slotbook_core::error::{BookingError, Result, ValidationError};
use slotbook_core::query::{Page, ResourceQuery};
use slotbook_core::store::{BookingStore, ResourceStore};
use slotbook_core::types::{
    BookingId, BookingStatus, CustomerBooking, Resource, ResourceDetail, ResourceId,
    ResourceProfile,
};
use slotbook_core::validation::{NewResourceRequest, validate_lookup_email, validate_new_resource};
use std::sync::Arc;
use tracing::info;

/// Category entry that stands for "no filter" in client pickers.
pub const ALL_CATEGORIES: &str = "All";

/// Catalog queries, customer lookups and booking status changes.
#[derive(Clone)]
pub struct CatalogService {
    resources: Arc<dyn ResourceStore>,
    bookings: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        bookings: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resources,
            bookings,
            clock,
        }
    }

    /// One page of resources, best rated first, without slots.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] if the store fails.
    pub async fn list_resources(&self, query: ResourceQuery) -> Result<Page<ResourceProfile>> {
        Ok(self.resources.list_resources(query).await?)
    }

    /// A resource with its slots grouped by date.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: `id` is not a resource id
    /// - [`BookingError::ResourceNotFound`]: no such resource
    /// - [`BookingError::StorageFailure`]: the store failed
    pub async fn resource_detail(&self, id: &str) -> Result<ResourceDetail> {
        let id = parse_resource_id(id)?;
        let resource = self
            .resources
            .find_resource(id)
            .await?
            .ok_or(BookingError::ResourceNotFound(id))?;
        Ok(ResourceDetail::from(&resource))
    }

    /// Every booking made with `email`, newest slot first.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: no email given
    /// - [`BookingError::StorageFailure`]: the store failed
    pub async fn bookings_for_customer(&self, email: Option<&str>) -> Result<Vec<CustomerBooking>> {
        let email = validate_lookup_email(email)?;
        Ok(self.bookings.bookings_for_email(email).await?)
    }

    /// Move a booking to `status`.
    ///
    /// Any status may follow any other. Cancelling does not reopen the slot.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: bad id or unknown status
    /// - [`BookingError::BookingNotFound`]: no such booking
    /// - [`BookingError::StorageFailure`]: the store failed
    #[tracing::instrument(skip(self))]
    pub async fn update_booking_status(
        &self,
        id: &str,
        status: Option<&str>,
    ) -> Result<CustomerBooking> {
        let id: BookingId = id
            .parse()
            .map_err(|_| ValidationError::new("id", "must be a valid booking id"))?;
        let status: BookingStatus = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::new("status", "is required"))?
            .parse()
            .map_err(|_| {
                ValidationError::new(
                    "status",
                    "must be one of Pending, Confirmed, Completed, Cancelled",
                )
            })?;

        let updated = self
            .bookings
            .update_status(id, status, self.clock.now())
            .await?
            .ok_or(BookingError::BookingNotFound(id))?;

        info!(booking_code = %updated.booking.booking_code, %status, "Booking status updated");
        Ok(updated)
    }

    /// Add a resource to the catalog.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: invalid fields or duplicate slots
    /// - [`BookingError::DuplicateResource`]: the email is already taken
    /// - [`BookingError::StorageFailure`]: the store failed
    #[tracing::instrument(skip(self, request))]
    pub async fn create_resource(&self, request: &NewResourceRequest) -> Result<Resource> {
        let resource = validate_new_resource(request, self.clock.now())?;
        self.resources.insert_resource(resource.clone()).await?;

        metrics::record_resource_created();
        info!(resource_id = %resource.id(), name = %resource.name(), "Resource created");
        Ok(resource)
    }

    /// Remove a resource and its slots. Its bookings are kept.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: `id` is not a resource id
    /// - [`BookingError::ResourceNotFound`]: no such resource
    /// - [`BookingError::StorageFailure`]: the store failed
    #[tracing::instrument(skip(self))]
    pub async fn delete_resource(&self, id: &str) -> Result<()> {
        let id = parse_resource_id(id)?;
        if self.resources.delete_resource(id).await? {
            info!(resource_id = %id, "Resource deleted");
            Ok(())
        } else {
            Err(BookingError::ResourceNotFound(id))
        }
    }

    /// Distinct categories of active resources, preceded by [`ALL_CATEGORIES`].
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StorageFailure`] if the store fails.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        categories.extend(self.resources.categories().await?);
        Ok(categories)
    }
}

fn parse_resource_id(raw: &str) -> std::result::Result<ResourceId, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::new("id", "must be a valid resource id"))
}

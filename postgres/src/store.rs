//! `PostgreSQL` implementation of the resource and booking stores.

use crate::error::{BOOKINGS_SLOT_UNIQUE, RESOURCES_EMAIL_UNIQUE, map_sqlx, violated_unique_constraint};
use crate::pool::PoolConfig;
use crate::rows::{
    CUSTOMER_BOOKING_COLUMNS, CustomerBookingRow, RESOURCE_COLUMNS, ResourceRow, SlotRow,
};
use chrono::{DateTime, Utc};
use slotbook_core::query::{Page, ResourceQuery};
use slotbook_core::store::{BookingStore, ResourceStore, StoreError, StoreFuture};
use slotbook_core::types::{
    Booking, BookingId, BookingStatus, CustomerBooking, Resource, ResourceId, ResourceProfile,
    TimeSlot,
};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// `PostgreSQL`-backed store for resources and bookings.
///
/// # Schema
///
/// See `migrations/`. The `bookings_slot_unique` constraint on
/// `(resource_id, booking_date, start_time)` guarantees at most one booking
/// per slot even if two transactions pass the in-transaction re-check.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// Connections are health-checked before being handed out, and acquiring
    /// one fails after `config.acquire_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the database cannot be reached.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if migrations fail.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_customer_booking(&self, id: BookingId) -> Result<Option<CustomerBooking>, StoreError> {
        let sql = format!(
            "SELECT {CUSTOMER_BOOKING_COLUMNS} FROM bookings b \
             LEFT JOIN resources r ON r.id = b.resource_id \
             WHERE b.id = $1"
        );
        sqlx::query_as::<_, CustomerBookingRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx("failed to load booking", &e))?
            .map(CustomerBooking::try_from)
            .transpose()
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

const LISTING_FILTER: &str = "WHERE ($1 = FALSE OR is_active) \
     AND ($2::text IS NULL OR category = $2) \
     AND ($3::text IS NULL OR name ILIKE $3 OR bio ILIKE $3)";

impl ResourceStore for PostgresStore {
    fn find_resource(&self, id: ResourceId) -> StoreFuture<'_, Option<Resource>> {
        Box::pin(async move {
            let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1");
            let Some(row) = sqlx::query_as::<_, ResourceRow>(&sql)
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to load resource", &e))?
            else {
                return Ok(None);
            };

            let slots = sqlx::query_as::<_, SlotRow>(
                "SELECT id, slot_date, start_time, end_time, is_booked \
                 FROM time_slots WHERE resource_id = $1 ORDER BY position",
            )
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("failed to load slots", &e))?;

            Ok(Some(Resource {
                profile: ResourceProfile::try_from(row)?,
                time_slots: slots.into_iter().map(TimeSlot::from).collect(),
            }))
        })
    }

    fn list_resources(&self, query: ResourceQuery) -> StoreFuture<'_, Page<ResourceProfile>> {
        Box::pin(async move {
            let search = query.search().map(like_pattern);
            let limit = i64::from(query.limit());
            let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

            let (total,): (i64,) =
                sqlx::query_as(&format!("SELECT COUNT(*) FROM resources {LISTING_FILTER}"))
                    .bind(query.active_only())
                    .bind(query.category())
                    .bind(search.as_deref())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_sqlx("failed to count resources", &e))?;

            // Byte-order name comparison regardless of the database collation.
            let sql = format!(
                "SELECT {RESOURCE_COLUMNS} FROM resources {LISTING_FILTER} \
                 ORDER BY rating DESC, name COLLATE \"C\" ASC, id ASC LIMIT $4 OFFSET $5"
            );
            let rows = sqlx::query_as::<_, ResourceRow>(&sql)
                .bind(query.active_only())
                .bind(query.category())
                .bind(search.as_deref())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to list resources", &e))?;

            let items = rows
                .into_iter()
                .map(ResourceProfile::try_from)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Page::new(items, &query, u64::try_from(total).unwrap_or(0)))
        })
    }

    fn insert_resource(&self, resource: Resource) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let profile = &resource.profile;
            let experience = i32::try_from(profile.experience)
                .map_err(|e| StoreError::Database(format!("experience out of range: {e}")))?;

            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx("failed to begin transaction", &e))?;

            sqlx::query(
                "INSERT INTO resources \
                 (id, name, category, resource_type, company_name, experience, rating, \
                  email, phone, bio, is_active, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            )
            .bind(profile.id.as_uuid())
            .bind(&profile.name)
            .bind(&profile.category)
            .bind(profile.resource_type.as_str())
            .bind(&profile.company_name)
            .bind(experience)
            .bind(profile.rating)
            .bind(&profile.email)
            .bind(&profile.phone)
            .bind(&profile.bio)
            .bind(profile.is_active)
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if violated_unique_constraint(&e) == Some(RESOURCES_EMAIL_UNIQUE) {
                    StoreError::Duplicate(profile.email.clone())
                } else {
                    map_sqlx("failed to insert resource", &e)
                }
            })?;

            for (position, slot) in resource.time_slots.iter().enumerate() {
                let position = i32::try_from(position)
                    .map_err(|e| StoreError::Database(format!("too many slots: {e}")))?;
                sqlx::query(
                    "INSERT INTO time_slots \
                     (id, resource_id, position, slot_date, start_time, end_time, is_booked) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7)",
                )
                .bind(slot.id.as_uuid())
                .bind(profile.id.as_uuid())
                .bind(position)
                .bind(slot.date)
                .bind(&slot.start_time)
                .bind(&slot.end_time)
                .bind(slot.is_booked)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx("failed to insert slot", &e))?;
            }

            tx.commit()
                .await
                .map_err(|e| map_sqlx("failed to commit resource", &e))?;

            tracing::debug!(
                resource_id = %profile.id,
                slots = resource.time_slots.len(),
                "Inserted resource"
            );
            Ok(())
        })
    }

    fn delete_resource(&self, id: ResourceId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM resources WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to delete resource", &e))?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn clear_resources(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM resources")
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to clear resources", &e))?;
            Ok(result.rows_affected())
        })
    }

    fn categories(&self) -> StoreFuture<'_, Vec<String>> {
        Box::pin(async move {
            let rows: Vec<(String,)> = sqlx::query_as(
                "SELECT category FROM resources WHERE is_active \
                 GROUP BY category ORDER BY category COLLATE \"C\"",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx("failed to load categories", &e))?;
            Ok(rows.into_iter().map(|(category,)| category).collect())
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx("ping failed", &e))?;
            Ok(())
        })
    }
}

impl BookingStore for PostgresStore {
    fn reserve_slot(&self, booking: Booking) -> StoreFuture<'_, Booking> {
        Box::pin(async move {
            let slot_not_found = || StoreError::SlotNotFound {
                date: booking.date,
                start_time: booking.start_time.clone(),
            };

            // Dropping `tx` on any early return rolls the transaction back.
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx("failed to begin reservation", &e))?;

            // Concurrent reservations of this slot queue here.
            let locked: Option<(bool,)> = sqlx::query_as(
                "SELECT is_booked FROM time_slots \
                 WHERE resource_id = $1 AND slot_date = $2 AND start_time = $3 \
                 FOR UPDATE",
            )
            .bind(booking.resource_id.as_uuid())
            .bind(booking.date)
            .bind(&booking.start_time)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx("failed to lock slot", &e))?;
            if locked.is_none() {
                return Err(slot_not_found());
            }

            let (exists,): (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM bookings \
                 WHERE resource_id = $1 AND booking_date = $2 AND start_time = $3)",
            )
            .bind(booking.resource_id.as_uuid())
            .bind(booking.date)
            .bind(&booking.start_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx("failed to check existing booking", &e))?;
            if exists {
                tracing::debug!(
                    resource_id = %booking.resource_id,
                    date = %booking.date,
                    start_time = %booking.start_time,
                    "Reservation lost race on re-check"
                );
                return Err(StoreError::Conflict);
            }

            sqlx::query(
                "INSERT INTO bookings \
                 (id, booking_code, resource_id, customer_name, customer_email, customer_phone, \
                  notes, booking_date, start_time, end_time, status, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            )
            .bind(booking.id.as_uuid())
            .bind(booking.booking_code.as_str())
            .bind(booking.resource_id.as_uuid())
            .bind(&booking.customer_name)
            .bind(&booking.customer_email)
            .bind(&booking.customer_phone)
            .bind(&booking.notes)
            .bind(booking.date)
            .bind(&booking.start_time)
            .bind(&booking.end_time)
            .bind(booking.status.as_str())
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if violated_unique_constraint(&e) == Some(BOOKINGS_SLOT_UNIQUE) {
                    StoreError::Conflict
                } else {
                    map_sqlx("failed to insert booking", &e)
                }
            })?;

            let flagged = sqlx::query(
                "UPDATE time_slots SET is_booked = TRUE \
                 WHERE resource_id = $1 AND slot_date = $2 AND start_time = $3 \
                 AND is_booked = FALSE",
            )
            .bind(booking.resource_id.as_uuid())
            .bind(booking.date)
            .bind(&booking.start_time)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx("failed to flag slot", &e))?;
            if flagged.rows_affected() == 0 {
                return Err(slot_not_found());
            }

            tx.commit().await.map_err(|e| {
                if violated_unique_constraint(&e) == Some(BOOKINGS_SLOT_UNIQUE) {
                    StoreError::Conflict
                } else {
                    map_sqlx("failed to commit reservation", &e)
                }
            })?;

            Ok(booking)
        })
    }

    fn bookings_for_email(&self, email: String) -> StoreFuture<'_, Vec<CustomerBooking>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT {CUSTOMER_BOOKING_COLUMNS} FROM bookings b \
                 LEFT JOIN resources r ON r.id = b.resource_id \
                 WHERE b.customer_email = $1 \
                 ORDER BY b.booking_date DESC, b.created_at DESC"
            );
            sqlx::query_as::<_, CustomerBookingRow>(&sql)
                .bind(email.to_lowercase())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to load bookings", &e))?
                .into_iter()
                .map(CustomerBooking::try_from)
                .collect()
        })
    }

    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<CustomerBooking>> {
        Box::pin(async move {
            let result = sqlx::query("UPDATE bookings SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(status.as_str())
                .bind(updated_at)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx("failed to update booking status", &e))?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }
            self.fetch_customer_booking(id).await
        })
    }
}

//! Business metrics for the booking server.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `slotbook_reservations_total{outcome}` - Reservation attempts by outcome
//! - `slotbook_slot_notifications_total` - Slot-booked events published to rooms
//! - `slotbook_resources_created_total` - Resources added through the catalog API
//!
//! ## Histograms
//! - `slotbook_reservation_duration_seconds` - Time spent handling a reservation

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, before any metrics are recorded.
pub fn register_metrics() {
    describe_counter!(
        "slotbook_reservations_total",
        "Reservation attempts by outcome (booked, validation_failed, resource_not_found, slot_unavailable, conflict, storage_failure)"
    );
    describe_histogram!(
        "slotbook_reservation_duration_seconds",
        "Time taken to validate, reserve and announce a booking"
    );
    describe_counter!(
        "slotbook_slot_notifications_total",
        "Slot-booked events published to websocket rooms"
    );
    describe_counter!(
        "slotbook_resources_created_total",
        "Resources created through the catalog API"
    );

    tracing::info!("Business metrics registered");
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// # Errors
///
/// Returns an error if the recorder is already installed or the listener
/// cannot be configured.
pub fn install_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )?
        .install()?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record the outcome of a reservation attempt.
///
/// # Arguments
///
/// * `outcome` - Outcome label, e.g. `booked` or `conflict`
/// * `duration` - Time spent handling the attempt
pub fn record_reservation(outcome: &'static str, duration: Duration) {
    metrics::counter!("slotbook_reservations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("slotbook_reservation_duration_seconds").record(duration.as_secs_f64());
    tracing::debug!(outcome, ?duration, "Recorded reservation metric");
}

/// Record a resource created through the catalog API.
pub fn record_resource_created() {
    metrics::counter!("slotbook_resources_created_total").increment(1);
}

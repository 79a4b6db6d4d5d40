//! Load the sample catalog into the configured database.
//!
//! Removes every resource, then inserts five sample resources with a
//! week of slots each. Bookings are not touched.
//!
//! ```bash
//! cargo run --bin seed
//! ```

use slotbook_core::environment::SystemClock;
use slotbook_postgres::PostgresStore;
use slotbook_server::{Config, seed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,slotbook=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(database = %config.redacted_database_url(), "Seeding database");

    let store = PostgresStore::connect(&config.database.url, &config.pool_config()).await?;
    store.migrate().await?;

    let count = seed::seed(&store, &SystemClock).await?;
    tracing::info!(count, "Database seeded successfully");
    Ok(())
}

//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the referral REST API on its own.
//!
//! ## Intended use
//! Useful during development alongside the front-end. The workspace's main `referral-run`
//! binary serves the same router.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use referral_core::config::{flag_from_env_value, store_source_from_env_values};
use referral_core::CoreConfig;

/// Main entry point for the referral REST API server
///
/// # Environment Variables
/// - `REFERRAL_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MONGODB_URI`, `REFERRAL_DB`, `REFERRAL_COLLECTION`: MongoDB source
/// - `REFERRAL_FIXTURE`: JSON fixture used instead of MongoDB
/// - `REFERRAL_DEV_TOOLS`: enable Swagger UI
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the store configuration is incomplete,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("referral_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("REFERRAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting referral REST API on {}", addr);

    let store = store_source_from_env_values(
        std::env::var("MONGODB_URI").ok(),
        std::env::var("REFERRAL_DB").ok(),
        std::env::var("REFERRAL_COLLECTION").ok(),
        std::env::var("REFERRAL_FIXTURE").ok(),
    )?;
    let dev_tools = flag_from_env_value(std::env::var("REFERRAL_DEV_TOOLS").ok());

    api_rest::serve(CoreConfig::new(store, dev_tools), &addr).await
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use referral_core::config::{flag_from_env_value, store_source_from_env_values};
use referral_core::CoreConfig;

/// Main entry point for the referral guide
///
/// Resolves configuration once, opens the record store, and serves the REST API on port 3000
/// (configurable via REFERRAL_REST_ADDR) until Ctrl-C or SIGTERM. The store is closed after
/// the server drains.
///
/// # Environment Variables
/// - `REFERRAL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MONGODB_URI`: MongoDB connection string (required unless `REFERRAL_FIXTURE` is set)
/// - `REFERRAL_DB`: database name (default: "clinical_advice")
/// - `REFERRAL_COLLECTION`: collection name (default: "completed_cleaned_clinical")
/// - `REFERRAL_FIXTURE`: path to a JSON array of documents served from memory
/// - `REFERRAL_DEV_TOOLS`: `1`/`true` mounts the Swagger UI at `/swagger-ui`
///
/// # Returns
/// * `Ok(())` - If the server starts, runs and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("referral_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("referral_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("REFERRAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let store = store_source_from_env_values(
        std::env::var("MONGODB_URI").ok(),
        std::env::var("REFERRAL_DB").ok(),
        std::env::var("REFERRAL_COLLECTION").ok(),
        std::env::var("REFERRAL_FIXTURE").ok(),
    )?;
    let dev_tools = flag_from_env_value(std::env::var("REFERRAL_DEV_TOOLS").ok());
    let cfg = CoreConfig::new(store, dev_tools);

    tracing::info!("++ Starting referral guide REST on {}", rest_addr);

    api_rest::serve(cfg, &rest_addr).await
}

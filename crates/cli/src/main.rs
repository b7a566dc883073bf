use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_shared::{AgeGroup, ConditionsParams};
use referral_core::config::{store_source_from_env_values, StoreSource};
use referral_core::{open_store, ConditionsQuery, ConditionsService, CoreConfig, RecordStore};
use referral_wizard::ResultBuckets;

mod interactive;

#[derive(Parser)]
#[command(name = "referral")]
#[command(about = "Imaging referral guide CLI")]
struct Cli {
    /// JSON array of clinical documents to read instead of MongoDB
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the referral wizard against a running REST server
    Wizard {
        /// Base URL of the REST server
        #[arg(long, env = "REFERRAL_API_URL", default_value = "http://localhost:3000")]
        api_url: String,
    },
    /// List the distinct body areas in the store
    BodyAreas,
    /// Run a conditions query and print the result set as JSON
    Query {
        /// panels, conditions, scenarios or results; omit for matching records
        #[arg(long = "type")]
        kind: Option<String>,
        /// adult or child
        #[arg(long)]
        age_group: Option<String>,
        #[arg(long)]
        body_area: Option<String>,
        #[arg(long)]
        panel: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        scenario_id: Option<String>,
    },
    /// Show the classified procedures of one scenario
    Scenario {
        /// Scenario identifier
        scenario_id: String,
        /// adult or child; selects which radiation level is shown
        #[arg(long)]
        age_group: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("referral_wizard=warn".parse()?)
                .add_directive("referral_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Wizard { api_url }) => interactive::run(&api_url).await,
        Some(Commands::BodyAreas) => {
            with_service(cli.fixture, |service| async move {
                for area in service.body_areas().await? {
                    println!("{}", area);
                }
                Ok(())
            })
            .await
        }
        Some(Commands::Query {
            kind,
            age_group,
            body_area,
            panel,
            condition,
            scenario_id,
        }) => {
            let query = ConditionsQuery::try_from(ConditionsParams {
                kind,
                age_group,
                body_area,
                panel,
                condition,
                scenario_id,
            })?;
            with_service(cli.fixture, |service| async move {
                let output = service.run(&query).await?;
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            })
            .await
        }
        Some(Commands::Scenario {
            scenario_id,
            age_group,
        }) => {
            let age_group = age_group.as_deref().map(AgeGroup::from_str).transpose()?;
            with_service(cli.fixture, |service| async move {
                let procedures = service.results(&scenario_id, age_group).await?;
                if procedures.is_empty() {
                    println!("No procedures found for scenario {}.", scenario_id);
                    return Ok(());
                }
                print_buckets(&ResultBuckets::from_procedures(procedures));
                Ok(())
            })
            .await
        }
        None => {
            println!("Use 'referral --help' for commands");
            Ok(())
        }
    }
}

/// Open the configured store, run `action`, then close the store whatever the outcome.
async fn with_service<F, Fut>(fixture: Option<PathBuf>, action: F) -> anyhow::Result<()>
where
    F: FnOnce(ConditionsService) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    let source = match fixture {
        Some(path) => StoreSource::Fixture(path),
        None => store_source_from_env_values(
            std::env::var("MONGODB_URI").ok(),
            std::env::var("REFERRAL_DB").ok(),
            std::env::var("REFERRAL_COLLECTION").ok(),
            std::env::var("REFERRAL_FIXTURE").ok(),
        )?,
    };
    let cfg = CoreConfig::new(source, false);

    let store: Arc<dyn RecordStore> = open_store(&cfg)
        .await
        .with_context(|| format!("failed to open {}", cfg.store_label()))?;
    let result = action(ConditionsService::new(store.clone())).await;
    store.shutdown().await;
    result
}

fn print_buckets(buckets: &ResultBuckets) {
    let groups = [
        ("Usually appropriate", &buckets.usually),
        ("May be appropriate", &buckets.maybe),
        ("Rarely appropriate / not appropriate", &buckets.rarely),
    ];
    for (title, procedures) in groups {
        if procedures.is_empty() {
            continue;
        }
        println!("{}:", title);
        for procedure in procedures {
            println!(
                "  - {} [{}]",
                procedure.name.as_deref().unwrap_or("(unnamed procedure)"),
                procedure.radiation_string
            );
        }
    }
}

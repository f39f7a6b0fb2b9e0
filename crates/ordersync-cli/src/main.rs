mod output;

use clap::{Parser, Subcommand};
use ordersync_client::{OrdersClient, SyncOptions, SyncPipeline};
use tracing_subscriber::EnvFilter;

use crate::output::Dataset;

#[derive(Debug, Parser)]
#[command(name = "ordersync")]
#[command(about = "Sync orders from the orders API into correlated JSON datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Verify the API key and connectivity without fetching any orders
    Check,
    /// Run the full sync and write the chosen dataset to stdout as JSON
    Sync {
        /// Which dataset to emit; `all` emits the full run report
        #[arg(long, value_enum, default_value_t = Dataset::Merged)]
        dataset: Dataset,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ordersync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = OrdersClient::from_config(&config)?;
    match cli.command {
        Commands::Check => run_check(&client).await,
        Commands::Sync { dataset, pretty } => {
            run_sync(&client, SyncOptions::from_config(&config), dataset, pretty).await
        }
    }
}

async fn run_check(client: &OrdersClient) -> anyhow::Result<()> {
    client.check_auth().await?;
    println!("connection ok");
    Ok(())
}

async fn run_sync(
    client: &OrdersClient,
    options: SyncOptions,
    dataset: Dataset,
    pretty: bool,
) -> anyhow::Result<()> {
    let pipeline = SyncPipeline::new(client, options);
    let run_id = pipeline.run_id();

    let report = tokio::select! {
        report = pipeline.run() => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(%run_id, "interrupted; abandoning in-flight requests");
            anyhow::bail!("sync run {run_id} interrupted");
        }
    };

    if report.is_aborted() {
        anyhow::bail!(
            "sync run {run_id} aborted: {}",
            report.abort_reason.as_deref().unwrap_or("unknown reason")
        );
    }
    if report.partial {
        tracing::warn!(%run_id, "emitting partial datasets");
    }

    output::write_report(&report, dataset, pretty, std::io::stdout().lock())
}

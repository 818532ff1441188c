mod cli;

use anyhow::Context;
use clap::Parser;

use gas_fee_tracker::{api, config::Config, explorer::ExplorerClient, tracker};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let client = ExplorerClient::new(&config.explorer)?;

    match cli.command {
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            api::run_http_server(&bind, api::AppState::new(config, client)).await?;
        }
        Commands::Analyze {
            address,
            max_transactions,
            json,
        } => {
            let mut analysis = config.analysis.clone();
            if let Some(address) = address {
                analysis.contract_address = address;
            }
            if let Some(max) = max_transactions {
                analysis.max_transactions_to_scan = max;
            }

            let result = tracker::analyze(
                &client,
                &analysis,
                config.chart_segments,
                &config.explorer.tx_url_base,
            )
            .await;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("failed to encode result")?
                );
            } else {
                println!("{}", result.result_text);
                for (label, point) in result.chart_series.labels.iter().zip(&result.chart_series.data) {
                    println!("  {:>12}  {:>10.4} Gwei  {}", label, point.value, point.relative_time);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

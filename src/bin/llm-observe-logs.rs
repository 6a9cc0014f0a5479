//! llm-observe-logs
//!
//! Inspects the collection endpoint: prints recent call records or the
//! resolved observation status.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use llm_observe::{ObserveConfig, Observer, format_records, tracing_setup};

#[derive(Parser)]
#[command(name = "llm-observe-logs")]
#[command(about = "Inspect records collected from observed LLM calls", long_about = None)]
#[command(version)]
struct Cli {
    /// Collector base URL
    #[arg(long, global = true, env = "LLM_OBSERVE_URL")]
    url: Option<String>,

    /// Collector access token
    #[arg(long, global = true, env = "LLM_OBSERVE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the most recent records
    Recent {
        /// Number of records to fetch
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Print raw JSON instead of the text summary
        #[arg(long)]
        json: bool,

        /// Maximum characters shown per text field
        #[arg(short, long, default_value_t = 120)]
        width: usize,
    },

    /// Print the resolved configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    tracing_setup::init_tracing();

    let cli = Cli::parse();

    let mut config = ObserveConfig::from_env();
    if let Some(url) = cli.url {
        config.url = Some(url);
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    let observer = Observer::new(config);

    match cli.command {
        Commands::Recent { limit, json, width } => {
            if !observer.config().has_destination() {
                bail!("LLM_OBSERVE_URL and LLM_OBSERVE_TOKEN must both be set");
            }

            let records = observer.get_recent(limit).await;
            tracing::debug!(count = records.len(), "Fetched records");

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", format_records(&records, limit, width));
            }
        }
        Commands::Status => {
            println!("{}", serde_json::to_string_pretty(&observer.status())?);
        }
    }

    Ok(())
}

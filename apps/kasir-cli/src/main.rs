//! # kasir: Command-Line Front End
//!
//! ```text
//! kasir [--db PATH] <COMMAND>
//!
//!   checkout 1:2 3:1              sell 2 × product 1 and 1 × product 3
//!   checkout --json '{"items":[{"product_id":1,"quantity":2}]}'
//!   report                        today's figures
//!   report --start-date 2026-01-01 --end-date 2026-01-31
//!   products [--name kecap]       list the catalog
//!   status                        database health and migrations
//! ```
//!
//! Results are printed to stdout as JSON. Failures print an error body to
//! stderr and exit non-zero. Logs go to stderr, filtered by `RUST_LOG`.

mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kasir_core::{CheckoutItem, CheckoutRequest};
use kasir_db::Database;
use kasir_engine::{CheckoutEngine, ReportEngine};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "kasir", version, about = "Kasir POS checkout and sales reports")]
struct Cli {
    /// Database file (overrides KASIR_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sell a cart atomically
    Checkout {
        /// Cart lines as PRODUCT_ID:QUANTITY
        #[arg(value_parser = parse_item, required_unless_present = "json", conflicts_with = "json")]
        items: Vec<CheckoutItem>,

        /// Cart as a JSON request body
        #[arg(long)]
        json: Option<String>,
    },

    /// Revenue, transaction count and best seller
    Report {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,

        /// Report today (the default without both dates)
        #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
        today: bool,
    },

    /// List products
    Products {
        /// Case-insensitive name filter
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Database health and migration status
    Status,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    healthy: bool,
    migrations_total: usize,
    migrations_applied: usize,
    products: i64,
    transactions: i64,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match serde_json::to_string_pretty(&err.response()) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Output goes to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kasir=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.db {
        config.db_path = path;
    }
    debug!(?config, "Configuration loaded");

    let db = Database::new(config.db_config()).await?;
    let result = dispatch(&db, cli.command).await;
    db.close().await;
    result
}

async fn dispatch(db: &Database, command: Command) -> Result<(), CliError> {
    match command {
        Command::Checkout { items, json } => {
            let items = match json {
                Some(body) => serde_json::from_str::<CheckoutRequest>(&body)?.items,
                None => items,
            };

            let transaction = CheckoutEngine::new(db.store()).execute(&items).await?;
            info!(transaction_id = transaction.id, "Sale recorded");
            print_json(&transaction)
        }

        Command::Report {
            start_date,
            end_date,
            today,
        } => {
            let engine = ReportEngine::new(db.store());
            let report = if today {
                engine.today().await?
            } else {
                engine
                    .generate_parsed(start_date.as_deref(), end_date.as_deref())
                    .await?
            };
            print_json(&report)
        }

        Command::Products { name } => {
            let products = db.products().list(name.as_deref()).await?;
            print_json(&products)
        }

        Command::Status => {
            let (migrations_total, migrations_applied) = db.migration_status().await?;
            let status = StatusReport {
                healthy: db.health_check().await,
                migrations_total,
                migrations_applied,
                products: db.products().count().await?,
                transactions: db.transactions().count().await?,
            };
            print_json(&status)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses `PRODUCT_ID:QUANTITY`. Quantity rules are the engine's job.
fn parse_item(raw: &str) -> Result<CheckoutItem, String> {
    let (id, qty) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PRODUCT_ID:QUANTITY, got '{}'", raw))?;

    let product_id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid product id '{}'", id))?;
    let quantity = qty
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", qty))?;

    Ok(CheckoutItem::new(product_id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("1:2"), Ok(CheckoutItem::new(1, 2)));
        assert_eq!(parse_item(" 3 : 0 "), Ok(CheckoutItem::new(3, 0)));
        assert!(parse_item("1").is_err());
        assert!(parse_item("a:1").is_err());
        assert!(parse_item("1:b").is_err());
    }

    #[test]
    fn test_cli_shape() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["kasir", "checkout", "1:2", "3:1"]).unwrap();
        match cli.command {
            Command::Checkout { items, json } => {
                assert_eq!(items, vec![CheckoutItem::new(1, 2), CheckoutItem::new(3, 1)]);
                assert!(json.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["kasir", "checkout"]).is_err());
        assert!(Cli::try_parse_from(["kasir", "report", "--today", "--start-date", "2026-01-01"]).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_in_memory() {
        let db = Database::new(kasir_db::DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&kasir_core::NewProduct::new("Kecap", 12000, 1))
            .await
            .unwrap();

        dispatch(&db, Command::Checkout { items: vec![CheckoutItem::new(1, 1)], json: None })
            .await
            .unwrap();

        let err = dispatch(
            &db,
            Command::Checkout {
                items: Vec::new(),
                json: Some(r#"{"items":[{"product_id":1,"quantity":1}]}"#.to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let err = dispatch(
            &db,
            Command::Report {
                start_date: Some("kemarin".to_string()),
                end_date: None,
                today: false,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

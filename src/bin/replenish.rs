//! # replenish
//!
//! Builds reorder lists from a JSON snapshot of catalog, sales and stock.
//!
//! ## Usage
//!
//! ```bash
//! # Full prioritised list as of today
//! replenish --snapshot data.json list
//!
//! # Urgent fast movers at store 49, with a custom configuration
//! replenish --snapshot data.json --config replenish.json list --store 49 --velocity fast-mover --urgent
//!
//! # Why is an item (not) on the list?
//! replenish --snapshot data.json explain --store 49 --product 104468
//! ```
//!
//! Logging follows `RUST_LOG` (e.g. `RUST_LOG=anofox_replenish=debug`).

use anofox_replenish::config::EngineConfig;
use anofox_replenish::core::{
    Catalog, ForecastLedger, ForecastResult, ProductId, StoreId, VelocityCategory,
};
use anofox_replenish::engine::{BatchFailure, ReorderFilters, ReplenishmentEngine};
use anofox_replenish::reorder::PurchaseOrder;
use anofox_replenish::source::Snapshot;
use anofox_replenish::utils::AccuracyMetrics;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "replenish")]
#[command(about = "Demand forecasts and reorder recommendations")]
#[command(version)]
struct Args {
    /// JSON snapshot with products, stores, sales and inventory
    #[arg(short, long)]
    snapshot: PathBuf,

    /// JSON engine configuration (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Planning date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prioritised reorder list
    List(ListArgs),
    /// Headline counts for the reorder list
    Summary(ListArgs),
    /// Draft purchase order from the reorder list
    Order {
        #[command(flatten)]
        list: ListArgs,
        /// Item numbers to order; every item with a quantity when omitted
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Explain one product's standing at one store
    Explain {
        #[arg(long)]
        store: String,
        #[arg(long)]
        product: String,
    },
    /// Demand forecasts for every product, scored against actuals if given
    Forecast {
        #[command(flatten)]
        list: ListArgs,
        /// Horizon in days
        #[arg(long, default_value = "30")]
        days: u32,
        /// JSON list of realised demand to score the forecasts against
        #[arg(long)]
        actuals: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Restrict to stores (repeatable)
    #[arg(long = "store")]
    stores: Vec<String>,

    /// Restrict to velocity classes (repeatable)
    #[arg(long = "velocity", value_enum)]
    velocities: Vec<VelocityArg>,

    /// Only urgent items
    #[arg(long)]
    urgent: bool,

    /// Match item number or description
    #[arg(long)]
    search: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VelocityArg {
    FastMover,
    MediumMover,
    SlowMover,
    VerySlowMover,
}

impl From<VelocityArg> for VelocityCategory {
    fn from(arg: VelocityArg) -> Self {
        match arg {
            VelocityArg::FastMover => VelocityCategory::FastMover,
            VelocityArg::MediumMover => VelocityCategory::MediumMover,
            VelocityArg::SlowMover => VelocityCategory::SlowMover,
            VelocityArg::VerySlowMover => VelocityCategory::VerySlowMover,
        }
    }
}

impl ListArgs {
    fn filters(&self) -> ReorderFilters {
        let mut filters = ReorderFilters::new()
            .with_stores(self.stores.iter().map(|s| StoreId::new(s.as_str())))
            .with_velocities(self.velocities.iter().map(|v| VelocityCategory::from(*v)));
        if self.urgent {
            filters = filters.urgent_only();
        }
        if let Some(search) = &self.search {
            filters = filters.with_search(search.as_str());
        }
        filters
    }
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let snapshot = Snapshot::from_path(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let (products, stores, sales, inventory) = snapshot.into_parts();
    info!(products = products.len(), stores = stores.len(), %as_of, "snapshot loaded");

    let engine = ReplenishmentEngine::new(
        config,
        Catalog::new(products),
        stores,
        sales,
        inventory,
        as_of,
    )
    .context("building engine")?;

    match &args.command {
        Command::List(list) => print_json(&engine.batch_reorder_list(&list.filters())),
        Command::Summary(list) => {
            let report = engine.batch_reorder_list(&list.filters());
            print_json(&report.summary(engine.config()))
        }
        Command::Order { list, items } => {
            let report = engine.batch_reorder_list(&list.filters());
            let selected: Vec<ProductId> =
                items.iter().map(|i| ProductId::new(i.as_str())).collect();
            let order = PurchaseOrder::draft(&report.recommendations, engine.catalog(), &selected);
            info!(lines = order.lines.len(), units = order.total_units(), "purchase order drafted");
            print_json(&order)
        }
        Command::Explain { store, product } => {
            let explanation = engine
                .explain(&StoreId::new(store.as_str()), &ProductId::new(product.as_str()))
                .with_context(|| format!("explaining {product} at {store}"))?;
            print_json(&explanation)
        }
        Command::Forecast {
            list,
            days,
            actuals,
        } => {
            let (forecasts, failures) = engine.forecast_batch(&list.filters(), *days);
            info!(forecasts = forecasts.len(), failures = failures.len(), "forecasts issued");

            let accuracy = match actuals {
                Some(path) => {
                    let realised = load_actuals(path)?;
                    let mut ledger = ForecastLedger::new();
                    let run = ledger.record_run(forecasts.iter().cloned());
                    Some(ledger.accuracy(run, &realised).context("scoring forecasts")?)
                }
                None => None,
            };

            print_json(&ForecastOutput {
                forecasts: &forecasts,
                failures: &failures,
                accuracy,
            })
        }
    }
}

#[derive(Serialize)]
struct ForecastOutput<'a> {
    forecasts: &'a [ForecastResult],
    failures: &'a [BatchFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<AccuracyMetrics>,
}

#[derive(Deserialize)]
struct Actual {
    store_id: StoreId,
    product_id: ProductId,
    quantity: f64,
}

fn load_actuals(path: &Path) -> Result<HashMap<(StoreId, ProductId), f64>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading actuals {}", path.display()))?;
    let actuals: Vec<Actual> = serde_json::from_str(&json)
        .with_context(|| format!("parsing actuals {}", path.display()))?;
    Ok(actuals
        .into_iter()
        .map(|a| ((a.store_id, a.product_id), a.quantity))
        .collect())
}

//! CLI entry point for the sales & stock analysis tool.
//!
//! Provides subcommands for the aggregated views: the division overview,
//! the per-category detail table, top/bottom performers, gross-margin
//! analysis, stock-value analysis, and the sales-vs-stock comparison.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sales_stock_engine::analyzers::compare::cross_metric;
use sales_stock_engine::analyzers::derive::combined;
use sales_stock_engine::analyzers::detail::detail_view;
use sales_stock_engine::analyzers::margin::{margin_by_dimension, margin_summary};
use sales_stock_engine::analyzers::pivot::{Aggregation, aggregate_by, pivot};
use sales_stock_engine::analyzers::ranking::{bottom_n, rank, top_n};
use sales_stock_engine::analyzers::types::DerivationKind;
use sales_stock_engine::ingest::load_table;
use sales_stock_engine::normalize::normalize;
use sales_stock_engine::output::{combined_to_csv, print_json, write_comparison_csv};
use sales_stock_engine::record::{Dimension, Metric, Record};
use sales_stock_engine::render;
use sales_stock_engine::selection::Selection;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_stock_engine")]
#[command(about = "Aggregated sales & stock views over a monthly spreadsheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input path plus the record filters shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Path to the sales spreadsheet (.xlsx or .csv)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Restrict to these divisions (repeatable)
    #[arg(long = "division")]
    divisions: Vec<String>,

    /// Restrict to these years (repeatable)
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Restrict to these months (repeatable)
    #[arg(long = "month")]
    months: Vec<String>,

    /// Restrict to these stores (repeatable)
    #[arg(long = "store")]
    stores: Vec<String>,

    /// Restrict to these groupings (repeatable)
    #[arg(long = "grouping")]
    groupings: Vec<String>,
}

impl InputArgs {
    fn selection(&self) -> Selection {
        Selection {
            divisions: self.divisions.clone(),
            years: self.years.clone(),
            months: self.months.clone(),
            stores: self.stores.clone(),
            groupings: self.groupings.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Division sales by month with month-over-month derivations
    Overview {
        #[command(flatten)]
        input: InputArgs,

        /// Also derive percent change per month
        #[arg(long)]
        percentage: bool,

        /// Derive each division's contribution to the grand total
        #[arg(long)]
        contribution: bool,

        /// Write the combined table to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Month-to-month sales for every grouping/store combination
    Detail {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Top and bottom groupings by total sales
    Performers {
        #[command(flatten)]
        input: InputArgs,

        /// Number of entries on each side
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Log the result as JSON instead of printing tables
        #[arg(long)]
        json: bool,
    },
    /// Gross-margin totals, growth rate, and per-dimension breakdowns
    Margin {
        #[command(flatten)]
        input: InputArgs,

        /// Log the result as JSON instead of printing tables
        #[arg(long)]
        json: bool,
    },
    /// Stock value by store plus top/bottom groupings by average stock
    Stock {
        #[command(flatten)]
        input: InputArgs,

        /// Number of entries on each side
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
    /// Compare sales against stock value on a chosen dimension
    Compare {
        #[command(flatten)]
        input: InputArgs,

        /// Comparison basis: Division, Store, or Grouping
        #[arg(short, long, default_value = "division")]
        dimension: String,

        /// Write the comparison table to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

const NO_DATA_MESSAGE: &str = "No data available after applying the selected filters.";

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/sales_stock_engine.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_stock_engine.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Overview {
            input,
            percentage,
            contribution,
            output,
        } => run_overview(&input, percentage, contribution, output.as_deref())?,
        Commands::Detail { input } => run_detail(&input)?,
        Commands::Performers { input, count, json } => run_performers(&input, count, json)?,
        Commands::Margin { input, json } => run_margin(&input, json)?,
        Commands::Stock { input, count } => run_stock(&input, count)?,
        Commands::Compare {
            input,
            dimension,
            output,
        } => run_compare(&input, &dimension, output.as_deref())?,
    }

    Ok(())
}

/// Loads the spreadsheet, normalizes it, and applies the caller's filters.
#[tracing::instrument(skip(args), fields(input = %args.input.display()))]
fn load_records(args: &InputArgs) -> Result<Vec<Record>> {
    let table = load_table(&args.input)?;
    let records = normalize(&table)?;
    let selected = args.selection().apply(&records);

    info!(
        normalized = records.len(),
        selected = selected.len(),
        "Records loaded"
    );
    Ok(selected)
}

fn run_overview(
    input: &InputArgs,
    percentage: bool,
    contribution: bool,
    output: Option<&Path>,
) -> Result<()> {
    let records = load_records(input)?;
    if records.is_empty() {
        warn!("All rows filtered out by the current selection");
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }

    let base = pivot(&records, Dimension::Division, Metric::Sales).with_grand_total();

    let mut kinds = vec![DerivationKind::Difference];
    if percentage {
        kinds.push(DerivationKind::PercentChange);
    }
    if contribution {
        kinds.push(DerivationKind::Contribution);
    }

    let view = combined(base, Metric::Sales.label(), &kinds)?;

    if let Some(path) = output {
        std::fs::write(path, combined_to_csv(&view, "Group")?)?;
        info!(path = %path.display(), "Overview exported");
    }

    println!("{}", render::render_combined(&view, "Group"));
    Ok(())
}

fn run_detail(input: &InputArgs) -> Result<()> {
    let records = load_records(input)?;

    match detail_view(&records) {
        Some(detail) => println!("{}", render::render_detail(&detail)),
        None => {
            warn!("All rows filtered out by the current selection");
            println!("{NO_DATA_MESSAGE}");
        }
    }
    Ok(())
}

fn run_performers(input: &InputArgs, count: usize, json: bool) -> Result<()> {
    let records = load_records(input)?;
    if records.is_empty() {
        warn!("All rows filtered out by the current selection");
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }

    let aggregates = aggregate_by(
        &records,
        Dimension::Grouping,
        Metric::Sales,
        Aggregation::Sum,
    );
    let top = rank(&top_n(&aggregates, count), false);
    let bottom = rank(&bottom_n(&aggregates, count, true), true);

    if json {
        print_json(&serde_json::json!({ "top": top, "bottom": bottom }))?;
        return Ok(());
    }

    println!("Top {count} Grouping by Total Sales");
    println!("{}", render::render_ranking("Grouping", "Total Sales", &top));
    println!();
    println!("Bottom {count} Grouping by Total Sales");
    if bottom.is_empty() {
        println!("No bottom performers with positive sales.");
    } else {
        println!(
            "{}",
            render::render_ranking("Grouping", "Total Sales", &bottom)
        );
    }
    Ok(())
}

fn run_margin(input: &InputArgs, json: bool) -> Result<()> {
    let records = load_records(input)?;

    let Some(summary) = margin_summary(&records) else {
        warn!("All rows filtered out by the current selection");
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    };

    let by_division = margin_by_dimension(&records, Dimension::Division);
    let by_store = margin_by_dimension(&records, Dimension::Store);

    if json {
        print_json(&serde_json::json!({
            "summary": summary,
            "by_division": by_division,
            "by_store": by_store,
        }))?;
        return Ok(());
    }

    println!("{}", render::render_margin_summary(&summary));
    println!();
    println!("Gross Margin % by Division");
    println!("{}", render::render_margin_breakdown("Division", &by_division));
    println!();
    println!("Gross Margin % by Store");
    println!("{}", render::render_margin_breakdown("Store", &by_store));
    Ok(())
}

fn run_stock(input: &InputArgs, count: usize) -> Result<()> {
    let records = load_records(input)?;
    if records.is_empty() {
        warn!("All rows filtered out by the current selection");
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    }

    let base = pivot(&records, Dimension::Store, Metric::StockValue);
    let view = combined(
        base,
        Metric::StockValue.label(),
        &[DerivationKind::Difference],
    )?;
    println!("Stock Value by Store and Month");
    println!("{}", render::render_combined(&view, "Store Name"));

    let averages = aggregate_by(
        &records,
        Dimension::Grouping,
        Metric::StockValue,
        Aggregation::Mean,
    );
    let top = rank(&top_n(&averages, count), false);
    let bottom = rank(&bottom_n(&averages, count, true), true);

    println!();
    println!("Top {count} Grouping by Average Stock Value");
    println!(
        "{}",
        render::render_ranking("Grouping", "Average Stock Value", &top)
    );
    println!();
    println!("Bottom {count} Grouping by Average Stock Value");
    if bottom.is_empty() {
        println!("No bottom performers with positive average stock value.");
    } else {
        println!(
            "{}",
            render::render_ranking("Grouping", "Average Stock Value", &bottom)
        );
    }
    Ok(())
}

fn run_compare(input: &InputArgs, dimension: &str, output: Option<&Path>) -> Result<()> {
    let dimension: Dimension = dimension.parse()?;
    let records = load_records(input)?;

    let Some(table) = cross_metric(&records, dimension, Metric::Sales, Metric::StockValue) else {
        warn!("All rows filtered out by the current selection");
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    };

    if let Some(path) = output {
        write_comparison_csv(path, &table)?;
        info!(path = %path.display(), "Comparison exported");
    }

    println!("{}", render::render_cross_metric(&table));
    Ok(())
}

//! Grid Capital Planner - Main Entry Point

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use grid_capital_planner::chart::ChartOverlay;
use grid_capital_planner::config::Config;
use grid_capital_planner::market::{CsvPriceLoader, PriceSource};
use grid_capital_planner::plan::{compute_capital_plan, CapitalPlan};
use grid_capital_planner::report;
use rust_decimal::Decimal;
use tracing::{error, info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Grid Capital Planner CLI
#[derive(Parser)]
#[command(name = "grid-capital-planner")]
#[command(version, about = "Minimum capital calculation for two-tier grid trading")]
struct Cli {
    /// Config file to load instead of ./config.*
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(flatten)]
    overrides: PlanOverrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Args, Debug, Default)]
struct PlanOverrides {
    /// Instrument symbol (display only)
    #[arg(long, global = true)]
    symbol: Option<String>,

    /// Last buy zone price level
    #[arg(long = "min", global = true)]
    min_price: Option<Decimal>,

    /// Maximum boundary price
    #[arg(long = "max", global = true)]
    max_price: Option<Decimal>,

    /// Contract size of the instrument
    #[arg(long, global = true)]
    contract_size: Option<Decimal>,

    /// Lot size per Fund A zone
    #[arg(long = "lot-a", global = true)]
    lot_size_fund_a: Option<Decimal>,

    /// Lot size per Fund B zone
    #[arg(long = "lot-b", global = true)]
    lot_size_fund_b: Option<Decimal>,

    /// Number of Fund A zones
    #[arg(long = "zones-a", global = true)]
    num_zone_fund_a: Option<u32>,

    /// Number of Fund B zones
    #[arg(long = "zones-b", global = true)]
    num_zone_fund_b: Option<u32>,

    /// Balance in USD
    #[arg(short = 'b', long, global = true)]
    balance: Option<Decimal>,

    /// Asset decimal digits
    #[arg(long = "digits", global = true)]
    asset_digit: Option<u32>,

    /// First action (initial investment) price
    #[arg(short = 'p', long, global = true)]
    first_action_price: Option<Decimal>,
}

impl PlanOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(v) = self.symbol {
            config.instrument.symbol = v;
        }
        if let Some(v) = self.min_price {
            config.grid.min_price = v;
        }
        if let Some(v) = self.max_price {
            config.grid.max_price = v;
        }
        if let Some(v) = self.contract_size {
            config.instrument.contract_size = v;
        }
        if let Some(v) = self.lot_size_fund_a {
            config.grid.lot_size_fund_a = v;
        }
        if let Some(v) = self.lot_size_fund_b {
            config.grid.lot_size_fund_b = v;
        }
        if let Some(v) = self.num_zone_fund_a {
            config.grid.num_zone_fund_a = v;
        }
        if let Some(v) = self.num_zone_fund_b {
            config.grid.num_zone_fund_b = v;
        }
        if let Some(v) = self.balance {
            config.account.balance = v;
        }
        if let Some(v) = self.asset_digit {
            config.instrument.asset_digit = v;
        }
        if let Some(v) = self.first_action_price {
            config.account.first_action_price = v;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the plan and print the summary and allocation table (default)
    Plan,

    /// Write the allocation table to a file
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(short, long)]
        output: String,
    },

    /// Build the chart overlay of the plan against a price history CSV
    Chart {
        /// Path to CSV with timestamp/date and close columns
        #[arg(long)]
        prices: String,

        /// EMA length for the trend line
        #[arg(long)]
        ema: Option<usize>,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging()?;

    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.overrides.apply(&mut config);

    if let Some(Commands::Chart { ema: Some(ema), .. }) = &cli.command {
        config.chart.ema_length = *ema;
    }

    config.validate()?;
    log_config(&config);

    match cli.command.unwrap_or(Commands::Plan) {
        Commands::Plan => run_plan(&config),
        Commands::Export { format, output } => run_export(&config, format, &output),
        Commands::Chart { prices, output, .. } => run_chart(&config, &prices, output.as_deref()),
    }
}

/// Initialize logging to stdout and an hourly rolling file.
fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::hourly("logs", "grid-capital-planner.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep it alive for the program duration
    Box::leak(Box::new(_guard));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("grid_capital_planner=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(file_writer))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .init();

    Ok(())
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("📋 Configuration:");
    info!("   Symbol: {}", config.instrument.symbol);
    info!(
        "   Range: {} - {} ({} digits)",
        config.grid.min_price, config.grid.max_price, config.instrument.asset_digit
    );
    info!("   Contract Size: {}", config.instrument.contract_size);
    info!(
        "   Fund A: {} zones x {} lot",
        config.grid.num_zone_fund_a, config.grid.lot_size_fund_a
    );
    info!(
        "   Fund B: {} zones x {} lot",
        config.grid.num_zone_fund_b, config.grid.lot_size_fund_b
    );
    info!("   Balance: ${}", config.account.balance);
    info!("   First Action Price: {}", config.account.first_action_price);
}

/// Compute the plan, logging validation failures before surfacing them.
fn build_plan(config: &Config) -> Result<CapitalPlan> {
    compute_capital_plan(&config.plan_params()).map_err(|e| {
        error!(code = e.code(), "❌ Invalid configuration: {}", e);
        anyhow::Error::new(e).context("Capital plan rejected")
    })
}

fn run_plan(config: &Config) -> Result<()> {
    let plan = build_plan(config)?;

    println!(
        "Grid Trading Capital Calculation: {}\n",
        config.instrument.symbol
    );
    println!("{}", report::render_summary(&plan, config.instrument.asset_digit));
    println!("Action Level Data");
    print!("{}", report::render_table(&plan.allocation));

    Ok(())
}

fn run_export(config: &Config, format: ExportFormat, output: &str) -> Result<()> {
    let plan = build_plan(config)?;

    match format {
        ExportFormat::Csv => report::write_table_csv(&plan.allocation, output)?,
        ExportFormat::Json => std::fs::write(output, report::plan_to_json(&plan)?)
            .with_context(|| format!("Failed to write JSON file: {}", output))?,
    }

    info!("📁 Allocation table saved to: {}", output);
    Ok(())
}

fn run_chart(config: &Config, prices_path: &str, output: Option<&str>) -> Result<()> {
    info!("📊 Loading prices from: {}", prices_path);
    let loader = CsvPriceLoader::new(prices_path)?;

    if let Some((start, end)) = loader.available_range() {
        info!(
            "   Data range: {} to {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
    }

    let series = loader.load_series()?;
    let plan = build_plan(config)?;

    let overlay = ChartOverlay::build(
        &config.instrument.symbol,
        &series,
        &plan,
        config.account.first_action_price,
        &config.chart,
    );
    let json = overlay.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write chart file: {}", path))?;
            info!("📁 Chart overlay saved to: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

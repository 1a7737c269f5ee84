//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::csv_trade_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::raw_price_combiner::RawPriceCombiner;
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::error::DispoError;
use crate::domain::execution::{DEFAULT_MAX_TRADE_SHARES, DEFAULT_MIN_TRADE_SHARES, LotSizing};
use crate::domain::policy::DispositionPolicy;
use crate::domain::price::PriceTable;
use crate::domain::simulation::{
    DEFAULT_BASE_TRADE_PROBABILITY, DEFAULT_INVESTOR_COUNT, SimulationConfig, run_simulation,
};
use crate::domain::summary::SimulationSummary;
use crate::domain::trade::{TRADE_COLUMNS, TradeRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::trade_sink::TradeSink;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "dispotrader",
    about = "Synthetic investor trade log generator with a disposition effect"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate investors over a combined price table and write the trade log
    Simulate(SimulateArgs),
    /// Combine raw tab-separated daily price files into one CSV
    Combine {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory holding TRD_Dalyr*.txt files
        #[arg(short = 'd', long)]
        raw_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct SimulateArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Combined price CSV
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Trade log CSV to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub investors: Option<usize>,
    #[arg(long)]
    pub probability: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of records to print after the run
    #[arg(long)]
    pub preview: Option<usize>,
    /// Validate config and load prices without simulating
    #[arg(long)]
    pub dry_run: bool,
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the default
/// `dispotrader=info` filter.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dispotrader=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate(args) => run_simulate(&args),
        Command::Combine {
            config,
            raw_dir,
            output,
        } => run_combine(config.as_deref(), raw_dir.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };
    exit_code(result)
}

fn exit_code(result: Result<(), DispoError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DispoError> {
    FileConfigAdapter::from_file(path).map_err(|e| DispoError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, DispoError> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            load_config(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Build the simulation config from file values, falling back to defaults.
/// The result is not yet validated.
pub fn build_simulation_config(config: &dyn ConfigPort) -> Result<SimulationConfig, DispoError> {
    let investor_count = config.get_int(
        "simulation",
        "investor_count",
        DEFAULT_INVESTOR_COUNT as i64,
    );
    let investor_count = usize::try_from(investor_count).map_err(|_| {
        DispoError::invalid(
            "simulation",
            "investor_count",
            "investor_count must be at least 1",
        )
    })?;

    let seed = config
        .get_optional_u64("simulation", "seed")
        .map_err(|raw| {
            DispoError::invalid(
                "simulation",
                "seed",
                format!("seed must be a non-negative integer, got '{raw}'"),
            )
        })?;

    let min_shares = config.get_int(
        "simulation",
        "min_trade_shares",
        DEFAULT_MIN_TRADE_SHARES as i64,
    );
    let max_shares = config.get_int(
        "simulation",
        "max_trade_shares",
        DEFAULT_MAX_TRADE_SHARES as i64,
    );
    let share_count = |key: &str, v: i64| {
        u64::try_from(v)
            .map_err(|_| DispoError::invalid("simulation", key, format!("{key} must be at least 1")))
    };

    let defaults = DispositionPolicy::default();
    Ok(SimulationConfig {
        investor_count,
        base_trade_probability: config.get_double(
            "simulation",
            "base_trade_probability",
            DEFAULT_BASE_TRADE_PROBABILITY,
        ),
        seed,
        policy: DispositionPolicy {
            sell_premium_winner: config.get_double(
                "policy",
                "sell_premium_winner",
                defaults.sell_premium_winner,
            ),
            buy_discount_winner: config.get_double(
                "policy",
                "buy_discount_winner",
                defaults.buy_discount_winner,
            ),
            sell_discount_loser: config.get_double(
                "policy",
                "sell_discount_loser",
                defaults.sell_discount_loser,
            ),
            buy_premium_loser: config.get_double(
                "policy",
                "buy_premium_loser",
                defaults.buy_premium_loser,
            ),
        },
        sizing: LotSizing {
            min_shares: share_count("min_trade_shares", min_shares)?,
            max_shares: share_count("max_trade_shares", max_shares)?,
        },
    })
}

/// Command-line values take precedence over the config file.
pub fn apply_overrides(config: &mut SimulationConfig, args: &SimulateArgs) {
    if let Some(n) = args.investors {
        config.investor_count = n;
    }
    if let Some(p) = args.probability {
        config.base_trade_probability = p;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
}

pub fn resolve_path(
    override_path: Option<&Path>,
    config: &dyn ConfigPort,
    key: &str,
) -> Result<PathBuf, DispoError> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }
    config
        .get_string("paths", key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| DispoError::missing("paths", key))
}

pub fn resolve_preview_rows(override_rows: Option<usize>, config: &dyn ConfigPort) -> usize {
    override_rows.unwrap_or_else(|| {
        usize::try_from(config.get_int("simulation", "preview_rows", DEFAULT_PREVIEW_ROWS as i64))
            .unwrap_or(DEFAULT_PREVIEW_ROWS)
    })
}

fn run_simulate(args: &SimulateArgs) -> Result<(), DispoError> {
    // Stage 1: load and validate config
    let file_config = load_optional_config(args.config.as_deref())?;
    validate_simulation_config(&file_config)?;
    let mut sim_config = build_simulation_config(&file_config)?;
    apply_overrides(&mut sim_config, args);
    sim_config.validate()?;

    // Stage 2: resolve paths
    let input = resolve_path(args.input.as_deref(), &file_config, "input")?;
    let prices = CsvPriceAdapter::new(&input);

    if args.dry_run {
        let table = prices.load_prices()?;
        if table.is_empty() {
            return Err(DispoError::EmptyPriceTable);
        }
        eprintln!("Config validated successfully");
        eprintln!("  investors:   {}", sim_config.investor_count);
        eprintln!("  probability: {}", sim_config.base_trade_probability);
        eprintln!(
            "  seed:        {}",
            sim_config
                .seed
                .map_or_else(|| "entropy".to_string(), |s| s.to_string())
        );
        eprintln!("  input:       {}", prices.path().display());
        eprintln!(
            "  prices:      {} stocks, {} dates, {} quotes",
            table.stock_count(),
            table.date_count(),
            table.quote_count()
        );
        if let Some((first, last)) = date_range(&table) {
            eprintln!("  date range:  {first} to {last}");
        }
        eprintln!("\nDry run complete: configuration is valid");
        return Ok(());
    }

    let output = resolve_path(args.output.as_deref(), &file_config, "output")?;
    let sink = CsvTradeAdapter::new(&output);
    let preview_rows = resolve_preview_rows(args.preview, &file_config);

    // Stages 3-5: load, simulate, persist
    let (summary, preview) = run_simulation_pipeline(&prices, &sink, &sim_config, preview_rows)?;

    print_summary(&summary);
    if !preview.is_empty() {
        print_preview(&preview);
    }
    eprintln!("\nTrade log written to: {}", sink.path().display());
    Ok(())
}

/// Load prices, simulate and write the trade log. Returns the run summary and
/// the first `preview_rows` records.
pub fn run_simulation_pipeline(
    prices: &dyn PricePort,
    sink: &dyn TradeSink,
    config: &SimulationConfig,
    preview_rows: usize,
) -> Result<(SimulationSummary, Vec<TradeRecord>), DispoError> {
    let table = prices.load_prices()?;
    if table.is_empty() {
        return Err(DispoError::EmptyPriceTable);
    }

    let (first, last) = date_range(&table).unzip();
    info!(
        investors = config.investor_count,
        stocks = table.stock_count(),
        dates = table.date_count(),
        first_date = ?first,
        last_date = ?last,
        base_trade_probability = config.base_trade_probability,
        seed = ?config.seed,
        "running simulation"
    );
    let records = run_simulation(&table, config)?;

    let summary = SimulationSummary::from_records(&records, config.investor_count);
    info!(
        records = summary.records,
        buys = summary.buys,
        sells = summary.sells,
        "simulation complete"
    );

    sink.write_trades(&records)?;

    let preview = records.iter().take(preview_rows).cloned().collect();
    Ok((summary, preview))
}

fn date_range(table: &PriceTable) -> Option<(NaiveDate, NaiveDate)> {
    table.first_date().zip(table.last_date())
}

fn print_summary(summary: &SimulationSummary) {
    eprintln!("\n=== Simulation Summary ===");
    eprintln!("Generated {} trading records", summary.records);
    eprintln!(
        "Investors:        {} ({} traded)",
        summary.investors, summary.active_investors
    );
    eprintln!("Stocks traded:    {}", summary.stocks_traded);
    eprintln!(
        "Buys:             {} ({} shares, {:.2})",
        summary.buys, summary.shares_bought, summary.buy_amount
    );
    eprintln!(
        "Sells:            {} ({} shares, {:.2})",
        summary.sells, summary.shares_sold, summary.sell_amount
    );
    eprintln!("Net shares held:  {}", summary.net_shares_held());
    eprintln!("Sell/buy ratio:   {:.3}", summary.sell_buy_ratio());
}

fn print_preview(records: &[TradeRecord]) {
    println!("{}", TRADE_COLUMNS.join(","));
    for record in records {
        println!("{}", record.to_fields().join(","));
    }
}

fn run_combine(
    config_path: Option<&Path>,
    raw_dir: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), DispoError> {
    let file_config = load_optional_config(config_path)?;
    let raw_dir = resolve_path(raw_dir, &file_config, "raw_dir")?;
    // the combined file is the simulation input
    let output = resolve_path(output, &file_config, "input")?;

    let report = RawPriceCombiner::new(&raw_dir).combine(&output)?;

    for file in &report.files {
        eprintln!("  {}: {} rows", file.file.display(), file.rows);
    }
    for skipped in &report.skipped {
        eprintln!("  skipped {}: {}", skipped.file.display(), skipped.reason);
    }
    eprintln!("\nTotal number of rows: {}", report.total_rows);
    eprintln!("Combined data saved to: {}", output.display());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), DispoError> {
    eprintln!("Validating config: {}", config_path.display());
    let file_config = load_config(config_path)?;
    validate_simulation_config(&file_config)?;
    let sim_config = build_simulation_config(&file_config)?;
    sim_config.validate()?;

    eprintln!("\n[simulation]");
    eprintln!("  investor_count:         {}", sim_config.investor_count);
    eprintln!(
        "  base_trade_probability: {}",
        sim_config.base_trade_probability
    );
    match sim_config.seed {
        Some(seed) => eprintln!("  seed:                   {seed}"),
        None => eprintln!("  seed:                   (entropy)"),
    }
    eprintln!(
        "  trade size:             {}..={}",
        sim_config.sizing.min_shares, sim_config.sizing.max_shares
    );
    eprintln!("\n[policy]");
    for (key, value) in sim_config.policy.multipliers() {
        eprintln!("  {key:<22}  {value}");
    }
    for key in ["input", "output", "raw_dir"] {
        if let Some(path) = file_config.get_string("paths", key) {
            eprintln!("  paths.{key}: {path}");
        }
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

use adxbt::prelude::*;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adxbt")]
#[command(about = "A Rust-based ADX trend-following strategy backtester", long_about = None)]
struct Cli {
    //path to csv data file
    data: PathBuf,

    //optional strategy config json, overridden by explicit flags
    #[arg(long)]
    config: Option<PathBuf>,

    //wilder smoothing period
    #[arg(long)]
    period: Option<usize>,

    //minimum adx for entries
    #[arg(long)]
    adx_threshold: Option<f64>,

    //time stop in trading days
    #[arg(long)]
    max_holding_days: Option<usize>,

    //output path for the closed-trades csv
    #[arg(long)]
    output_trades_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_backtest(cli)
}

fn run_backtest(cli: Cli) -> Result<()> {
    println!("Adxbt ADX Trend Backtester");
    println!("==========================\n");

    //assemble config: file first, then flag overrides
    let mut config = match &cli.config {
        Some(path) => StrategyConfig::from_json_file(path)
            .context(format!("Failed to load config from {:?}", path))?,
        None => StrategyConfig::default(),
    };
    if let Some(period) = cli.period {
        config.period = period;
    }
    if let Some(threshold) = cli.adx_threshold {
        config.adx_threshold = threshold;
    }
    if let Some(days) = cli.max_holding_days {
        config.max_holding_days = days;
    }
    config.validate().context("Invalid strategy parameters")?;

    //load data
    println!("Loading data from {:?}...", cli.data);
    let bars = load_csv(&cli.data).context(format!("Failed to load data from {:?}", cli.data))?;

    if bars.is_empty() {
        anyhow::bail!("No usable rows in {:?}", cli.data);
    }

    println!("Loaded {} bars", bars.len());
    println!(
        "Date range: {} to {}\n",
        bars.first().unwrap().timestamp,
        bars.last().unwrap().timestamp
    );

    if bars.len() < config.min_bars() {
        println!(
            "Warning: {} bars is below the {} needed to seed the indicators",
            bars.len(),
            config.min_bars()
        );
    }

    println!(
        "Strategy: ADX trend (period={}, threshold={}, max holding={} days)\n",
        config.period, config.adx_threshold, config.max_holding_days
    );

    //run backtest
    println!("Running backtest...\n");
    let engine = BacktestEngine::new(config, bars);
    let result = engine.run();

    //display results
    match &result.summary {
        Some(summary) => {
            println!("Backtest Results");
            println!("================\n");
            summary.pretty_print_table();
            println!();
            summary.print_headline();
        }
        None => println!("No trades executed!"),
    }

    //save trades if requested
    if let Some(trades_path) = &cli.output_trades_csv {
        save_trades_csv(&result.trades, trades_path)?;
        println!("\nTrades saved to {:?}", trades_path);
    }

    Ok(())
}

fn save_trades_csv(trades: &[Trade], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(
        file,
        "entry_time,exit_time,entry_price,exit_price,direction,profit_pct,bars_held,adx_entry,adx_exit"
    )?;

    for trade in trades {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            trade.entry_time.to_rfc3339(),
            trade.exit_time.to_rfc3339(),
            trade.entry_price,
            trade.exit_price,
            trade.direction.as_str(),
            trade.profit_pct,
            trade.bars_held,
            trade.adx_entry,
            trade.adx_exit
        )?;
    }

    Ok(())
}

//! Print the portfolio risk report for a seed
//!
//! The series is drawn exactly as the server draws it, so the same seed,
//! profile and end date reproduce `/api/market-risk`.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use risksight::portfolio::compute_portfolio_risk_report;
use risksight::scoring::format_currency;
use risksight::synthetic::market_series;
use risksight::DashboardConfig;

#[derive(Parser, Debug)]
#[command(about = "Value-at-risk and performance metrics for a seeded return series")]
struct Args {
    #[arg(long, env = "RISKSIGHT_SEED", default_value_t = 42)]
    seed: u64,

    /// Business days in the series
    #[arg(long, default_value_t = 252)]
    days: usize,

    /// Portfolio notional in dollars
    #[arg(long, default_value_t = 10_000_000.0)]
    base: f64,

    /// Last market date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Use the reduced dataset profile of `risksight --quick`
    #[arg(long)]
    quick: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let profile = if args.quick {
        DashboardConfig::quick()
    } else {
        DashboardConfig::default()
    };
    let mut sizes = profile.sizes;
    sizes.market_days = args.days;
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());

    let series = market_series(args.seed, &sizes, args.base, end).context("failed to generate returns")?;
    let report = compute_portfolio_risk_report(&series, args.base).context("failed to compute report")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Portfolio Risk Report");
    println!("=====================\n");
    println!("  Observations:    {}", series.len());
    println!("  Base value:      {}", format_currency(report.base_value));
    println!("  VaR 95% (1-day): {}", format_currency(report.var_95));
    println!("  VaR 99% (1-day): {}", format_currency(report.var_99));
    println!("  CVaR 95%:        {}", format_currency(report.cvar_95));
    println!("  Volatility:      {:.2}%", report.volatility * 100.0);
    match report.sharpe {
        Some(sharpe) => println!("  Sharpe ratio:    {:.2}", sharpe),
        None => println!("  Sharpe ratio:    unavailable"),
    }
    println!("  Max drawdown:    {:.2}%", report.max_drawdown * 100.0);
    println!("  Rolling VaR:     {} of {} days defined", report.rolling_defined(), series.len());
    Ok(())
}

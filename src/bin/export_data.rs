//! Write the synthetic datasets behind the dashboard to CSV files

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use risksight::synthetic::{export_all, generate};
use risksight::DashboardConfig;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Export synthetic credit, fraud, insurance and market data")]
struct Args {
    /// Output directory
    #[arg(long, default_value = "data")]
    out: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Last market date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    market_end: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let config = DashboardConfig::default().with_seed(args.seed);
    let end = args.market_end.unwrap_or_else(|| Local::now().date_naive());

    let data = generate(config.seed, &config.sizes, config.base_value, end)
        .context("failed to generate synthetic data")?;
    let paths = export_all(&data, &args.out)
        .with_context(|| format!("failed to export to {}", args.out.display()))?;

    for path in &paths {
        println!("Wrote {}", path.display());
    }
    println!("Exported {} files in {:?}", paths.len(), start.elapsed());
    Ok(())
}

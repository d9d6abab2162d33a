//! RiskSight dashboard server
//!
//! Builds the risk context once, then serves the scoring API and dashboard
//! aggregates over HTTP.

use anyhow::Context;
use clap::Parser;
use log::info;
use risksight::server::{router, AppState};
use risksight::{DashboardConfig, RiskContext};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "risksight", about = "Banking and insurance risk dashboard server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "RISKSIGHT_HOST")]
    host: Option<String>,

    /// Port to listen on; falls back to PORT when unset
    #[arg(long, env = "RISKSIGHT_PORT")]
    port: Option<u16>,

    /// Seed for synthetic data and model training
    #[arg(long, env = "RISKSIGHT_SEED")]
    seed: Option<u64>,

    /// Smaller datasets and ensembles for a fast start
    #[arg(long)]
    quick: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let defaults = if args.quick {
        DashboardConfig::quick()
    } else {
        DashboardConfig::default()
    };
    // Flags and RISKSIGHT_* are resolved by clap; only the bare PORT fallback is left
    let mut config = defaults.with_env(|key| match key {
        "PORT" => std::env::var(key).ok(),
        _ => None,
    });
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    info!("RiskSight starting (seed {}, quick profile: {})", config.seed, args.quick);
    let ctx = RiskContext::build(&config).context("failed to build risk context")?;
    let app = router(AppState::new(Arc::new(ctx)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
        let port = Args::command()
            .get_arguments()
            .find(|arg| arg.get_id() == "port")
            .and_then(|arg| arg.get_env().map(|name| name.to_os_string()));
        assert_eq!(port.as_deref(), Some(std::ffi::OsStr::new("RISKSIGHT_PORT")));
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::try_parse_from(["risksight", "--port", "9000", "--seed", "7", "--quick"]).unwrap();
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.seed, Some(7));
        assert!(args.quick);
    }
}

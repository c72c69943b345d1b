use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use epistula_core::search::ScoringWeights;
use server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory holding the built artifacts
    #[arg(long, default_value = "./public")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// JSON file overriding scoring weights
    #[arg(long)]
    weights: Option<PathBuf>,
}

fn load_weights(path: Option<&PathBuf>) -> Result<ScoringWeights> {
    let Some(path) = path else { return Ok(ScoringWeights::default()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let weights = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(weights)
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let weights = load_weights(args.weights.as_ref())?;
    tracing::info!(?weights, "scoring weights");
    let app: Router = build_app(args.index.clone(), weights)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

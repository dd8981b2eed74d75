use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use boxdstats::api;
use boxdstats::app::AppContext;
use boxdstats::config::Config;

#[derive(Parser)]
#[command(name = "boxdstats", about = "Letterboxd stats scraping API")]
struct Cli {
    /// Bind address, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Bind port, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let ctx = Arc::new(AppContext::new(config)?);
    api::serve(ctx).await
}

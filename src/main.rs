mod cli;

use clap::Parser;

use hobbyapp::bootstrap::config::load_effective_config;
use hobbyapp::bootstrap::tracing::init_tracing_subscriber;
use hobbyapp::bootstrap::wiring::{build_app, default_data_root};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_effective_config(cli.config.as_deref())?;
    let data_root = default_data_root(&config)?;
    init_tracing_subscriber(Some(&data_root))?;

    let wired = build_app(&config, &data_root)?;
    wired.app.start().await;

    let result = cli::run(cli.command, &wired, cli.json).await;
    wired.app.shutdown().await;
    result
}

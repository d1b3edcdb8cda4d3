use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod render;
mod store;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Log to stderr so the alternate screen on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("txview=info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = config::Config::from_env()?;
    info!(
        "txview starting against {} (date unit: {:?}, timeout: {:?})",
        config.base_url, config.date_unit, config.timeout
    );

    let client = api::TransactionsClient::new(&config)?;
    ui::run(client).await
}

use deliverance_receipts::{
    bot::{self, BotData},
    config,
    core::{content::ContentStore, export::Exporter, payment::ReceiptBook},
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!(
        "Loaded configuration for {}",
        app_config.organization.name
    );

    // 4. Build the in-memory stores and the exporter
    let content = ContentStore::from_config(&app_config);
    let organization = Arc::new(app_config.organization);
    let exporter = Exporter::new(Arc::clone(&organization), app_config.export);
    let data = BotData::new(exporter, ReceiptBook::new(), content, organization);

    // 5. Run the bot; the token is read directly before use, never stored in config
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, data).await
}

//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the giving receipts bot,
//! including all slash commands, autocomplete handlers, receipt delivery and
//! bot context management.

/// Discord command implementations (giving, content, manage, general)
pub mod commands;
/// Turns exporter output into Discord attachments
pub mod delivery;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::Organization,
    core::{content::ContentStore, export::Exporter, payment::ReceiptBook},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Receipt export channels
    pub exporter: Exporter,
    /// Receipts issued since startup
    pub receipts: ReceiptBook,
    /// Announcements, events and other site content
    pub content: ContentStore,
    /// Organization details shown in replies
    pub organization: Arc<Organization>,
}

impl BotData {
    /// Creates a new `BotData` instance from its parts.
    #[must_use]
    pub const fn new(
        exporter: Exporter,
        receipts: ReceiptBook,
        content: ContentStore,
        organization: Arc<Organization>,
    ) -> Self {
        Self {
            exporter,
            receipts,
            content,
            organization,
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Starts the bot and runs until the gateway connection ends.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::give(),
                commands::receipt(),
                commands::announcements(),
                commands::events(),
                commands::programs(),
                commands::publications(),
                commands::gallery(),
                commands::manage(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't touch receipts or content.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let organization = &ctx.data().organization;
        let help_text = format!(
            "**{} Help**\n\
            Here is a summary of all available commands.\n\n\
            **Giving**\n\
            • `/give <name> <email> <type> <amount> <method> <detail> [notes]` - Records a gift and issues a receipt.\n\
            • `/receipt <transaction_id> <format>` - Downloads a receipt as pdf, word or print.\n\n\
            **Church Life**\n\
            • `/announcements [limit]` - Latest announcements.\n\
            • `/events` - Featured special events.\n\
            • `/programs` - Weekly programs, Sunday to Saturday.\n\
            • `/publications` - Featured publications.\n\
            • `/gallery` - Featured photos.\n\n\
            **Management Commands**\n\
            • `/manage <subcommand>` - Add, edit or remove content, search announcements, dashboard stats.\n\n\
            **Utility Commands**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.\n\n\
            {}",
            organization.name, organization.contact_line()
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

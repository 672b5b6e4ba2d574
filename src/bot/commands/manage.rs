//! Management Discord commands - `/manage` and its subcommands.
//!
//! Content edits only change the in-memory store; they are lost on restart.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::content::{
            AnnouncementEdit, EventEdit, PublicationEdit, parse_content_date,
        },
        entities::{Announcement, Priority, Publication, PublicationKind, SpecialEvent},
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing church content.
    #[poise::command(
        slash_command,
        default_member_permissions = "MANAGE_GUILD",
        subcommands(
            "manage_add_announcement",
            "manage_edit_announcement",
            "manage_remove_announcement",
            "manage_add_event",
            "manage_edit_event",
            "manage_remove_event",
            "manage_add_publication",
            "manage_edit_publication",
            "manage_remove_publication",
            "manage_search",
            "manage_stats"
        )
    )]
    pub async fn manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Content management command. Available subcommands:\n\
            `/manage add_announcement` - Post a new announcement\n\
            `/manage edit_announcement` - Change an announcement\n\
            `/manage remove_announcement` - Remove an announcement\n\
            `/manage add_event` - Schedule a special event\n\
            `/manage edit_event` - Change a special event\n\
            `/manage remove_event` - Remove a special event\n\
            `/manage add_publication` - Publish a download\n\
            `/manage edit_publication` - Change a publication\n\
            `/manage remove_publication` - Remove a publication\n\
            `/manage search` - Search announcements\n\
            `/manage stats` - Dashboard overview";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Posts a new announcement.
    #[poise::command(slash_command, rename = "add_announcement")]
    pub async fn manage_add_announcement(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Headline"] title: String,
        #[description = "Announcement text"] content: String,
        #[description = "Urgency"] priority: Priority,
        #[description = "Posted by (defaults to you)"] author: Option<String>,
        #[description = "Category (e.g., Youth)"] category: Option<String>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        if title.trim().is_empty() || content.trim().is_empty() {
            ctx.say("❌ Title and content cannot be empty.").await?;
            return Ok(());
        }

        let date = match date.as_deref().map(str::trim) {
            None | Some("") => chrono::Local::now().date_naive(),
            Some(value) => match parse_content_date(value) {
                Ok(date) => date,
                Err(e) => return reply_rejected(ctx, e).await,
            },
        };

        let announcement = Announcement {
            id: 0,
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            date,
            priority,
            author: author.unwrap_or_else(|| ctx.author().name.clone()),
            category: category.filter(|c| !c.trim().is_empty()),
        };

        let items = ctx.data().content.announcements.insert(announcement).await;
        let id = items.last().map_or(0, |a| a.id);
        ctx.say(format!(
            "✅ Announcement '{}' posted (ID {id}).",
            title.trim()
        ))
        .await?;
        Ok(())
    }

    /// Changes an announcement. Omitted options keep their current value.
    #[poise::command(slash_command, rename = "edit_announcement")]
    pub async fn manage_edit_announcement(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Announcement ID"] id: u32,
        #[description = "New headline"] title: Option<String>,
        #[description = "New announcement text"] content: Option<String>,
        #[description = "New urgency"] priority: Option<Priority>,
        #[description = "New category (blank clears it)"] category: Option<String>,
        #[description = "New date as YYYY-MM-DD"] date: Option<String>,
    ) -> Result<()> {
        let date = match parse_optional_date(date.as_deref()) {
            Ok(date) => date,
            Err(e) => return reply_rejected(ctx, e).await,
        };
        let edit = AnnouncementEdit {
            title,
            content,
            date,
            priority,
            category,
        };
        let result = ctx
            .data()
            .content
            .announcements
            .edit(id, |announcement| edit.apply(announcement))
            .await;
        reply_edited(ctx, result.map(|a| a.title)).await
    }

    /// Removes an announcement by ID.
    #[poise::command(slash_command, rename = "remove_announcement")]
    pub async fn manage_remove_announcement(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Announcement ID"] id: u32,
    ) -> Result<()> {
        let result = ctx.data().content.announcements.remove(id).await;
        reply_removed(ctx, result.map(|items| items.len())).await
    }

    /// Schedules a new special event.
    #[poise::command(slash_command, rename = "add_event")]
    pub async fn manage_add_event(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Event name"] title: String,
        #[description = "What happens at the event"] description: String,
        #[description = "Date as YYYY-MM-DD"] date: String,
        #[description = "Time as displayed (e.g., 9:00 AM - 2:00 PM)"] time: String,
        #[description = "Where it takes place"] location: String,
        #[description = "Attendees must register"] registration_required: Option<bool>,
        #[description = "Show on the landing page"] featured: Option<bool>,
    ) -> Result<()> {
        if [&title, &description, &time, &location]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            ctx.say("❌ Title, description, time and location cannot be empty.")
                .await?;
            return Ok(());
        }
        let date = match parse_content_date(&date) {
            Ok(date) => date,
            Err(e) => return reply_rejected(ctx, e).await,
        };

        let event = SpecialEvent {
            id: 0,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            date,
            time: time.trim().to_string(),
            location: location.trim().to_string(),
            registration_required: registration_required.unwrap_or(false),
            featured: featured.unwrap_or(false),
        };

        let items = ctx.data().content.events.insert(event).await;
        let id = items.last().map_or(0, |e| e.id);
        ctx.say(format!("✅ Event '{}' scheduled (ID {id}).", title.trim()))
            .await?;
        Ok(())
    }

    /// Changes a special event. Omitted options keep their current value.
    #[poise::command(slash_command, rename = "edit_event")]
    pub async fn manage_edit_event(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Event ID"] id: u32,
        #[description = "New name"] title: Option<String>,
        #[description = "New description"] description: Option<String>,
        #[description = "New date as YYYY-MM-DD"] date: Option<String>,
        #[description = "New time"] time: Option<String>,
        #[description = "New location"] location: Option<String>,
        #[description = "Attendees must register"] registration_required: Option<bool>,
        #[description = "Show on the landing page"] featured: Option<bool>,
    ) -> Result<()> {
        let date = match parse_optional_date(date.as_deref()) {
            Ok(date) => date,
            Err(e) => return reply_rejected(ctx, e).await,
        };
        let edit = EventEdit {
            title,
            description,
            date,
            time,
            location,
            registration_required,
            featured,
        };
        let result = ctx
            .data()
            .content
            .events
            .edit(id, |event| edit.apply(event))
            .await;
        reply_edited(ctx, result.map(|e| e.title)).await
    }

    /// Removes a special event by ID.
    #[poise::command(slash_command, rename = "remove_event")]
    pub async fn manage_remove_event(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Event ID"] id: u32,
    ) -> Result<()> {
        let result = ctx.data().content.events.remove(id).await;
        reply_removed(ctx, result.map(|items| items.len())).await
    }

    /// Adds a downloadable publication.
    #[poise::command(slash_command, rename = "add_publication")]
    pub async fn manage_add_publication(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Title"] title: String,
        #[description = "Summary"] description: String,
        #[description = "Format"] kind: PublicationKind,
        #[description = "Publication date as YYYY-MM-DD"] publish_date: String,
        #[description = "Author or team"] author: String,
        #[description = "Download link"] download_url: String,
        #[description = "Show on the landing page"] featured: Option<bool>,
    ) -> Result<()> {
        if [&title, &description, &author, &download_url]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            ctx.say("❌ Title, summary, author and download link cannot be empty.")
                .await?;
            return Ok(());
        }
        let publish_date = match parse_content_date(&publish_date) {
            Ok(date) => date,
            Err(e) => return reply_rejected(ctx, e).await,
        };

        let publication = Publication {
            id: 0,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            kind,
            publish_date,
            author: author.trim().to_string(),
            download_url: download_url.trim().to_string(),
            featured: featured.unwrap_or(false),
        };

        let items = ctx.data().content.publications.insert(publication).await;
        let id = items.last().map_or(0, |p| p.id);
        ctx.say(format!("✅ Publication '{}' added (ID {id}).", title.trim()))
            .await?;
        Ok(())
    }

    /// Changes a publication. Omitted options keep their current value.
    #[poise::command(slash_command, rename = "edit_publication")]
    pub async fn manage_edit_publication(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Publication ID"] id: u32,
        #[description = "New title"] title: Option<String>,
        #[description = "New summary"] description: Option<String>,
        #[description = "New format"] kind: Option<PublicationKind>,
        #[description = "New publication date as YYYY-MM-DD"] publish_date: Option<String>,
        #[description = "New author"] author: Option<String>,
        #[description = "New download link"] download_url: Option<String>,
        #[description = "Show on the landing page"] featured: Option<bool>,
    ) -> Result<()> {
        let publish_date = match parse_optional_date(publish_date.as_deref()) {
            Ok(date) => date,
            Err(e) => return reply_rejected(ctx, e).await,
        };
        let edit = PublicationEdit {
            title,
            description,
            kind,
            publish_date,
            author,
            download_url,
            featured,
        };
        let result = ctx
            .data()
            .content
            .publications
            .edit(id, |publication| edit.apply(publication))
            .await;
        reply_edited(ctx, result.map(|p| p.title)).await
    }

    /// Removes a publication by ID.
    #[poise::command(slash_command, rename = "remove_publication")]
    pub async fn manage_remove_publication(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Publication ID"] id: u32,
    ) -> Result<()> {
        let result = ctx.data().content.publications.remove(id).await;
        reply_removed(ctx, result.map(|items| items.len())).await
    }

    fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_content_date(value).map(Some),
        }
    }

    async fn reply_rejected(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
        let reason = match error {
            Error::InvalidForm { message } => message,
            other => other.to_string(),
        };
        ctx.say(format!("❌ {reason}.")).await?;
        Ok(())
    }

    async fn reply_edited(
        ctx: poise::Context<'_, BotData, Error>,
        result: Result<String>,
    ) -> Result<()> {
        match result {
            Ok(title) => {
                ctx.say(format!("✅ '{title}' updated.")).await?;
                Ok(())
            }
            Err(e @ Error::NotFound { .. }) => {
                ctx.say(format!("❌ {e}")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn reply_removed(
        ctx: poise::Context<'_, BotData, Error>,
        result: Result<usize>,
    ) -> Result<()> {
        match result {
            Ok(remaining) => {
                ctx.say(format!("✅ Removed. {remaining} remaining.")).await?;
                Ok(())
            }
            Err(e @ Error::NotFound { .. }) => {
                ctx.say(format!("❌ {e}")).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Searches announcements by title, optionally filtered by priority.
    #[poise::command(slash_command, rename = "search")]
    pub async fn manage_search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to look for in titles"] query: Option<String>,
        #[description = "Only this priority"] priority: Option<Priority>,
    ) -> Result<()> {
        let matches = ctx
            .data()
            .content
            .search_announcements(query.as_deref().unwrap_or(""), priority)
            .await;

        if matches.is_empty() {
            ctx.say("No matching announcements.").await?;
            return Ok(());
        }

        let mut text = format!("**{} matching announcement(s)**\n", matches.len());
        for a in &matches {
            writeln!(
                &mut text,
                "`#{}` {} ({:?}, {})",
                a.id,
                a.title,
                a.priority,
                a.date.format("%Y-%m-%d")
            )?;
        }
        ctx.say(text).await?;
        Ok(())
    }

    /// Shows content counts and recent activity.
    #[poise::command(slash_command, rename = "stats")]
    pub async fn manage_stats(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let stats = data.content.stats().await;
        let receipts = data.receipts.len().await;

        let mut activity = String::new();
        for entry in data.content.recent_activity().await {
            writeln!(
                &mut activity,
                "{} · {} ({})",
                entry.kind,
                entry.title,
                entry.date.format("%b %-d, %Y")
            )?;
        }
        if activity.is_empty() {
            activity.push_str("Nothing yet.");
        }

        let embed = serenity::CreateEmbed::default()
            .title("📊 Dashboard")
            .color(0x0037_4151)
            .field("Announcements", stats.announcements.to_string(), true)
            .field("Events", stats.events.to_string(), true)
            .field("Programs", stats.programs.to_string(), true)
            .field("Publications", stats.publications.to_string(), true)
            .field("Gallery", stats.gallery.to_string(), true)
            .field("Featured", stats.featured.to_string(), true)
            .field("Receipts issued", receipts.to_string(), true)
            .field("Recent Activity", activity, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;

//! Content Discord commands - announcements, events, programs, publications
//! and the photo gallery, as shown on the church landing page.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::content::DEFAULT_ANNOUNCEMENT_LIMIT,
        entities::{Priority, PublicationKind},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Discord's per-embed field limit
    const MAX_FIELDS: usize = 25;

    async fn send_list(
        ctx: poise::Context<'_, BotData, Error>,
        title: &str,
        empty: &str,
        fields: Vec<(String, String, bool)>,
    ) -> Result<()> {
        if fields.is_empty() {
            ctx.say(empty).await?;
            return Ok(());
        }

        let embed = serenity::CreateEmbed::default()
            .title(title)
            .color(0x0005_9669)
            .fields(fields.into_iter().take(MAX_FIELDS))
            .footer(serenity::CreateEmbedFooter::new(
                ctx.data().organization.name.as_str(),
            ));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    const fn priority_badge(priority: Priority) -> &'static str {
        match priority {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }

    const fn kind_label(kind: PublicationKind) -> &'static str {
        match kind {
            PublicationKind::Newsletter => "Newsletter",
            PublicationKind::Bulletin => "Bulletin",
            PublicationKind::Magazine => "Magazine",
            PublicationKind::Book => "Book",
        }
    }

    /// Shows the latest announcements, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn announcements(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many to show (default 4)"]
        #[min = 1]
        #[max = 25]
        limit: Option<u8>,
    ) -> Result<()> {
        let limit = limit.map_or(DEFAULT_ANNOUNCEMENT_LIMIT, usize::from);
        let fields = ctx
            .data()
            .content
            .latest_announcements(limit)
            .await
            .into_iter()
            .map(|a| {
                let category = a
                    .category
                    .as_deref()
                    .map(|category| format!(" · {category}"))
                    .unwrap_or_default();
                (
                    format!("{} {}", priority_badge(a.priority), a.title),
                    format!(
                        "{}\n*{} · {}{category}*",
                        a.content,
                        a.date.format("%B %-d, %Y"),
                        a.author
                    ),
                    false,
                )
            })
            .collect();

        send_list(ctx, "📢 Announcements", "No announcements right now.", fields).await
    }

    /// Shows featured special events.
    #[poise::command(slash_command, prefix_command)]
    pub async fn events(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let fields = ctx
            .data()
            .content
            .featured_events()
            .await
            .into_iter()
            .map(|e| {
                let registration = if e.registration_required {
                    "\nRegistration required"
                } else {
                    ""
                };
                (
                    e.title,
                    format!(
                        "{}\n📅 {} · {}\n📍 {}{registration}",
                        e.description,
                        e.date.format("%A, %B %-d, %Y"),
                        e.time,
                        e.location
                    ),
                    false,
                )
            })
            .collect();

        send_list(ctx, "🎉 Special Events", "No upcoming special events.", fields).await
    }

    /// Shows the weekly programs from Sunday to Saturday.
    #[poise::command(slash_command, prefix_command)]
    pub async fn programs(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let fields = ctx
            .data()
            .content
            .weekly_programs()
            .await
            .into_iter()
            .map(|p| {
                (
                    format!("{} · {}", p.day, p.title),
                    format!("{}\n🕒 {} · 📍 {}\nLed by {}", p.description, p.time, p.location, p.leader),
                    false,
                )
            })
            .collect();

        send_list(ctx, "🗓️ Weekly Programs", "No weekly programs scheduled.", fields).await
    }

    /// Shows featured publications, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn publications(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let fields = ctx
            .data()
            .content
            .featured_publications()
            .await
            .into_iter()
            .map(|p| {
                (
                    format!("{} ({})", p.title, kind_label(p.kind)),
                    format!(
                        "{}\n*{} · {}*\n[Download]({})",
                        p.description,
                        p.author,
                        p.publish_date.format("%B %-d, %Y"),
                        p.download_url
                    ),
                    false,
                )
            })
            .collect();

        send_list(ctx, "📚 Publications", "No featured publications.", fields).await
    }

    /// Shows featured gallery photos.
    #[poise::command(slash_command, prefix_command)]
    pub async fn gallery(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let fields = ctx
            .data()
            .content
            .featured_gallery()
            .await
            .into_iter()
            .map(|image| (image.title, format!("{} · [View]({})", image.category, image.url), true))
            .collect();

        send_list(ctx, "📸 Gallery", "The gallery is empty.", fields).await
    }
}

pub use inner::*;

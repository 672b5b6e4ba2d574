//! Giving Discord commands - `give` and `receipt`.
//!
//! `give` runs a (simulated) payment through form intake and shows the receipt;
//! `receipt` exports an issued receipt through one of the export channels.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, delivery::ReplyDelivery, handlers::autocomplete},
        core::{
            export::{ExportFormat, ExportOutcome},
            payment::PaymentForm,
            render::ReceiptView,
        },
        entities::PaymentType,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Records a tithe or offering and issues a receipt.
    ///
    /// No money moves: the payment is simulated and the receipt is kept in memory
    /// until the bot restarts. The detail is the card number, mobile number or
    /// bank reference, depending on the method.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command)]
    pub async fn give(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your full name"] name: String,
        #[description = "Your email address"] email: String,
        #[description = "Tithe or offering"] payment_type: PaymentType,
        #[description = "Amount (e.g., 50.00)"] amount: String,
        #[description = "card, mobile or bank"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
        #[description = "Card number, mobile number or bank reference"] detail: String,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        let mut form = PaymentForm {
            member_email: email,
            member_name: name,
            payment_type,
            amount,
            notes: notes.unwrap_or_default(),
            ..PaymentForm::default()
        };
        match method.trim() {
            "card" => form.card_number = detail,
            "mobile" => form.mobile_number = detail,
            "bank" => form.reference = detail,
            _ => {}
        }
        form.payment_method = method;

        let member = ctx.author().id.to_string();
        let record = match ctx
            .data()
            .receipts
            .issue(form, &chrono::Local::now(), &member)
            .await
        {
            Ok(record) => record,
            Err(e @ (Error::InvalidForm { .. } | Error::UnknownPaymentMethod { .. })) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ {e}"))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let view = ctx.data().exporter.render(&record);
        let embed = receipt_embed(&view).footer(serenity::CreateEmbedFooter::new(format!(
            "Use /receipt {} to download a copy",
            record.transaction_id
        )));

        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Downloads a receipt as PDF, Word document or print page.
    #[poise::command(slash_command)]
    pub async fn receipt(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID shown on the receipt"]
        #[autocomplete = "autocomplete::autocomplete_transaction_id"]
        transaction_id: String,
        #[description = "Export format"] format: ExportFormat,
    ) -> Result<()> {
        let data = ctx.data();
        let member = ctx.author().id.to_string();
        let record = match data.receipts.get(&transaction_id, &member).await {
            Ok(record) => record,
            Err(Error::NotFound { .. }) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ No receipt found for '{transaction_id}'."))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Exports can take a moment; keep the interaction alive.
        ctx.defer_ephemeral().await?;

        let delivery = ReplyDelivery::for_record(&record);
        let outcome = data
            .exporter
            .export(&record, format, &delivery, &delivery)
            .await;

        let success = match outcome {
            ExportOutcome::Busy => {
                ctx.say("⏳ That export is already in progress. Please try again in a moment.")
                    .await?;
                return Ok(());
            }
            ExportOutcome::Printed => {
                "🖨️ Open the attached page to print your receipt.".to_string()
            }
            ExportOutcome::Saved { file_name } => format!("✅ Here is your receipt: {file_name}"),
            ExportOutcome::Failed => String::new(),
        };

        ctx.send(delivery.into_reply(&success)).await?;
        Ok(())
    }

    fn receipt_embed(view: &ReceiptView) -> serenity::CreateEmbed {
        let fields: Vec<(String, String, bool)> = view
            .cards()
            .map(|card| {
                let value = card
                    .rows
                    .iter()
                    .map(|row| {
                        if row.emphasis {
                            format!("{} **{}**", row.label, row.value)
                        } else {
                            format!("{} {}", row.label, row.value)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                (card.title.to_string(), value, true)
            })
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title(view.header.as_str())
            .description(view.header_lines.join("\n"))
            .color(0x001E_40AF)
            .fields(fields);
        if let Some(notes) = &view.notes {
            embed = embed.field("Additional Notes", notes.as_str(), false);
        }
        embed.field(
            view.thanks.as_str(),
            format!("{}\n*{}*", view.blessing, view.scripture),
            false,
        )
    }
}

pub use inner::*;

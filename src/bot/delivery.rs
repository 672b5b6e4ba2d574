//! Receipt delivery over Discord.
//!
//! `ReplyDelivery` is both the export sink and the print surface for one
//! `/receipt` invocation. Saved files become attachments; the print view
//! becomes a self-printing HTML attachment, since a chat client has no print
//! dialog of its own. Alerts become the reply text.

use crate::{
    core::{
        export::{ExportedFile, ReceiptSink},
        print::{PrintSurface, PrintWindow},
    },
    entities::ReceiptRecord,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// MIME type of the print attachment
pub const PRINT_MIME: &str = "text/html";

#[derive(Debug, Default)]
struct Collected {
    files: Vec<ExportedFile>,
    alerts: Vec<String>,
}

/// Collects export results for a single reply
#[derive(Debug)]
pub struct ReplyDelivery {
    print_file_name: String,
    collected: Arc<Mutex<Collected>>,
}

impl ReplyDelivery {
    /// Delivery for one receipt
    #[must_use]
    pub fn for_record(record: &ReceiptRecord) -> Self {
        Self {
            print_file_name: record.file_name("html"),
            collected: Arc::default(),
        }
    }

    /// Files collected so far
    #[must_use]
    pub fn files(&self) -> Vec<ExportedFile> {
        lock(&self.collected).files.clone()
    }

    /// Alerts collected so far
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        lock(&self.collected).alerts.clone()
    }

    /// Builds the reply: every collected file as an attachment, alerts as text.
    #[must_use]
    pub fn into_reply(self, success: &str) -> poise::CreateReply {
        let collected = std::mem::take(&mut *lock(&self.collected));
        let content = if collected.alerts.is_empty() {
            success.to_string()
        } else {
            collected
                .alerts
                .iter()
                .map(|alert| format!("❌ {alert}"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        collected.files.into_iter().fold(
            poise::CreateReply::default().content(content).ephemeral(true),
            |reply, file| reply.attachment(serenity::CreateAttachment::bytes(file.bytes, file.name)),
        )
    }
}

fn lock(collected: &Mutex<Collected>) -> std::sync::MutexGuard<'_, Collected> {
    collected.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReceiptSink for ReplyDelivery {
    fn save(&self, file: ExportedFile) -> Result<()> {
        debug!("Attaching {} ({} bytes)", file.name, file.bytes.len());
        lock(&self.collected).files.push(file);
        Ok(())
    }

    fn alert(&self, message: &str) {
        lock(&self.collected).alerts.push(message.to_string());
    }
}

impl PrintSurface for ReplyDelivery {
    fn open(&self, title: &str) -> Option<Box<dyn PrintWindow>> {
        debug!("Opening print view '{}'", title);
        Some(Box::new(AttachmentWindow {
            file_name: self.print_file_name.clone(),
            html: String::new(),
            collected: Arc::clone(&self.collected),
        }))
    }
}

/// Print view that turns into an HTML attachment when printed
struct AttachmentWindow {
    file_name: String,
    html: String,
    collected: Arc<Mutex<Collected>>,
}

impl PrintWindow for AttachmentWindow {
    fn write(&mut self, html: &str) -> Result<()> {
        html.clone_into(&mut self.html);
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        if self.html.is_empty() {
            return Err(Error::Print {
                message: "nothing was written to the print view".to_string(),
            });
        }
        lock(&self.collected).files.push(ExportedFile {
            name: self.file_name.clone(),
            mime: PRINT_MIME,
            bytes: self.html.as_bytes().to_vec(),
        });
        Ok(())
    }

    fn close(self: Box<Self>) {}
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::Organization,
        core::export::{ExportFormat, ExportOutcome, Exporter, PRINT_ALERT},
        test_utils::{fast_settings, sample_card_record},
    };

    fn exporter() -> Exporter {
        Exporter::new(Arc::new(Organization::default()), fast_settings())
    }

    #[tokio::test]
    async fn test_print_becomes_html_attachment() {
        let record = sample_card_record();
        let delivery = ReplyDelivery::for_record(&record);

        let outcome = exporter()
            .export(&record, ExportFormat::Print, &delivery, &delivery)
            .await;

        assert_eq!(outcome, ExportOutcome::Printed);
        let files = delivery.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "Payment_Receipt_TX-001.html");
        assert_eq!(files[0].mime, PRINT_MIME);
        let html = String::from_utf8(files[0].bytes.clone()).unwrap();
        assert!(html.contains("Payment Receipt - TX-001"));
        assert!(!html.contains("4111111111111234"));
    }

    #[tokio::test]
    async fn test_pdf_and_word_are_collected() {
        let record = sample_card_record();
        let delivery = ReplyDelivery::for_record(&record);
        let exporter = exporter();

        exporter
            .export(&record, ExportFormat::Pdf, &delivery, &delivery)
            .await;
        exporter
            .export(&record, ExportFormat::Word, &delivery, &delivery)
            .await;

        let names: Vec<String> = delivery.files().into_iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["Payment_Receipt_TX-001.pdf", "Payment_Receipt_TX-001.docx"]
        );
        assert!(delivery.alerts().is_empty());
    }

    #[test]
    fn test_printing_an_empty_view_fails() {
        let delivery = ReplyDelivery::for_record(&sample_card_record());
        let mut window = delivery.open("Payment Receipt - TX-001").unwrap();

        assert!(matches!(window.print(), Err(Error::Print { .. })));
        window.close();
        assert!(delivery.files().is_empty());
    }

    #[test]
    fn test_alerts_are_collected() {
        let delivery = ReplyDelivery::for_record(&sample_card_record());
        delivery.alert(PRINT_ALERT);
        assert_eq!(delivery.alerts(), vec![PRINT_ALERT.to_string()]);
        assert!(delivery.files().is_empty());
    }
}

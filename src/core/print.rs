//! Print-ready receipt documents and the print surface seam.
//!
//! The print document is a self-contained HTML page with inline styles only,
//! wrapping a verbatim copy of the rendered receipt markup. When opened in a
//! browser it prints itself after a short settle delay and then closes.

use super::render::ReceiptView;
use crate::{entities::TransactionId, errors::Result};
use html_escaper::Escape;
use std::time::Duration;

/// A complete print document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    /// Window title: `Payment Receipt - <transaction id>`
    pub title: String,
    /// Full HTML page
    pub html: String,
}

/// Opens auxiliary views that a print document can be written into
pub trait PrintSurface: Send + Sync {
    /// Opens a new view, or `None` when the host refuses to create one.
    fn open(&self, title: &str) -> Option<Box<dyn PrintWindow>>;
}

/// An open auxiliary view
pub trait PrintWindow: Send {
    /// Replaces the view's content with `html`
    fn write(&mut self, html: &str) -> Result<()>;

    /// Invokes the platform print dialog on the view
    fn print(&mut self) -> Result<()>;

    /// Closes the view
    fn close(self: Box<Self>);
}

const PRINT_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; color: #333; }
.print-header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #1E40AF; padding-bottom: 20px; }
.print-content { max-width: 800px; margin: 0 auto; }
@media print {
  body { margin: 0; }
  .no-print { display: none !important; }
}";

impl PrintDocument {
    /// Wraps the rendered receipt markup in a standalone print page.
    pub fn build(
        view: &ReceiptView,
        transaction_id: &TransactionId,
        delay: Duration,
    ) -> Result<Self> {
        let title = format!("Payment Receipt - {transaction_id}");
        let html = format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{}</title>\n\
             <style>\n{PRINT_STYLE}\n</style>\n\
             </head>\n\
             <body>\n\
             <div class=\"print-content\">\n{}</div>\n\
             <script>window.addEventListener('load', function () {{ setTimeout(function () {{ window.print(); window.close(); }}, {}); }});</script>\n\
             </body>\n\
             </html>\n",
            Escape(&title),
            view.to_html()?,
            delay.as_millis(),
        );
        Ok(Self { title, html })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{render_default, sample_card_record};

    fn build() -> (ReceiptView, PrintDocument) {
        let record = sample_card_record();
        let view = render_default(&record);
        let document =
            PrintDocument::build(&view, &record.transaction_id, Duration::from_millis(250))
                .unwrap();
        (view, document)
    }

    #[test]
    fn test_title_names_transaction() {
        let (_, document) = build();
        assert_eq!(document.title, "Payment Receipt - TX-001");
        assert!(document.html.contains("<title>Payment Receipt - TX-001</title>"));
    }

    #[test]
    fn test_wraps_rendered_markup_verbatim() {
        let (view, document) = build();
        assert!(document.html.contains(&view.to_html().unwrap()));
    }

    #[test]
    fn test_self_contained_with_print_rules() {
        let (_, document) = build();
        assert!(!document.html.contains("<link"));
        assert!(document.html.contains(".no-print { display: none !important; }"));
        assert!(document.html.contains("window.print()"));
        assert!(document.html.contains("}, 250);"));
    }
}

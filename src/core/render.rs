//! Visual receipt rendering.
//!
//! `ReceiptView::render` is a pure function from a record to a fixed layout:
//! organization header, title, a two-column grid of detail cards, an optional
//! notes block and a static footer. The same view feeds the raster capture,
//! the print document and chat replies, so all of them show identical content.

use crate::{
    config::Organization,
    entities::ReceiptRecord,
    errors::Result,
};
use html_escaper::Escape;
use std::fmt::Write;

/// Title shown under the organization header
pub const RECEIPT_TITLE: &str = "PAYMENT RECEIPT";

/// Color family of a detail card, carried over to every rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Neutral gray card
    Gray,
    /// Blue card
    Blue,
    /// Yellow card
    Yellow,
    /// Purple card
    Purple,
}

impl Tone {
    /// CSS background color of the card
    #[must_use]
    pub const fn css_background(self) -> &'static str {
        match self {
            Self::Gray => "#f9fafb",
            Self::Blue => "#eff6ff",
            Self::Yellow => "#fefce8",
            Self::Purple => "#faf5ff",
        }
    }
}

/// One `label: value` line of a detail card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// Label including the trailing colon
    pub label: &'static str,
    /// Rendered value
    pub value: String,
    /// Highlighted value (the amount)
    pub emphasis: bool,
}

impl DetailRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            emphasis: false,
        }
    }
}

/// A titled group of detail rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCard {
    /// Card heading
    pub title: &'static str,
    /// Background tone
    pub tone: Tone,
    /// Rows in display order
    pub rows: Vec<DetailRow>,
}

/// The rendered receipt layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptView {
    /// Organization name
    pub header: String,
    /// Address and contact lines under the name
    pub header_lines: Vec<String>,
    /// Left column: member and payment details
    pub left: Vec<DetailCard>,
    /// Right column: transaction and payment method details
    pub right: Vec<DetailCard>,
    /// Notes block, present only for non-empty notes
    pub notes: Option<String>,
    /// Thank-you line
    pub thanks: String,
    /// Blessing line
    pub blessing: String,
    /// Scripture quotation
    pub scripture: String,
    /// Small print under the footer
    pub contact_lines: Vec<String>,
}

impl ReceiptView {
    /// Renders a record with the given organization details and currency symbol.
    #[must_use]
    pub fn render(record: &ReceiptRecord, organization: &Organization, currency: &str) -> Self {
        let (detail_label, detail_value) = record.method.detail();

        let left = vec![
            DetailCard {
                title: "Member Information",
                tone: Tone::Gray,
                rows: vec![
                    DetailRow::new("Name:", record.member_name.as_str()),
                    DetailRow::new("Email:", record.member_email.as_str()),
                ],
            },
            DetailCard {
                title: "Payment Details",
                tone: Tone::Blue,
                rows: vec![
                    DetailRow::new("Type:", record.payment_type.label()),
                    DetailRow {
                        emphasis: true,
                        ..DetailRow::new("Amount:", format!("{currency}{}", record.amount))
                    },
                ],
            },
        ];

        let right = vec![
            DetailCard {
                title: "Transaction Information",
                tone: Tone::Yellow,
                rows: vec![
                    DetailRow::new("Transaction ID:", record.transaction_id.as_str()),
                    DetailRow::new("Date & Time:", record.timestamp.as_str()),
                ],
            },
            DetailCard {
                title: "Payment Method",
                tone: Tone::Purple,
                rows: vec![
                    DetailRow::new("Method:", record.method.label()),
                    DetailRow::new(detail_label, detail_value),
                ],
            },
        ];

        Self {
            header: organization.name.clone(),
            header_lines: vec![organization.address.clone(), organization.contact_line()],
            left,
            right,
            notes: record.visible_notes().map(ToString::to_string),
            thanks: organization.thanks.clone(),
            blessing: organization.blessing.clone(),
            scripture: organization.scripture.clone(),
            contact_lines: vec![organization.questions_line(), organization.official_line()],
        }
    }

    /// Cards in reading order: left column first, then right
    pub fn cards(&self) -> impl Iterator<Item = &DetailCard> {
        self.left.iter().chain(self.right.iter())
    }

    /// Plain text content of the receipt, one entry per visual line.
    #[must_use]
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![self.header.clone()];
        lines.extend(self.header_lines.iter().cloned());
        lines.push(RECEIPT_TITLE.to_string());
        for card in self.cards() {
            lines.push(card.title.to_string());
            lines.extend(
                card.rows
                    .iter()
                    .map(|row| format!("{} {}", row.label, row.value)),
            );
        }
        if let Some(notes) = &self.notes {
            lines.push("Additional Notes:".to_string());
            lines.push(notes.clone());
        }
        lines.push(self.thanks.clone());
        lines.push(self.blessing.clone());
        lines.push(self.scripture.clone());
        lines.extend(self.contact_lines.iter().cloned());
        lines
    }

    /// Receipt markup with inline styles.
    ///
    /// This is the fragment the print document wraps; it has no `<html>` or
    /// `<head>` of its own.
    pub fn to_html(&self) -> Result<String> {
        let mut html = String::new();
        self.write_html(&mut html)?;
        Ok(html)
    }

    fn write_html(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "<div class=\"print-header\" style=\"text-align:center;border-bottom:2px solid #1E40AF;padding-bottom:20px;margin-bottom:30px\">"
        )?;
        writeln!(
            out,
            "<h1 style=\"color:#1E40AF;margin:0 0 8px\">{}</h1>",
            Escape(&self.header)
        )?;
        for line in &self.header_lines {
            writeln!(out, "<p style=\"color:#4b5563;margin:2px 0\">{}</p>", Escape(line))?;
        }
        writeln!(out, "</div>")?;

        writeln!(
            out,
            "<h2 style=\"text-align:center;color:#059669\">{RECEIPT_TITLE}</h2>"
        )?;

        writeln!(out, "<div style=\"display:flex;gap:32px;margin-bottom:32px\">")?;
        for column in [&self.left, &self.right] {
            writeln!(out, "<div style=\"flex:1\">")?;
            for card in column {
                write_card(out, card)?;
            }
            writeln!(out, "</div>")?;
        }
        writeln!(out, "</div>")?;

        if let Some(notes) = &self.notes {
            writeln!(
                out,
                "<div class=\"receipt-notes\" style=\"background:#f9fafb;padding:16px;border-radius:8px;margin-bottom:32px\">"
            )?;
            writeln!(out, "<h3 style=\"margin:0 0 8px\">Additional Notes:</h3>")?;
            writeln!(out, "<p style=\"font-style:italic\">{}</p>", Escape(notes))?;
            writeln!(out, "</div>")?;
        }

        writeln!(
            out,
            "<div style=\"text-align:center;border-top:2px solid #e5e7eb;padding-top:24px\">"
        )?;
        writeln!(out, "<p>{}</p>", Escape(&self.thanks))?;
        writeln!(
            out,
            "<p style=\"font-weight:bold;color:#059669\">{}</p>",
            Escape(&self.blessing)
        )?;
        writeln!(
            out,
            "<p style=\"font-style:italic;color:#4b5563\">{}</p>",
            Escape(&self.scripture)
        )?;
        writeln!(out, "</div>")?;

        writeln!(
            out,
            "<div style=\"text-align:center;font-size:12px;color:#6b7280;border-top:1px solid #e5e7eb;margin-top:24px;padding-top:16px\">"
        )?;
        for line in &self.contact_lines {
            writeln!(out, "<p>{}</p>", Escape(line))?;
        }
        writeln!(out, "</div>")?;
        writeln!(
            out,
            "<div class=\"no-print\" style=\"text-align:center;margin-top:16px\"><button onclick=\"window.print()\">Print Receipt</button></div>"
        )
    }
}

fn write_card(out: &mut String, card: &DetailCard) -> std::fmt::Result {
    writeln!(
        out,
        "<div style=\"background:{};padding:16px;border-radius:8px;margin-bottom:16px\">",
        card.tone.css_background()
    )?;
    writeln!(out, "<h3 style=\"margin:0 0 12px\">{}</h3>", card.title)?;
    for row in &card.rows {
        let style = if row.emphasis {
            "font-weight:bold;color:#059669;font-size:20px"
        } else {
            "font-weight:600"
        };
        writeln!(
            out,
            "<div style=\"display:flex;justify-content:space-between\"><span style=\"color:#4b5563\">{}</span><span style=\"{style}\">{}</span></div>",
            Escape(row.label),
            Escape(&row.value)
        )?;
    }
    writeln!(out, "</div>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::PaymentMethod,
        test_utils::{render_default, sample_card_record},
    };

    const METHOD_LABELS: [&str; 3] = ["Card:", "Mobile:", "Reference:"];

    fn method_rows(view: &ReceiptView) -> Vec<&'static str> {
        view.cards()
            .flat_map(|card| card.rows.iter())
            .map(|row| row.label)
            .filter(|label| METHOD_LABELS.contains(label))
            .collect()
    }

    #[test]
    fn test_card_number_is_masked_everywhere() {
        let view = render_default(&sample_card_record());
        let text = view.text_lines().join("\n");
        let html = view.to_html().unwrap();

        assert!(text.contains("Card: **** **** **** 1234"));
        for rendered in [&text, &html] {
            assert!(!rendered.contains("4111111111111234"));
            assert!(!rendered.contains("41111111"));
            assert!(rendered.contains("**** **** **** 1234"));
        }
    }

    #[test]
    fn test_exactly_one_method_row_per_method() {
        let card = sample_card_record();
        let mobile = crate::entities::ReceiptRecord {
            method: PaymentMethod::Mobile {
                mobile_number: "0555000111".to_string(),
            },
            ..card.clone()
        };
        let bank = crate::entities::ReceiptRecord {
            method: PaymentMethod::Bank {
                reference: "REF-9".to_string(),
            },
            ..card.clone()
        };

        assert_eq!(method_rows(&render_default(&card)), vec!["Card:"]);
        assert_eq!(method_rows(&render_default(&mobile)), vec!["Mobile:"]);
        assert_eq!(method_rows(&render_default(&bank)), vec!["Reference:"]);

        let html = render_default(&bank).to_html().unwrap();
        assert!(html.contains("Bank Transfer"));
        assert!(!html.contains("Mobile:"));
        assert!(!html.contains("Card:"));
    }

    #[test]
    fn test_scenario_values() {
        let view = render_default(&sample_card_record());
        let text = view.text_lines();

        assert!(text.contains(&"Type: Tithe".to_string()));
        assert!(text.contains(&"Amount: $50.00".to_string()));
        assert!(text.contains(&"Transaction ID: TX-001".to_string()));
        assert!(text.contains(&"Date & Time: 2024-12-01 10:00".to_string()));
        assert!(text.contains(&"Method: Credit/Debit Card".to_string()));
        assert_eq!(text[0], "SOURCE OF DELIVERANCE CHURCH");
    }

    #[test]
    fn test_notes_block_only_for_non_empty_notes() {
        let mut record = sample_card_record();
        let without = render_default(&record);
        assert_eq!(without.notes, None);
        assert!(!without.to_html().unwrap().contains("Additional Notes:"));

        record.notes = Some(String::new());
        assert!(!render_default(&record).to_html().unwrap().contains("Additional Notes:"));

        record.notes = Some("Building fund, second installment".to_string());
        let with = render_default(&record);
        assert!(with.to_html().unwrap().contains("Building fund, second installment"));
        assert!(
            with.text_lines()
                .contains(&"Building fund, second installment".to_string())
        );
    }

    #[test]
    fn test_html_escapes_member_input() {
        let mut record = sample_card_record();
        record.member_name = "<script>alert(1)</script>".to_string();
        let html = render_default(&record).to_html().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_card_record();
        assert_eq!(render_default(&record), render_default(&record));
    }

    #[test]
    fn test_action_markup_is_marked_no_print() {
        let html = render_default(&sample_card_record()).to_html().unwrap();
        assert!(html.contains("class=\"no-print\""));
    }
}

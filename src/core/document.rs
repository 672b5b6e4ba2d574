//! Structured (DOCX) receipt documents.
//!
//! The document is built straight from the record fields rather than from the
//! rendered view: title, subtitle, a heading, a seven-row key/value table and
//! two closing paragraphs. `StructuredDocument` is the backend-independent
//! shape; `pack` turns it into a Word file with `docx-rs`.

use super::render::RECEIPT_TITLE;
use crate::{
    config::Organization,
    entities::ReceiptRecord,
    errors::{Error, Result},
};
use docx_rs::{
    AlignmentType, Docx, LineSpacing, Paragraph, Run, Style, StyleType, Table, TableCell,
    TableRow, WidthType,
};
use std::io::Cursor;

/// MIME type of the packed document
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Heading of the details table
pub const DETAILS_HEADING: &str = "TRANSACTION DETAILS";

/// Paragraph style id of the details heading
const HEADING_STYLE: &str = "Heading2";

/// Label column width, in fiftieths of a percent (30%)
const LABEL_WIDTH_PCT: usize = 1500;
/// Value column width, in fiftieths of a percent (70%)
const VALUE_WIDTH_PCT: usize = 3500;
/// Full table width, in fiftieths of a percent (100%)
const TABLE_WIDTH_PCT: usize = 5000;

/// A single-run paragraph with its formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledParagraph {
    /// Text of the run
    pub text: String,
    /// Bold run
    pub bold: bool,
    /// Italic run
    pub italic: bool,
    /// Font size in half-points
    pub size: usize,
    /// Hex color without `#`
    pub color: Option<&'static str>,
    /// Paragraph style id, for headings
    pub style: Option<&'static str>,
    /// Centered paragraph
    pub centered: bool,
    /// Space before, in twentieths of a point
    pub before: u32,
    /// Space after, in twentieths of a point
    pub after: u32,
}

impl StyledParagraph {
    fn centered(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size,
            color: None,
            style: None,
            centered: true,
            before: 0,
            after: 0,
        }
    }

    fn to_docx(&self) -> Paragraph {
        let mut run = Run::new().add_text(self.text.as_str()).size(self.size);
        if self.bold {
            run = run.bold();
        }
        if self.italic {
            run = run.italic();
        }
        if let Some(color) = self.color {
            run = run.color(color);
        }

        let mut paragraph = Paragraph::new()
            .add_run(run)
            .line_spacing(LineSpacing::new().before(self.before).after(self.after));
        if self.centered {
            paragraph = paragraph.align(AlignmentType::Center);
        }
        if let Some(style) = self.style {
            paragraph = paragraph.style(style);
        }
        paragraph
    }
}

/// One element of the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBlock {
    /// A paragraph
    Paragraph(StyledParagraph),
    /// A two-column table of `(label, value)` rows, labels bold
    Table(Vec<(String, String)>),
}

/// Backend-independent receipt document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDocument {
    /// Body blocks in order
    pub blocks: Vec<DocumentBlock>,
}

/// The `(label, value)` rows of the details table, in order.
#[must_use]
pub fn detail_rows(record: &ReceiptRecord, currency: &str) -> Vec<(String, String)> {
    [
        ("Transaction ID:", record.transaction_id.to_string()),
        ("Date & Time:", record.timestamp.clone()),
        ("Member Name:", record.member_name.clone()),
        ("Email:", record.member_email.clone()),
        ("Payment Type:", record.payment_type.label().to_string()),
        ("Amount:", format!("{currency}{}", record.amount)),
        ("Payment Method:", record.method.label().to_string()),
    ]
    .into_iter()
    .map(|(label, value)| (label.to_string(), value))
    .collect()
}

impl StructuredDocument {
    /// Builds the receipt document from the record fields.
    #[must_use]
    pub fn build(record: &ReceiptRecord, organization: &Organization, currency: &str) -> Self {
        let title = StyledParagraph {
            bold: true,
            color: Some("1E40AF"),
            after: 200,
            ..StyledParagraph::centered(organization.name.as_str(), 32)
        };
        let subtitle = StyledParagraph {
            bold: true,
            color: Some("059669"),
            after: 400,
            ..StyledParagraph::centered(RECEIPT_TITLE, 24)
        };
        let heading = StyledParagraph {
            bold: true,
            color: Some("374151"),
            style: Some(HEADING_STYLE),
            centered: false,
            before: 200,
            after: 200,
            ..StyledParagraph::centered(DETAILS_HEADING, 20)
        };
        let thanks = StyledParagraph {
            italic: true,
            before: 400,
            ..StyledParagraph::centered(
                format!("{} {}", organization.thanks, organization.blessing),
                20,
            )
        };
        let scripture = StyledParagraph {
            italic: true,
            color: Some("059669"),
            before: 200,
            ..StyledParagraph::centered(organization.scripture.as_str(), 18)
        };

        Self {
            blocks: vec![
                DocumentBlock::Paragraph(title),
                DocumentBlock::Paragraph(subtitle),
                DocumentBlock::Paragraph(heading),
                DocumentBlock::Table(detail_rows(record, currency)),
                DocumentBlock::Paragraph(thanks),
                DocumentBlock::Paragraph(scripture),
            ],
        }
    }

    /// The first table of the document, if any
    #[must_use]
    pub fn table(&self) -> Option<&[(String, String)]> {
        self.blocks.iter().find_map(|block| match block {
            DocumentBlock::Table(rows) => Some(rows.as_slice()),
            DocumentBlock::Paragraph(_) => None,
        })
    }

    /// Converts to a `docx-rs` document.
    ///
    /// Paragraph styles referenced by id are registered in the styles part.
    #[must_use]
    pub fn to_docx(&self) -> Docx {
        let heading = Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("heading 2")
            .bold()
            .size(26);
        self.blocks
            .iter()
            .fold(Docx::new().add_style(heading), |docx, block| match block {
                DocumentBlock::Paragraph(paragraph) => docx.add_paragraph(paragraph.to_docx()),
                DocumentBlock::Table(rows) => docx.add_table(details_table(rows)),
            })
    }

    /// Serializes the document to DOCX bytes.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.to_docx()
            .build()
            .pack(Cursor::new(&mut buffer))
            .map_err(|e| Error::Document {
                message: format!("failed to pack Word document: {e}"),
            })?;
        Ok(buffer)
    }
}

fn details_table(rows: &[(String, String)]) -> Table {
    let rows = rows
        .iter()
        .map(|(label, value)| {
            TableRow::new(vec![
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text(label.as_str()).bold()))
                    .width(LABEL_WIDTH_PCT, WidthType::Pct),
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(Run::new().add_text(value.as_str())))
                    .width(VALUE_WIDTH_PCT, WidthType::Pct),
            ])
        })
        .collect();
    Table::new(rows).width(TABLE_WIDTH_PCT, WidthType::Pct)
}

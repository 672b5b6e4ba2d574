//! Receipt export orchestration.
//!
//! `Exporter` drives the three export channels (PDF, Word, print). Every
//! channel catches its own failures: the cause is logged, the sink receives
//! exactly one alert, and no file is saved. A trigger for a receipt that the
//! same channel is still exporting is rejected; other receipts go ahead.

use super::{
    document::{DOCX_MIME, StructuredDocument},
    pdf::build_pdf,
    print::{PrintDocument, PrintSurface},
    raster::{BitmapCapture, Capture},
    render::ReceiptView,
};
use crate::{
    config::{ExportSettings, Organization},
    entities::{ReceiptRecord, TransactionId},
    errors::{Error, Result},
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{error, info, warn};

/// Alert raised when the PDF channel fails
pub const PDF_ALERT: &str = "Error generating PDF. Please try again.";
/// Alert raised when the Word channel fails
pub const WORD_ALERT: &str = "Error generating Word document. Please try again.";
/// Alert raised when the print channel fails
pub const PRINT_ALERT: &str = "Error preparing receipt for printing. Please try again.";

/// MIME type of PDF exports
pub const PDF_MIME: &str = "application/pdf";

/// Export channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ExportFormat {
    /// Paginated raster PDF
    #[name = "pdf"]
    Pdf,
    /// Structured Word document
    #[name = "word"]
    Word,
    /// Print-ready HTML page
    #[name = "print"]
    Print,
}

/// A finished export ready to be offered for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// `Payment_Receipt_<transaction id>.<ext>`
    pub name: String,
    /// MIME type of `bytes`
    pub mime: &'static str,
    /// File content
    pub bytes: Vec<u8>,
}

/// Where exports are delivered and failures reported
pub trait ReceiptSink: Send + Sync {
    /// Offers a finished file to the member
    fn save(&self, file: ExportedFile) -> Result<()>;

    /// Shows a single blocking alert to the member
    fn alert(&self, message: &str);
}

/// How an export trigger ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A file was handed to the sink
    Saved {
        /// Name of the saved file
        file_name: String,
    },
    /// The print view was printed and closed
    Printed,
    /// The export failed and one alert was raised
    Failed,
    /// The channel was already exporting this receipt
    Busy,
}

/// Receipts a channel is currently exporting
#[derive(Debug, Default)]
struct InFlight {
    ids: Mutex<HashSet<TransactionId>>,
}

impl InFlight {
    /// Marks `id` as in flight, or returns `None` if it already is
    fn try_claim(&self, id: &TransactionId) -> Option<InFlightGuard<'_>> {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        ids.insert(id.clone()).then(|| InFlightGuard {
            owner: self,
            id: id.clone(),
        })
    }
}

/// Releases the claimed id when dropped
struct InFlightGuard<'a> {
    owner: &'a InFlight,
    id: TransactionId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Drives the receipt export channels
pub struct Exporter<C = BitmapCapture> {
    organization: Arc<Organization>,
    settings: ExportSettings,
    capture: Arc<C>,
    pdf_in_flight: InFlight,
    word_in_flight: InFlight,
    print_in_flight: InFlight,
}

impl Exporter<BitmapCapture> {
    /// Exporter using the default bitmap capture
    #[must_use]
    pub fn new(organization: Arc<Organization>, settings: ExportSettings) -> Self {
        Self::with_capture(organization, settings, BitmapCapture::default())
    }
}

impl<C: Capture> Exporter<C> {
    /// Exporter using a custom capture backend
    #[must_use]
    pub fn with_capture(organization: Arc<Organization>, settings: ExportSettings, capture: C) -> Self {
        Self {
            organization,
            settings,
            capture: Arc::new(capture),
            pdf_in_flight: InFlight::default(),
            word_in_flight: InFlight::default(),
            print_in_flight: InFlight::default(),
        }
    }

    /// Renders the visual receipt for a record
    #[must_use]
    pub fn render(&self, record: &ReceiptRecord) -> ReceiptView {
        ReceiptView::render(record, &self.organization, &self.settings.currency_symbol)
    }

    /// Runs the export for `format`.
    pub async fn export(
        &self,
        record: &ReceiptRecord,
        format: ExportFormat,
        surface: &dyn PrintSurface,
        sink: &dyn ReceiptSink,
    ) -> ExportOutcome {
        match format {
            ExportFormat::Pdf => self.export_pdf(record, sink).await,
            ExportFormat::Word => self.export_word(record, sink).await,
            ExportFormat::Print => self.print(record, surface, sink).await,
        }
    }

    /// Captures the receipt and saves it as a paginated PDF.
    pub async fn export_pdf(&self, record: &ReceiptRecord, sink: &dyn ReceiptSink) -> ExportOutcome {
        let Some(_claim) = self.pdf_in_flight.try_claim(&record.transaction_id) else {
            warn!("PDF export of {} rejected: already in progress", record.transaction_id);
            return ExportOutcome::Busy;
        };

        let result = match self.build_pdf_file(record).await {
            Ok(file) => save(sink, file),
            Err(e) => Err(e),
        };
        finish(result, sink, PDF_ALERT, "PDF")
    }

    /// Builds the structured document and saves it as a Word file.
    pub async fn export_word(&self, record: &ReceiptRecord, sink: &dyn ReceiptSink) -> ExportOutcome {
        let Some(_claim) = self.word_in_flight.try_claim(&record.transaction_id) else {
            warn!("Word export of {} rejected: already in progress", record.transaction_id);
            return ExportOutcome::Busy;
        };

        let result = StructuredDocument::build(
            record,
            &self.organization,
            &self.settings.currency_symbol,
        )
        .pack()
        .and_then(|bytes| {
            save(
                sink,
                ExportedFile {
                    name: record.file_name("docx"),
                    mime: DOCX_MIME,
                    bytes,
                },
            )
        });
        finish(result, sink, WORD_ALERT, "Word document")
    }

    /// Opens a print view with the receipt, prints it after the settle delay
    /// and closes it.
    pub async fn print(
        &self,
        record: &ReceiptRecord,
        surface: &dyn PrintSurface,
        sink: &dyn ReceiptSink,
    ) -> ExportOutcome {
        let Some(_claim) = self.print_in_flight.try_claim(&record.transaction_id) else {
            warn!("Print of {} rejected: already in progress", record.transaction_id);
            return ExportOutcome::Busy;
        };

        match self.print_document(record, surface).await {
            Ok(()) => {
                info!("Printed receipt {}", record.transaction_id);
                ExportOutcome::Printed
            }
            Err(e) => {
                error!("Error printing receipt {}: {}", record.transaction_id, e);
                sink.alert(PRINT_ALERT);
                ExportOutcome::Failed
            }
        }
    }

    async fn build_pdf_file(&self, record: &ReceiptRecord) -> Result<ExportedFile> {
        let view = self.render(record);
        let capture = Arc::clone(&self.capture);
        let scale = self.settings.capture_scale;
        let title = format!("Payment Receipt - {}", record.transaction_id);

        // Capture and encoding are CPU bound; keep them off the async workers.
        let bytes = tokio::task::spawn_blocking(move || {
            let raster = capture.capture(&view, scale)?;
            build_pdf(&title, raster)
        })
        .await
        .map_err(|e| Error::Capture {
            message: format!("capture task failed: {e}"),
        })??;

        Ok(ExportedFile {
            name: record.file_name("pdf"),
            mime: PDF_MIME,
            bytes,
        })
    }

    async fn print_document(&self, record: &ReceiptRecord, surface: &dyn PrintSurface) -> Result<()> {
        let delay = self.settings.print_delay();
        let view = self.render(record);
        let document = PrintDocument::build(&view, &record.transaction_id, delay)?;

        let mut window = surface.open(&document.title).ok_or(Error::PrintUnavailable)?;
        if let Err(e) = window.write(&document.html) {
            window.close();
            return Err(e);
        }

        tokio::time::sleep(delay).await;
        let printed = window.print();
        window.close();
        printed
    }
}

fn save(sink: &dyn ReceiptSink, file: ExportedFile) -> Result<String> {
    let file_name = file.name.clone();
    sink.save(file)?;
    Ok(file_name)
}

fn finish(result: Result<String>, sink: &dyn ReceiptSink, alert: &str, what: &str) -> ExportOutcome {
    match result {
        Ok(file_name) => {
            info!("Saved {} {}", what, file_name);
            ExportOutcome::Saved { file_name }
        }
        Err(e) => {
            error!("Error generating {}: {}", what, e);
            sink.alert(alert);
            ExportOutcome::Failed
        }
    }
}

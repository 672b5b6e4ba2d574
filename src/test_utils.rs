//! Shared test utilities.
//!
//! Fixture records and forms, seed content, and recording doubles for the
//! export sink, print surface and capture backend.

#![allow(clippy::unwrap_used)]

use crate::{
    config::{AppConfig, ExportSettings, Organization},
    core::{
        export::{ExportedFile, ReceiptSink},
        payment::PaymentForm,
        print::{PrintSurface, PrintWindow},
        raster::Capture,
        render::ReceiptView,
    },
    entities::{
        Announcement, GalleryImage, PaymentMethod, PaymentType, Priority, Publication,
        PublicationKind, ReceiptRecord, SpecialEvent, TransactionId, WeeklyProgram,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use image::RgbImage;
use std::sync::{Arc, Mutex};

/// The receipt used across the rendering and export tests.
///
/// `TX-001`, Jane Doe, a $50.00 tithe paid by card ending 1234, no notes.
pub fn sample_card_record() -> ReceiptRecord {
    ReceiptRecord {
        member_email: "jane@example.com".to_string(),
        member_name: "Jane Doe".to_string(),
        payment_type: PaymentType::Tithe,
        amount: "50.00".to_string(),
        method: PaymentMethod::Card {
            card_number: "4111111111111234".to_string(),
        },
        notes: None,
        transaction_id: TransactionId::parse("TX-001").unwrap(),
        timestamp: "2024-12-01 10:00".to_string(),
    }
}

/// A filled-in card payment form matching `sample_card_record`
pub fn card_form() -> PaymentForm {
    PaymentForm {
        member_email: "jane@example.com".to_string(),
        member_name: "Jane Doe".to_string(),
        payment_type: PaymentType::Tithe,
        amount: "50.00".to_string(),
        payment_method: "card".to_string(),
        card_number: "4111111111111234".to_string(),
        ..PaymentForm::default()
    }
}

/// 2024-12-01 10:00:00 UTC
pub fn sample_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 10, 0, 0).unwrap()
}

/// Renders with the default organization and a `$` currency symbol
pub fn render_default(record: &ReceiptRecord) -> ReceiptView {
    ReceiptView::render(record, &Organization::default(), "$")
}

/// Export settings with a short print delay
pub fn fast_settings() -> ExportSettings {
    ExportSettings {
        print_delay_ms: 20,
        ..ExportSettings::default()
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

/// Creates an announcement with placeholder content
pub fn announcement(id: u32, title: &str, on: &str, priority: Priority) -> Announcement {
    Announcement {
        id,
        title: title.to_string(),
        content: format!("{title} details"),
        date: date(on),
        priority,
        author: "Church Office".to_string(),
        category: None,
    }
}

fn event(id: u32, title: &str, on: &str, featured: bool) -> SpecialEvent {
    SpecialEvent {
        id,
        title: title.to_string(),
        description: format!("{title} details"),
        date: date(on),
        time: "10:30 PM - 12:30 AM".to_string(),
        location: "Main Sanctuary".to_string(),
        registration_required: false,
        featured,
    }
}

fn program(id: u32, title: &str, day: &str) -> WeeklyProgram {
    WeeklyProgram {
        id,
        title: title.to_string(),
        description: format!("{title} every {day}"),
        day: day.to_string(),
        time: "7:00 PM".to_string(),
        location: "Fellowship Hall".to_string(),
        leader: "Deacon Mike".to_string(),
    }
}

fn publication(id: u32, title: &str, kind: PublicationKind, on: &str, featured: bool) -> Publication {
    Publication {
        id,
        title: title.to_string(),
        description: format!("{title} summary"),
        kind,
        publish_date: date(on),
        author: "Communications Team".to_string(),
        download_url: format!("/downloads/{id}.pdf"),
        featured,
    }
}

fn image(id: u32, title: &str, featured: bool) -> GalleryImage {
    GalleryImage {
        id,
        url: format!("/images/{id}.jpg"),
        title: title.to_string(),
        category: "Worship".to_string(),
        featured,
    }
}

/// Seed content: 5 announcements, 2 events, 3 programs, 3 publications and
/// 2 gallery images.
pub fn sample_content_config() -> AppConfig {
    AppConfig {
        announcements: vec![
            announcement(1, "Choir Practice", "2024-12-01", Priority::Low),
            announcement(2, "Christmas Service", "2024-12-15", Priority::High),
            announcement(3, "Harvest Thanksgiving", "2024-11-20", Priority::Medium),
            announcement(4, "Youth Retreat", "2024-12-10", Priority::Medium),
            announcement(5, "Food Drive", "2024-12-05", Priority::High),
        ],
        events: vec![
            event(1, "Watch Night", "2024-12-31", true),
            event(2, "Baptism Sunday", "2024-11-01", false),
        ],
        programs: vec![
            program(1, "Youth Night", "Friday"),
            program(2, "Sunday Worship", "Sunday"),
            program(3, "Bible Study", "Wednesday"),
        ],
        publications: vec![
            publication(1, "December Newsletter", PublicationKind::Newsletter, "2024-12-01", true),
            publication(2, "Weekly Bulletin", PublicationKind::Bulletin, "2024-11-24", true),
            publication(3, "Walking in Faith", PublicationKind::Book, "2023-05-01", false),
        ],
        gallery: vec![image(1, "Easter Sunday", true), image(2, "Choir", false)],
        ..AppConfig::default()
    }
}

/// Capture backend that always fails
pub struct FailingCapture;

impl Capture for FailingCapture {
    fn capture(&self, _view: &ReceiptView, _scale: u32) -> Result<RgbImage> {
        Err(Error::Capture {
            message: "renderer unavailable".to_string(),
        })
    }
}

/// Sink that records saved files and alerts
#[derive(Default)]
pub struct RecordingSink {
    files: Mutex<Vec<ExportedFile>>,
    alerts: Mutex<Vec<String>>,
    refuse: bool,
}

impl RecordingSink {
    /// A sink whose saves always fail
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Files saved so far
    pub fn files(&self) -> Vec<ExportedFile> {
        self.files.lock().unwrap().clone()
    }

    /// Alerts raised so far
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl ReceiptSink for RecordingSink {
    fn save(&self, file: ExportedFile) -> Result<()> {
        if self.refuse {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        self.files.lock().unwrap().push(file);
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// What happened on a `RecordingSurface`
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    /// Titles of opened views
    pub titles: Vec<String>,
    /// HTML written into views
    pub written: Vec<String>,
    /// Print calls
    pub prints: usize,
    /// Close calls
    pub closes: usize,
}

/// Print surface that records every window interaction
#[derive(Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
    blocked: bool,
    failing_print: bool,
}

impl RecordingSurface {
    /// A surface that refuses to open views
    pub fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }

    /// A surface whose views fail when printed
    pub fn failing_print() -> Self {
        Self {
            failing_print: true,
            ..Self::default()
        }
    }

    /// Snapshot of the interactions so far
    pub fn log(&self) -> SurfaceLog {
        self.log.lock().unwrap().clone()
    }
}

impl PrintSurface for RecordingSurface {
    fn open(&self, title: &str) -> Option<Box<dyn PrintWindow>> {
        if self.blocked {
            return None;
        }
        self.log.lock().unwrap().titles.push(title.to_string());
        Some(Box::new(RecordingWindow {
            log: Arc::clone(&self.log),
            failing_print: self.failing_print,
        }))
    }
}

struct RecordingWindow {
    log: Arc<Mutex<SurfaceLog>>,
    failing_print: bool,
}

impl PrintWindow for RecordingWindow {
    fn write(&mut self, html: &str) -> Result<()> {
        self.log.lock().unwrap().written.push(html.to_string());
        Ok(())
    }

    fn print(&mut self) -> Result<()> {
        self.log.lock().unwrap().prints += 1;
        if self.failing_print {
            return Err(Error::Print {
                message: "printer offline".to_string(),
            });
        }
        Ok(())
    }

    fn close(self: Box<Self>) {
        self.log.lock().unwrap().closes += 1;
    }
}

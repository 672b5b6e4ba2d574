//! Entity module - Plain data types shared by every layer.
//! Receipts describe one completed payment; content types describe the
//! announcements, events and other items the admin commands manage.

pub mod content;
pub mod receipt;

pub use content::{
    Announcement, ContentItem, GalleryImage, Priority, Publication, PublicationKind,
    SpecialEvent, WeeklyProgram,
};
pub use receipt::{PaymentMethod, PaymentType, ReceiptRecord, TransactionId};

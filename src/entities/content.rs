//! Content entities - Site content managed from the admin commands.
//!
//! Announcements, special events, weekly programs, publications and gallery
//! images. All of them are seeded from `config.toml` and live only in memory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Common behaviour of everything stored in a content collection
pub trait ContentItem: Clone + Send + Sync + 'static {
    /// Kind name used in messages and errors
    const KIND: &'static str;

    /// Unique id within its collection
    fn id(&self) -> u32;

    /// Replaces the id, used when the store assigns one on insert
    #[must_use]
    fn with_id(self, id: u32) -> Self;

    /// Title shown in listings
    fn title(&self) -> &str;
}

/// Urgency of an announcement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, poise::ChoiceParameter)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High
    High,
    /// Medium
    Medium,
    /// Low
    Low,
}

/// Publication format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, poise::ChoiceParameter)]
#[serde(rename_all = "lowercase")]
pub enum PublicationKind {
    /// Newsletter
    Newsletter,
    /// Weekly bulletin
    Bulletin,
    /// Magazine
    Magazine,
    /// Book
    Book,
}

/// A dated notice to the congregation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique id
    #[serde(default)]
    pub id: u32,
    /// Headline
    pub title: String,
    /// Body text
    pub content: String,
    /// Date the announcement was posted
    pub date: NaiveDate,
    /// Urgency
    pub priority: Priority,
    /// Who posted it
    pub author: String,
    /// Free form category (e.g. "Youth", "Outreach")
    #[serde(default)]
    pub category: Option<String>,
}

/// A one-off event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialEvent {
    /// Unique id
    #[serde(default)]
    pub id: u32,
    /// Event name
    pub title: String,
    /// What happens at the event
    pub description: String,
    /// Event date
    pub date: NaiveDate,
    /// Time range as displayed (e.g. "10:30 PM - 12:30 AM")
    pub time: String,
    /// Where it takes place
    pub location: String,
    /// Whether attendees must register
    #[serde(default)]
    pub registration_required: bool,
    /// Shown on the landing page
    #[serde(default)]
    pub featured: bool,
}

/// A recurring weekly program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgram {
    /// Unique id
    #[serde(default)]
    pub id: u32,
    /// Program name
    pub title: String,
    /// Short description
    pub description: String,
    /// Day of the week, full English name
    pub day: String,
    /// Time as displayed
    pub time: String,
    /// Where it meets
    pub location: String,
    /// Who leads it
    pub leader: String,
}

/// A downloadable publication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Unique id
    #[serde(default)]
    pub id: u32,
    /// Title
    pub title: String,
    /// Summary
    pub description: String,
    /// Format
    pub kind: PublicationKind,
    /// Publication date
    pub publish_date: NaiveDate,
    /// Author or team
    pub author: String,
    /// Where to download it
    pub download_url: String,
    /// Shown on the landing page
    #[serde(default)]
    pub featured: bool,
}

/// A gallery photo
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Unique id
    #[serde(default)]
    pub id: u32,
    /// Image URL
    pub url: String,
    /// Caption
    pub title: String,
    /// Category (e.g. "Worship")
    pub category: String,
    /// Shown in the landing page slider
    #[serde(default)]
    pub featured: bool,
}

macro_rules! content_item {
    ($ty:ty, $kind:literal) => {
        impl ContentItem for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> u32 {
                self.id
            }

            fn with_id(mut self, id: u32) -> Self {
                self.id = id;
                self
            }

            fn title(&self) -> &str {
                &self.title
            }
        }
    };
}

content_item!(Announcement, "Announcement");
content_item!(SpecialEvent, "Event");
content_item!(WeeklyProgram, "Program");
content_item!(Publication, "Publication");
content_item!(GalleryImage, "Gallery image");

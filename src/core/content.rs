//! Content store business logic.
//!
//! Every content kind lives in its own `Collection`, an immutable
//! `Arc<Vec<T>>` snapshot behind a lock. Writers build a new vector and swap
//! it in, so a reader holding an older snapshot never sees a half-applied
//! change. The landing page and admin queries are plain functions over those
//! snapshots.

use crate::{
    config::AppConfig,
    entities::{
        Announcement, ContentItem, GalleryImage, Priority, Publication, PublicationKind,
        SpecialEvent, WeeklyProgram,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Weekday};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Announcements shown on the landing page when no limit is given
pub const DEFAULT_ANNOUNCEMENT_LIMIT: usize = 4;

/// Entries in the admin recent activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// A copy-on-write collection of one content kind
#[derive(Debug)]
pub struct Collection<T> {
    items: RwLock<Arc<Vec<T>>>,
}

impl<T: ContentItem> Collection<T> {
    /// Creates a collection from seed items.
    ///
    /// Seeds without an id (id 0) are numbered after the highest explicit id.
    #[must_use]
    pub fn new(seed: Vec<T>) -> Self {
        let mut next = next_id(&seed);
        let items = seed
            .into_iter()
            .map(|item| {
                if item.id() == 0 {
                    let id = next;
                    next += 1;
                    item.with_id(id)
                } else {
                    item
                }
            })
            .collect();
        Self {
            items: RwLock::new(Arc::new(items)),
        }
    }

    /// The current snapshot
    pub async fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&*self.items.read().await)
    }

    /// Looks up one item by id
    pub async fn get(&self, id: u32) -> Result<T> {
        self.snapshot()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Appends `item` under the next free id and publishes the new snapshot.
    pub async fn insert(&self, item: T) -> Arc<Vec<T>> {
        let mut guard = self.items.write().await;
        let mut items = Vec::clone(&guard);
        let item = item.with_id(next_id(&items));
        info!("Added {} {} '{}'", T::KIND, item.id(), item.title());
        items.push(item);
        publish(&mut guard, items)
    }

    /// Applies `change` to the item with `id` and publishes the new snapshot.
    ///
    /// The id itself cannot be changed. Returns the edited item.
    pub async fn edit(&self, id: u32, change: impl FnOnce(&mut T)) -> Result<T> {
        let mut guard = self.items.write().await;
        let mut items = Vec::clone(&guard);
        let slot = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        change(slot);
        let edited = slot.clone().with_id(id);
        *slot = edited.clone();
        info!("Edited {} {} '{}'", T::KIND, id, edited.title());
        publish(&mut guard, items);
        Ok(edited)
    }

    /// Removes the item with `id` and publishes the new snapshot.
    pub async fn remove(&self, id: u32) -> Result<Arc<Vec<T>>> {
        let mut guard = self.items.write().await;
        let mut items = Vec::clone(&guard);
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        let removed = items.remove(position);
        info!("Removed {} {} '{}'", T::KIND, id, removed.title());
        Ok(publish(&mut guard, items))
    }

    /// Items whose title contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> Vec<T> {
        let query = query.to_lowercase();
        self.snapshot()
            .await
            .iter()
            .filter(|item| item.title().to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}

/// Parses a content date written as `YYYY-MM-DD`
pub fn parse_content_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Error::InvalidForm {
        message: format!("'{value}' is not a date in YYYY-MM-DD form"),
    })
}

/// Changes to an announcement. `None` or blank text keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementEdit {
    /// New headline
    pub title: Option<String>,
    /// New body text
    pub content: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New urgency
    pub priority: Option<Priority>,
    /// New category; blank clears it
    pub category: Option<String>,
}

impl AnnouncementEdit {
    /// Writes the changes into `announcement`
    pub fn apply(self, announcement: &mut Announcement) {
        replace_text(&mut announcement.title, self.title);
        replace_text(&mut announcement.content, self.content);
        replace(&mut announcement.date, self.date);
        replace(&mut announcement.priority, self.priority);
        if let Some(category) = self.category {
            let category = category.trim();
            announcement.category = (!category.is_empty()).then(|| category.to_string());
        }
    }
}

/// Changes to a special event. `None` or blank text keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EventEdit {
    /// New name
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New displayed time range
    pub time: Option<String>,
    /// New location
    pub location: Option<String>,
    /// Whether attendees must register
    pub registration_required: Option<bool>,
    /// Whether the event is featured
    pub featured: Option<bool>,
}

impl EventEdit {
    /// Writes the changes into `event`
    pub fn apply(self, event: &mut SpecialEvent) {
        replace_text(&mut event.title, self.title);
        replace_text(&mut event.description, self.description);
        replace(&mut event.date, self.date);
        replace_text(&mut event.time, self.time);
        replace_text(&mut event.location, self.location);
        replace(&mut event.registration_required, self.registration_required);
        replace(&mut event.featured, self.featured);
    }
}

/// Changes to a publication. `None` or blank text keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct PublicationEdit {
    /// New title
    pub title: Option<String>,
    /// New summary
    pub description: Option<String>,
    /// New format
    pub kind: Option<PublicationKind>,
    /// New publication date
    pub publish_date: Option<NaiveDate>,
    /// New author
    pub author: Option<String>,
    /// New download link
    pub download_url: Option<String>,
    /// Whether the publication is featured
    pub featured: Option<bool>,
}

impl PublicationEdit {
    /// Writes the changes into `publication`
    pub fn apply(self, publication: &mut Publication) {
        replace_text(&mut publication.title, self.title);
        replace_text(&mut publication.description, self.description);
        replace(&mut publication.kind, self.kind);
        replace(&mut publication.publish_date, self.publish_date);
        replace_text(&mut publication.author, self.author);
        replace_text(&mut publication.download_url, self.download_url);
        replace(&mut publication.featured, self.featured);
    }
}

fn replace<V>(slot: &mut V, value: Option<V>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn replace_text(slot: &mut String, value: Option<String>) {
    if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        *slot = value.to_string();
    }
}

fn next_id<T: ContentItem>(items: &[T]) -> u32 {
    items.iter().map(ContentItem::id).max().unwrap_or(0) + 1
}

fn publish<T>(slot: &mut Arc<Vec<T>>, items: Vec<T>) -> Arc<Vec<T>> {
    *slot = Arc::new(items);
    Arc::clone(slot)
}

fn not_found<T: ContentItem>(id: u32) -> Error {
    Error::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

/// Item counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentStats {
    /// Announcements
    pub announcements: usize,
    /// Special events
    pub events: usize,
    /// Weekly programs
    pub programs: usize,
    /// Publications
    pub publications: usize,
    /// Gallery images
    pub gallery: usize,
    /// Featured publications plus featured events
    pub featured: usize,
}

/// One entry of the admin recent activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Content kind
    pub kind: &'static str,
    /// Item title
    pub title: String,
    /// Date the item is dated on
    pub date: NaiveDate,
}

/// All site content
#[derive(Debug)]
pub struct ContentStore {
    /// Announcements
    pub announcements: Collection<Announcement>,
    /// Special events
    pub events: Collection<SpecialEvent>,
    /// Weekly programs
    pub programs: Collection<WeeklyProgram>,
    /// Publications
    pub publications: Collection<Publication>,
    /// Gallery images
    pub gallery: Collection<GalleryImage>,
}

impl ContentStore {
    /// Seeds every collection from the configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Self {
            announcements: Collection::new(config.announcements.clone()),
            events: Collection::new(config.events.clone()),
            programs: Collection::new(config.programs.clone()),
            publications: Collection::new(config.publications.clone()),
            gallery: Collection::new(config.gallery.clone()),
        };
        info!(
            "Content store seeded: {} announcements, {} events, {} programs, {} publications, {} images",
            config.announcements.len(),
            config.events.len(),
            config.programs.len(),
            config.publications.len(),
            config.gallery.len()
        );
        store
    }

    /// Featured gallery images, in seed order
    pub async fn featured_gallery(&self) -> Vec<GalleryImage> {
        self.gallery
            .snapshot()
            .await
            .iter()
            .filter(|image| image.featured)
            .cloned()
            .collect()
    }

    /// Newest announcements first, at most `limit`
    pub async fn latest_announcements(&self, limit: usize) -> Vec<Announcement> {
        let mut announcements = Vec::clone(&*self.announcements.snapshot().await);
        announcements.sort_by(|a, b| b.date.cmp(&a.date));
        announcements.truncate(limit);
        announcements
    }

    /// Featured events, in seed order
    pub async fn featured_events(&self) -> Vec<SpecialEvent> {
        self.events
            .snapshot()
            .await
            .iter()
            .filter(|event| event.featured)
            .cloned()
            .collect()
    }

    /// Weekly programs ordered Sunday through Saturday.
    ///
    /// Programs whose day does not name a weekday go last.
    pub async fn weekly_programs(&self) -> Vec<WeeklyProgram> {
        let mut programs = Vec::clone(&*self.programs.snapshot().await);
        programs.sort_by_key(|program| {
            program
                .day
                .trim()
                .parse::<Weekday>()
                .map_or(7, |day| day.num_days_from_sunday())
        });
        programs
    }

    /// Featured publications, newest first
    pub async fn featured_publications(&self) -> Vec<Publication> {
        let mut publications: Vec<Publication> = self
            .publications
            .snapshot()
            .await
            .iter()
            .filter(|publication| publication.featured)
            .cloned()
            .collect();
        publications.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
        publications
    }

    /// Dashboard counts
    pub async fn stats(&self) -> ContentStats {
        let events = self.events.snapshot().await;
        let publications = self.publications.snapshot().await;
        let featured = events.iter().filter(|event| event.featured).count()
            + publications.iter().filter(|p| p.featured).count();

        ContentStats {
            announcements: self.announcements.snapshot().await.len(),
            events: events.len(),
            programs: self.programs.snapshot().await.len(),
            publications: publications.len(),
            gallery: self.gallery.snapshot().await.len(),
            featured,
        }
    }

    /// Most recently dated announcements, publications and events
    pub async fn recent_activity(&self) -> Vec<Activity> {
        let mut activity: Vec<Activity> = Vec::new();
        activity.extend(self.announcements.snapshot().await.iter().map(|a| Activity {
            kind: Announcement::KIND,
            title: a.title.clone(),
            date: a.date,
        }));
        activity.extend(self.publications.snapshot().await.iter().map(|p| Activity {
            kind: Publication::KIND,
            title: p.title.clone(),
            date: p.publish_date,
        }));
        activity.extend(self.events.snapshot().await.iter().map(|e| Activity {
            kind: SpecialEvent::KIND,
            title: e.title.clone(),
            date: e.date,
        }));

        activity.sort_by(|a, b| b.date.cmp(&a.date));
        activity.truncate(RECENT_ACTIVITY_LIMIT);
        activity
    }

    /// Announcements matching a title query and, optionally, a priority
    pub async fn search_announcements(
        &self,
        query: &str,
        priority: Option<Priority>,
    ) -> Vec<Announcement> {
        self.announcements
            .search(query)
            .await
            .into_iter()
            .filter(|a| priority.is_none_or(|p| a.priority == p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{announcement, sample_content_config};

    fn store() -> ContentStore {
        ContentStore::from_config(&sample_content_config())
    }

    #[tokio::test]
    async fn test_seeds_without_id_are_numbered() {
        let collection = Collection::new(vec![
            announcement(0, "A", "2024-01-01", Priority::Low),
            announcement(7, "B", "2024-01-02", Priority::Low),
            announcement(0, "C", "2024-01-03", Priority::Low),
        ]);
        let ids: Vec<u32> = collection.snapshot().await.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![8, 7, 9]);
    }

    #[tokio::test]
    async fn test_insert_assigns_next_id() -> Result<()> {
        let collection = Collection::new(vec![announcement(3, "A", "2024-01-01", Priority::Low)]);
        let items = collection
            .insert(announcement(0, "New", "2024-02-01", Priority::High))
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, 4);
        assert_eq!(collection.get(4).await?.title, "New");
        Ok(())
    }

    #[tokio::test]
    async fn test_old_snapshot_is_unchanged_by_writes() -> Result<()> {
        let collection = Collection::new(vec![announcement(1, "A", "2024-01-01", Priority::Low)]);
        let before = collection.snapshot().await;

        let after = collection.remove(1).await?;

        assert_eq!(before.len(), 1);
        assert!(after.is_empty());
        assert!(collection.snapshot().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_and_missing_ids() -> Result<()> {
        let collection = Collection::new(vec![announcement(1, "A", "2024-01-01", Priority::Low)]);
        let before = collection.snapshot().await;

        collection.edit(1, |a| a.title = "A (moved)".to_string()).await?;
        assert_eq!(collection.snapshot().await[0].title, "A (moved)");
        assert_eq!(before[0].title, "A");

        assert!(matches!(
            collection.edit(9, |a| a.title = "X".to_string()).await,
            Err(Error::NotFound { kind: "Announcement", .. })
        ));
        assert!(matches!(
            collection.remove(9).await,
            Err(Error::NotFound { .. })
        ));
        assert!(collection.get(9).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_changes_only_given_fields() -> Result<()> {
        let collection = Collection::new(vec![announcement(1, "A", "2024-01-01", Priority::Low)]);
        let edit = AnnouncementEdit {
            title: Some("  A (revised) ".to_string()),
            content: Some("   ".to_string()),
            priority: Some(Priority::High),
            category: Some("Youth".to_string()),
            ..AnnouncementEdit::default()
        };

        let edited = collection.edit(1, |a| edit.apply(a)).await?;

        assert_eq!(edited.id, 1);
        assert_eq!(edited.title, "A (revised)");
        assert_eq!(edited.content, "A details");
        assert_eq!(edited.priority, Priority::High);
        assert_eq!(edited.category.as_deref(), Some("Youth"));
        assert_eq!(collection.get(1).await?, edited);

        let cleared = AnnouncementEdit {
            category: Some(String::new()),
            ..AnnouncementEdit::default()
        };
        assert_eq!(collection.edit(1, |a| cleared.apply(a)).await?.category, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_cannot_change_id() -> Result<()> {
        let collection = Collection::new(vec![announcement(1, "A", "2024-01-01", Priority::Low)]);
        let edited = collection.edit(1, |a| a.id = 42).await?;
        assert_eq!(edited.id, 1);
        assert!(collection.get(42).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_edit_events_and_publications() -> Result<()> {
        let store = store();
        let events = store
            .events
            .insert(SpecialEvent {
                id: 0,
                title: "Harvest Thanksgiving".to_string(),
                description: "Bring your first fruits.".to_string(),
                date: parse_content_date("2025-09-14")?,
                time: "10:00 AM".to_string(),
                location: "Main Sanctuary".to_string(),
                registration_required: false,
                featured: false,
            })
            .await;
        let event_id = events.last().unwrap().id;
        let edit = EventEdit {
            featured: Some(true),
            location: Some("Church Grounds".to_string()),
            ..EventEdit::default()
        };
        let event = store.events.edit(event_id, |e| edit.apply(e)).await?;
        assert!(event.featured);
        assert_eq!(event.location, "Church Grounds");
        assert_eq!(event.time, "10:00 AM");
        assert_eq!(store.featured_events().await.len(), 2);

        let publications = store
            .publications
            .insert(Publication {
                id: 0,
                title: "Easter Bulletin".to_string(),
                description: "Order of service.".to_string(),
                kind: PublicationKind::Bulletin,
                publish_date: parse_content_date("2025-04-20")?,
                author: "Communications Team".to_string(),
                download_url: "https://example.org/easter.pdf".to_string(),
                featured: false,
            })
            .await;
        let publication_id = publications.last().unwrap().id;
        let edit = PublicationEdit {
            kind: Some(PublicationKind::Magazine),
            ..PublicationEdit::default()
        };
        let publication = store
            .publications
            .edit(publication_id, |p| edit.apply(p))
            .await?;
        assert_eq!(publication.kind, PublicationKind::Magazine);
        assert_eq!(publication.title, "Easter Bulletin");
        assert_eq!(store.stats().await.publications, 4);
        Ok(())
    }

    #[test]
    fn test_parse_content_date() {
        assert_eq!(
            parse_content_date(" 2024-12-25 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert!(matches!(
            parse_content_date("25/12/2024"),
            Err(Error::InvalidForm { .. })
        ));
    }

    #[tokio::test]
    async fn test_latest_announcements_sorted_and_limited() {
        let latest = store().latest_announcements(DEFAULT_ANNOUNCEMENT_LIMIT).await;
        let titles: Vec<&str> = latest.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Christmas Service", "Youth Retreat", "Food Drive", "Choir Practice"]
        );
    }

    #[tokio::test]
    async fn test_weekly_programs_start_on_sunday() {
        let days: Vec<String> = store()
            .weekly_programs()
            .await
            .into_iter()
            .map(|p| p.day)
            .collect();
        assert_eq!(days, vec!["Sunday", "Wednesday", "Friday"]);
    }

    #[tokio::test]
    async fn test_featured_queries() {
        let store = store();
        assert_eq!(store.featured_gallery().await.len(), 1);
        assert_eq!(store.featured_events().await.len(), 1);

        let publications = store.featured_publications().await;
        assert_eq!(publications.len(), 2);
        assert!(publications[0].publish_date > publications[1].publish_date);
    }

    #[tokio::test]
    async fn test_stats_and_recent_activity() {
        let store = store();
        let stats = store.stats().await;
        assert_eq!(stats.announcements, 5);
        assert_eq!(stats.events, 2);
        assert_eq!(stats.programs, 3);
        assert_eq!(stats.publications, 3);
        assert_eq!(stats.gallery, 2);
        assert_eq!(stats.featured, 3);

        let activity = store.recent_activity().await;
        assert_eq!(activity.len(), RECENT_ACTIVITY_LIMIT);
        assert!(activity.windows(2).all(|w| w[0].date >= w[1].date));
        assert_eq!(activity[0].kind, "Event");
    }

    #[tokio::test]
    async fn test_search_announcements() {
        let store = store();
        assert_eq!(store.search_announcements("SERVICE", None).await.len(), 1);
        assert_eq!(
            store
                .search_announcements("", Some(Priority::High))
                .await
                .len(),
            2
        );
        assert!(
            store
                .search_announcements("service", Some(Priority::Low))
                .await
                .is_empty()
        );
    }
}

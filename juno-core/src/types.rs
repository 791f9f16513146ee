//! Core domain types for juno
//!
//! These types are the records the journal persists. Field names serialize in
//! camelCase so the stored layout stays readable by any client of the same
//! key space.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Entry** | A single captured moment: an image, a note or a link |
//! | **Slot** | One of 6 fixed per-day positions (time of day × index 0/1) |
//! | **Timeline** | Creation-ordered list of entries for a date, no capacity limit |
//! | **Media Item** | A tracked book/show/podcast/etc. with a consumption status |
//! | **Idea** | A freeform captured thought, optionally linked to media items |
//! | **Smart Capture** | One brain-dump classification run and its extracted results |
//!
//! Slots and timelines are two separate ways of addressing entries for the
//! same date. They never share storage.

use crate::error::Error;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use url::Url;

/// Generate a fresh opaque identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn require_non_empty(value: &str, what: &str) -> crate::error::Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}

// ============================================
// Entries
// ============================================

/// How an entry's `content` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// `content` is an image URI
    Image,
    /// `content` is free text
    Note,
    /// `content` is an absolute URL
    Link,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Image => "image",
            EntryKind::Note => "note",
            EntryKind::Link => "link",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(EntryKind::Image),
            "note" => Ok(EntryKind::Note),
            "link" => Ok(EntryKind::Link),
            _ => Err(format!("unknown entry type: {}", s)),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional annotations on an entry; every field is independent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// A single captured moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Opaque identifier, assigned at creation
    pub id: String,
    /// Controls how `content` is read
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Image URI, note text or URL depending on `kind`
    pub content: String,
    /// Preview image for links and images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntryMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a validated entry stamped with the current time.
    ///
    /// Note and link content is trimmed; image URIs are kept verbatim.
    pub fn new(kind: EntryKind, content: impl Into<String>) -> crate::error::Result<Self> {
        let content = content.into();
        let content = match kind {
            EntryKind::Image => content,
            EntryKind::Note | EntryKind::Link => content.trim().to_string(),
        };
        Self::validate_content(kind, &content)?;

        let now = Utc::now();
        Ok(Self {
            id: new_id(),
            kind,
            content,
            thumbnail: None,
            metadata: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn note(text: impl Into<String>) -> crate::error::Result<Self> {
        Self::new(EntryKind::Note, text)
    }

    pub fn link(url: impl Into<String>) -> crate::error::Result<Self> {
        Self::new(EntryKind::Link, url)
    }

    pub fn image(uri: impl Into<String>) -> crate::error::Result<Self> {
        Self::new(EntryKind::Image, uri)
    }

    fn validate_content(kind: EntryKind, content: &str) -> crate::error::Result<()> {
        match kind {
            EntryKind::Image => require_non_empty(content, "image reference"),
            EntryKind::Note => require_non_empty(content, "note"),
            EntryKind::Link => {
                require_non_empty(content, "link")?;
                Url::parse(content)
                    .map(|_| ())
                    .map_err(|e| Error::Validation(format!("invalid link {:?}: {}", content, e)))
            }
        }
    }

    /// Check the content invariant for this entry's kind.
    pub fn validate(&self) -> crate::error::Result<()> {
        Self::validate_content(self.kind, &self.content)
    }

    /// Replace the content, keeping the id and creation time.
    pub fn set_content(&mut self, content: impl Into<String>) -> crate::error::Result<()> {
        let content = content.into();
        let content = match self.kind {
            EntryKind::Image => content,
            EntryKind::Note | EntryKind::Link => content.trim().to_string(),
        };
        Self::validate_content(self.kind, &content)?;
        self.content = content;
        self.touch();
        Ok(())
    }

    pub fn set_metadata(&mut self, metadata: Option<EntryMetadata>) {
        self.metadata = metadata;
        self.touch();
    }

    /// Bump `updated_at` after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================
// Daily slots
// ============================================

/// Number of entries each time-of-day slot can hold
pub const ENTRIES_PER_SLOT: u8 = 2;

/// Total addressable slots per date
pub const TOTAL_DAILY_ENTRIES: usize = 6;

/// Part of the day a slotted entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// All slots in display order
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    /// The slot a wall-clock hour (0-23) falls into.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            _ => TimeSlot::Evening,
        }
    }
}

impl std::str::FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" => Ok(TimeSlot::Evening),
            _ => Err(format!("unknown time slot: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Address of one slot within a day, rendered as `{slot}_{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    slot: TimeSlot,
    index: u8,
}

impl SlotKey {
    /// Build a key; `index` must be below [`ENTRIES_PER_SLOT`].
    pub fn new(slot: TimeSlot, index: u8) -> crate::error::Result<Self> {
        if index >= ENTRIES_PER_SLOT {
            return Err(Error::Validation(format!(
                "slot index {} out of range (0..{})",
                index, ENTRIES_PER_SLOT
            )));
        }
        Ok(Self { slot, index })
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Every addressable key for a day, in display order
    pub fn all() -> impl Iterator<Item = SlotKey> {
        TimeSlot::ALL
            .into_iter()
            .flat_map(|slot| (0..ENTRIES_PER_SLOT).map(move |index| SlotKey { slot, index }))
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.slot, self.index)
    }
}

impl std::str::FromStr for SlotKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slot, index) = s
            .split_once('_')
            .ok_or_else(|| format!("malformed slot key: {}", s))?;
        let slot: TimeSlot = slot.parse()?;
        let index = match index {
            "0" => 0,
            "1" => 1,
            _ => return Err(format!("malformed slot index in key: {}", s)),
        };
        SlotKey::new(slot, index).map_err(|e| e.to_string())
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-date map from slot key to at most one entry.
///
/// An absent key is an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySlots(BTreeMap<SlotKey, Entry>);

impl DailySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SlotKey) -> Option<&Entry> {
        self.0.get(key)
    }

    /// Put an entry in a slot, returning whatever it replaced.
    pub fn insert(&mut self, key: SlotKey, entry: Entry) -> Option<Entry> {
        self.0.insert(key, entry)
    }

    pub fn remove(&mut self, key: &SlotKey) -> Option<Entry> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &SlotKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &Entry)> {
        self.0.iter()
    }

    /// Entries filed under one part of the day
    pub fn in_slot(&self, slot: TimeSlot) -> impl Iterator<Item = (&SlotKey, &Entry)> {
        self.0.iter().filter(move |(key, _)| key.slot() == slot)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.0.values().try_for_each(Entry::validate)
    }
}

impl FromIterator<(SlotKey, Entry)> for DailySlots {
    fn from_iter<I: IntoIterator<Item = (SlotKey, Entry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================
// Media
// ============================================

/// Kind of consumable media
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Book,
    Movie,
    #[serde(rename = "tvshow")]
    TvShow,
    Podcast,
    Article,
    Video,
    Music,
    Other,
}

impl MediaType {
    pub const ALL: [MediaType; 8] = [
        MediaType::Book,
        MediaType::Movie,
        MediaType::TvShow,
        MediaType::Podcast,
        MediaType::Article,
        MediaType::Video,
        MediaType::Music,
        MediaType::Other,
    ];

    /// Returns the identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Book => "book",
            MediaType::Movie => "movie",
            MediaType::TvShow => "tvshow",
            MediaType::Podcast => "podcast",
            MediaType::Article => "article",
            MediaType::Video => "video",
            MediaType::Music => "music",
            MediaType::Other => "other",
        }
    }

    /// Plural display name used for collection sections
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Book => "Books",
            MediaType::Movie => "Movies",
            MediaType::TvShow => "TV Shows",
            MediaType::Podcast => "Podcasts",
            MediaType::Article => "Articles",
            MediaType::Video => "Videos",
            MediaType::Music => "Music",
            MediaType::Other => "Other",
        }
    }

    /// Collection section heading: the type's glyph followed by its label
    pub fn section_title(&self) -> String {
        format!("{} {}", crate::cover::glyph_for(*self), self.label())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown media type: {}", s))
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the user is with a media item. Transitions are unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Want,
    Consuming,
    Finished,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Want => "want",
            MediaStatus::Consuming => "consuming",
            MediaStatus::Finished => "finished",
        }
    }
}

impl std::str::FromStr for MediaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want" => Ok(MediaStatus::Want),
            "consuming" => Ok(MediaStatus::Consuming),
            "finished" => Ok(MediaStatus::Finished),
            _ => Err(format!("unknown media status: {}", s)),
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked piece of consumable media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub status: MediaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Explicit cover color; when unset one is derived from the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaItem {
    /// Create an item with a trimmed, non-empty title.
    pub fn new(
        media_type: MediaType,
        title: impl Into<String>,
        status: MediaStatus,
    ) -> crate::error::Result<Self> {
        let title = title.into().trim().to_string();
        require_non_empty(&title, "media title")?;

        let now = Utc::now();
        Ok(Self {
            id: new_id(),
            media_type,
            title,
            status,
            author: None,
            url: None,
            cover_image: None,
            background_color: None,
            notes: None,
            rating: None,
            tags: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_non_empty(&self.title, "media title")?;
        if let Some(rating) = self.rating {
            if !rating.is_finite() {
                return Err(Error::Validation(format!(
                    "media rating must be a finite number, got {}",
                    rating
                )));
            }
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: MediaStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_rating(&mut self, rating: Option<f64>) {
        self.rating = rating;
        self.touch();
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Group items by type, keeping each group's original order.
pub fn group_by_type(items: &[MediaItem]) -> BTreeMap<MediaType, Vec<&MediaItem>> {
    let mut groups: BTreeMap<MediaType, Vec<&MediaItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.media_type).or_default().push(item);
    }
    groups
}

// ============================================
// Ideas and captures
// ============================================

/// A freeform captured thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Media item ids. Not checked against the media collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_media: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(content: impl Into<String>) -> crate::error::Result<Self> {
        let content = content.into().trim().to_string();
        require_non_empty(&content, "idea")?;

        let now = Utc::now();
        Ok(Self {
            id: new_id(),
            content,
            category: None,
            tags: None,
            related_media: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        require_non_empty(&self.content, "idea")
    }

    /// Attach a media item id; duplicates are ignored.
    pub fn relate_media(&mut self, media_id: impl Into<String>) {
        let media_id = media_id.into();
        let related = self.related_media.get_or_insert_with(Vec::new);
        if !related.contains(&media_id) {
            related.push(media_id);
            self.updated_at = Utc::now();
        }
    }
}

/// Audit record of one brain-dump classification run. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartCapture {
    pub id: String,
    pub raw_text: String,
    /// Snapshots taken at capture time
    pub extracted_media: Vec<MediaItem>,
    pub extracted_ideas: Vec<Idea>,
    pub created_at: DateTime<Utc>,
}

impl SmartCapture {
    pub fn new(raw_text: impl Into<String>, media: Vec<MediaItem>, ideas: Vec<Idea>) -> Self {
        Self {
            id: new_id(),
            raw_text: raw_text.into(),
            extracted_media: media,
            extracted_ideas: ideas,
            created_at: Utc::now(),
        }
    }
}

// ============================================
// Profile
// ============================================

/// The single local user's profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub streak_count: u32,
    pub total_entries: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    pub last_active_date: NaiveDate,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: Utc::now(),
            streak_count: 0,
            total_entries: 0,
            interests: Vec::new(),
            last_active_date: today,
        }
    }

    /// Record activity on `today`, extending or resetting the streak.
    pub fn record_activity(&mut self, today: NaiveDate) {
        let gap = today.signed_duration_since(self.last_active_date).num_days();
        match gap {
            0 if self.streak_count > 0 => {}
            1 => self.streak_count += 1,
            _ if gap < 0 => return,
            _ => self.streak_count = 1,
        }
        self.total_entries += 1;
        self.last_active_date = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_note_is_trimmed_and_validated() {
        let entry = Entry::note("  coffee with Sam  ").unwrap();
        assert_eq!(entry.content, "coffee with Sam");
        assert_eq!(entry.kind, EntryKind::Note);
        assert_eq!(entry.created_at, entry.updated_at);

        let err = Entry::note("   ").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_link_requires_absolute_url() {
        assert!(Entry::link("https://example.com/post?id=1").is_ok());
        assert!(Entry::link("example.com").unwrap_err().is_validation());
        assert!(Entry::link("/relative/path").unwrap_err().is_validation());
        assert!(Entry::link("").unwrap_err().is_validation());
    }

    #[test]
    fn test_set_content_keeps_identity() {
        let mut entry = Entry::note("first").unwrap();
        let id = entry.id.clone();
        let created = entry.created_at;

        entry.set_content("second").unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.created_at, created);
        assert!(entry.updated_at >= created);
        assert!(entry.set_content(" ").is_err());
        assert_eq!(entry.content, "second");
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let mut entry = Entry::image("file:///photos/1.jpg").unwrap();
        entry.metadata = Some(EntryMetadata {
            tags: Some(vec!["beach".to_string()]),
            location: None,
            mood: Some("calm".to_string()),
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["metadata"]["mood"], "calm");
        assert!(json["metadata"].get("location").is_none());

        let back: Entry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_slot_key_parse_and_display() {
        let key = SlotKey::new(TimeSlot::Evening, 1).unwrap();
        assert_eq!(key.to_string(), "evening_1");
        assert_eq!(slot("evening_1"), key);

        assert!("evening_2".parse::<SlotKey>().is_err());
        assert!("night_0".parse::<SlotKey>().is_err());
        assert!("morning".parse::<SlotKey>().is_err());
        assert!("morning_00".parse::<SlotKey>().is_err());
        assert!("morning_+1".parse::<SlotKey>().is_err());
        assert!("morning_ 1".parse::<SlotKey>().is_err());
        assert!(SlotKey::new(TimeSlot::Morning, 2).is_err());
    }

    #[test]
    fn test_all_slot_keys() {
        let keys: Vec<String> = SlotKey::all().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "morning_0",
                "morning_1",
                "afternoon_0",
                "afternoon_1",
                "evening_0",
                "evening_1"
            ]
        );
        assert_eq!(keys.len(), TOTAL_DAILY_ENTRIES);
    }

    #[test]
    fn test_daily_slots_serialize_as_keyed_map() {
        let mut slots = DailySlots::new();
        slots.insert(slot("afternoon_1"), Entry::note("lunch").unwrap());

        let json = serde_json::to_value(&slots).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["afternoon_1"]["content"], "lunch");

        let back: DailySlots = serde_json::from_value(json).unwrap();
        assert_eq!(back, slots);
    }

    #[test]
    fn test_daily_slots_reject_unknown_keys() {
        let raw = r#"{"midnight_0": {"id": "x", "type": "note", "content": "hi",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}}"#;
        assert!(serde_json::from_str::<DailySlots>(raw).is_err());
    }

    #[test]
    fn test_time_slot_for_hour() {
        assert_eq!(TimeSlot::for_hour(4), TimeSlot::Evening);
        assert_eq!(TimeSlot::for_hour(5), TimeSlot::Morning);
        assert_eq!(TimeSlot::for_hour(11), TimeSlot::Morning);
        assert_eq!(TimeSlot::for_hour(12), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::for_hour(17), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::for_hour(18), TimeSlot::Evening);
        assert_eq!(TimeSlot::for_hour(23), TimeSlot::Evening);
    }

    #[test]
    fn test_media_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MediaType::TvShow).unwrap(),
            "\"tvshow\""
        );
        for t in MediaType::ALL {
            assert_eq!(t.as_str().parse::<MediaType>().unwrap(), t);
        }
        assert!("comic".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_media_type_section_titles() {
        assert_eq!(MediaType::Book.section_title(), "📚 Books");
        assert_eq!(MediaType::TvShow.section_title(), "📺 TV Shows");
        for t in MediaType::ALL {
            assert!(t.section_title().ends_with(t.label()));
        }
    }

    #[test]
    fn test_media_item_rejects_non_finite_rating() {
        let mut item = MediaItem::new(MediaType::Book, "Dune", MediaStatus::Finished).unwrap();
        item.set_rating(Some(4.5));
        assert!(item.validate().is_ok());

        for rating in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            item.rating = Some(rating);
            assert!(item.validate().unwrap_err().is_validation());
        }
    }

    #[test]
    fn test_media_item_status_changes_bump_updated_at() {
        let mut item = MediaItem::new(MediaType::Book, "  Dune ", MediaStatus::Want).unwrap();
        assert_eq!(item.title, "Dune");
        let before = item.updated_at;

        item.set_status(MediaStatus::Finished);
        item.set_status(MediaStatus::Want);
        assert_eq!(item.status, MediaStatus::Want);
        assert!(item.updated_at >= before);

        assert!(MediaItem::new(MediaType::Book, " ", MediaStatus::Want).is_err());
    }

    #[test]
    fn test_group_by_type() {
        let items = vec![
            MediaItem::new(MediaType::Podcast, "Hardcore History", MediaStatus::Consuming).unwrap(),
            MediaItem::new(MediaType::Book, "Dune", MediaStatus::Want).unwrap(),
            MediaItem::new(MediaType::Book, "Emma", MediaStatus::Finished).unwrap(),
        ];
        let groups = group_by_type(&items);
        assert_eq!(groups.len(), 2);
        let books: Vec<&str> = groups[&MediaType::Book].iter().map(|i| i.title.as_str()).collect();
        assert_eq!(books, vec!["Dune", "Emma"]);
    }

    #[test]
    fn test_idea_relate_media_dedupes() {
        let mut idea = Idea::new("write about Dune").unwrap();
        idea.relate_media("m1");
        idea.relate_media("m1");
        idea.relate_media("m2");
        assert_eq!(idea.related_media.as_deref().unwrap(), ["m1", "m2"]);
    }

    #[test]
    fn test_profile_streaks() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let mut profile = UserProfile::new("Sam", day(1));

        profile.record_activity(day(1));
        assert_eq!(profile.streak_count, 1);
        profile.record_activity(day(1));
        assert_eq!(profile.streak_count, 1);
        profile.record_activity(day(2));
        assert_eq!(profile.streak_count, 2);
        profile.record_activity(day(5));
        assert_eq!(profile.streak_count, 1);
        assert_eq!(profile.total_entries, 4);
        assert_eq!(profile.last_active_date, day(5));
    }
}

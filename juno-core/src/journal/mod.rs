//! The journal: entry, media and idea persistence over a key-value store
//!
//! A [`Journal`] is constructed once at startup and handed to callers; it
//! owns the backend and the capture classifier.
//!
//! ## Failure policy
//!
//! - Getters never fail. A missing key, an unreadable backend or a corrupt
//!   record all come back as an empty value (logged at `warn`).
//! - Writes return [`Result`]. Validation happens before anything is written.
//! - A write that extends an existing record fails when that record cannot
//!   be read or decoded, leaving the stored value untouched.
//!
//! ## Collections
//!
//! Media items, ideas and smart captures are stored as whole lists, so adding
//! one item rewrites the entire collection (O(n) per insert). Every
//! read-modify-write sequence holds the journal's write lock, which keeps
//! overlapping writers in one process from losing each other's changes.

mod async_journal;

pub use async_journal::AsyncJournal;

use crate::capture::{prefill_from_consuming, Classifier, QuickCapture};
use crate::config::{CaptureConfig, Config};
use crate::error::{Error, Result};
use crate::store::{keys, KeyValueStore, MemoryStore, SqliteStore};
use crate::types::*;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

/// What a quick capture stored
#[derive(Debug, Clone, PartialEq)]
pub struct QuickCaptureOutcome {
    /// Entry appended to the date's timeline
    pub entry: Entry,
    /// Media item added to the collection, when the text named one
    pub media: Option<MediaItem>,
}

/// Journal handle over a key-value backend
pub struct Journal {
    kv: Box<dyn KeyValueStore>,
    classifier: Classifier,
    capture: CaptureConfig,
    write_lock: Mutex<()>,
}

impl Journal {
    /// Create a journal over an already-initialized backend
    pub fn new(kv: Box<dyn KeyValueStore>) -> Result<Self> {
        Self::with_capture_config(kv, CaptureConfig::default())
    }

    pub fn with_capture_config(kv: Box<dyn KeyValueStore>, capture: CaptureConfig) -> Result<Self> {
        Ok(Self {
            kv,
            classifier: Classifier::new()?,
            capture,
            write_lock: Mutex::new(()),
        })
    }

    /// Open the SQLite journal described by `config`, running migrations
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.storage.resolved_database_path();
        let store = SqliteStore::open(&path)?;
        store.migrate()?;
        tracing::info!(path = %path.display(), "Journal opened");
        Self::with_capture_config(Box::new(store), config.capture.clone())
    }

    /// Journal backed by memory only (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// The classifier used for captures
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::StoreUnavailable("journal write lock poisoned".to_string()))
    }

    // ============================================
    // Record encoding
    // ============================================

    /// Read and decode a record, failing on a backend error or a record
    /// that does not decode
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(key, error = %e, "Refusing to overwrite undecodable record");
            e
        })?;
        Ok(Some(value))
    }

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Read and decode a record, degrading every failure to `None`.
    ///
    /// Only the public getters use this. Read-modify-write paths go through
    /// [`Journal::load`] so a failed read never turns into an overwrite.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read record, treating as empty");
                None
            }
        }
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read(key).unwrap_or_default()
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).map_err(|e| {
            tracing::error!(key, error = %e, "Failed to write record");
            e
        })
    }

    fn write_many(&self, records: Vec<(String, String)>) -> Result<()> {
        self.kv.set_many(&records).map_err(|e| {
            let keys: Vec<&str> = records.iter().map(|(k, _)| k.as_str()).collect();
            tracing::error!(?keys, error = %e, "Failed to write records");
            e
        })
    }

    // ============================================
    // Daily slots
    // ============================================

    /// Replace the whole slot map for `date`.
    ///
    /// An empty map removes the date's record.
    pub fn save_daily_slots(&self, date: NaiveDate, slots: &DailySlots) -> Result<()> {
        slots.validate()?;
        let _guard = self.lock_writes()?;
        self.put_daily_slots(date, slots)
    }

    fn put_daily_slots(&self, date: NaiveDate, slots: &DailySlots) -> Result<()> {
        let key = keys::slots_key(date);
        if slots.is_empty() {
            tracing::debug!(%date, "Clearing daily slots");
            return self.kv.remove(&key);
        }
        tracing::debug!(%date, filled = slots.len(), "Saving daily slots");
        self.write(&key, slots)
    }

    /// Slot map for `date`; empty when nothing is stored
    pub fn get_daily_slots(&self, date: NaiveDate) -> DailySlots {
        self.read(&keys::slots_key(date)).unwrap_or_default()
    }

    /// Dates that have a slot map, oldest first
    pub fn list_dates_with_slots(&self) -> Vec<NaiveDate> {
        let all_keys = match self.kv.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list keys, treating as empty");
                return Vec::new();
            }
        };

        let mut dates: Vec<NaiveDate> = all_keys
            .iter()
            .filter_map(|key| keys::parse_slots_key(key))
            .collect();
        dates.sort();
        dates
    }

    /// Put `entry` into one slot, replacing any previous occupant
    pub fn set_slot(&self, date: NaiveDate, slot: SlotKey, entry: Entry) -> Result<()> {
        entry.validate()?;
        let _guard = self.lock_writes()?;
        let mut slots: DailySlots = self.load(&keys::slots_key(date))?.unwrap_or_default();
        slots.insert(slot, entry);
        self.put_daily_slots(date, &slots)
    }

    /// Empty one slot. Returns the removed entry, if any.
    pub fn clear_slot(&self, date: NaiveDate, slot: SlotKey) -> Result<Option<Entry>> {
        let _guard = self.lock_writes()?;
        let mut slots: DailySlots = self.load(&keys::slots_key(date))?.unwrap_or_default();
        let removed = slots.remove(&slot);
        if removed.is_some() {
            self.put_daily_slots(date, &slots)?;
        }
        Ok(removed)
    }

    /// Number of filled slots across every date
    pub fn count_slotted_entries(&self) -> usize {
        self.list_dates_with_slots()
            .into_iter()
            .map(|date| self.get_daily_slots(date).len())
            .sum()
    }

    // ============================================
    // Timeline
    // ============================================

    /// Append an entry to the end of `date`'s timeline
    pub fn append_timeline_entry(&self, date: NaiveDate, entry: Entry) -> Result<()> {
        entry.validate()?;
        let _guard = self.lock_writes()?;
        let key = keys::timeline_key(date);
        let mut entries: Vec<Entry> = self.load_list(&key)?;
        entries.push(entry);
        tracing::debug!(%date, count = entries.len(), "Appending timeline entry");
        self.write(&key, &entries)
    }

    /// Timeline for `date` ordered by `created_at`; empty when nothing is
    /// stored. Entries created at the same instant keep their append order.
    pub fn get_timeline_entries(&self, date: NaiveDate) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.read_list(&keys::timeline_key(date));
        entries.sort_by_key(|entry| entry.created_at);
        entries
    }

    /// Remove an entry by id. Unknown ids are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn delete_timeline_entry(&self, date: NaiveDate, entry_id: &str) -> Result<bool> {
        let _guard = self.lock_writes()?;
        let key = keys::timeline_key(date);
        let mut entries: Vec<Entry> = self.load_list(&key)?;
        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);

        if entries.len() == before {
            tracing::debug!(%date, entry_id, "Timeline entry not found, nothing to delete");
            return Ok(false);
        }
        self.write(&key, &entries)?;
        Ok(true)
    }

    // ============================================
    // Media items
    // ============================================

    /// Replace the whole media collection
    pub fn save_media_items(&self, items: &[MediaItem]) -> Result<()> {
        items.iter().try_for_each(MediaItem::validate)?;
        let _guard = self.lock_writes()?;
        self.write(keys::MEDIA, items)
    }

    pub fn get_media_items(&self) -> Vec<MediaItem> {
        self.read_list(keys::MEDIA)
    }

    /// Build a media item with the configured default status
    pub fn new_media_item(&self, media_type: MediaType, title: &str) -> Result<MediaItem> {
        MediaItem::new(media_type, title, self.capture.default_status)
    }

    /// Append one item to the media collection
    pub fn add_media_item(&self, item: MediaItem) -> Result<()> {
        item.validate()?;
        let _guard = self.lock_writes()?;
        let mut items: Vec<MediaItem> = self.load_list(keys::MEDIA)?;
        items.push(item);
        self.write(keys::MEDIA, &items)
    }

    /// Apply `f` to the item with `id` and bump its `updated_at`.
    ///
    /// Returns `false` when no item has that id.
    pub fn update_media_item<F>(&self, id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut MediaItem),
    {
        let _guard = self.lock_writes()?;
        let mut items: Vec<MediaItem> = self.load_list(keys::MEDIA)?;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(false);
        };
        f(item);
        item.validate()?;
        item.touch();
        self.write(keys::MEDIA, &items)?;
        Ok(true)
    }

    // ============================================
    // Ideas
    // ============================================

    /// Replace the whole idea collection
    pub fn save_ideas(&self, ideas: &[Idea]) -> Result<()> {
        ideas.iter().try_for_each(Idea::validate)?;
        let _guard = self.lock_writes()?;
        self.write(keys::IDEAS, ideas)
    }

    pub fn get_ideas(&self) -> Vec<Idea> {
        self.read_list(keys::IDEAS)
    }

    /// Append one idea to the collection
    pub fn add_idea(&self, idea: Idea) -> Result<()> {
        idea.validate()?;
        let _guard = self.lock_writes()?;
        let mut ideas: Vec<Idea> = self.load_list(keys::IDEAS)?;
        ideas.push(idea);
        self.write(keys::IDEAS, &ideas)
    }

    // ============================================
    // Smart captures
    // ============================================

    /// Append a capture record to the audit log
    pub fn save_smart_capture(&self, capture: &SmartCapture) -> Result<()> {
        let _guard = self.lock_writes()?;
        let mut captures: Vec<SmartCapture> = self.load_list(keys::CAPTURES)?;
        captures.push(capture.clone());
        self.write(keys::CAPTURES, &captures)
    }

    pub fn get_smart_captures(&self) -> Vec<SmartCapture> {
        self.read_list(keys::CAPTURES)
    }

    /// Starting text for a brain dump, listing media still in progress
    pub fn brain_dump_prefill(&self) -> String {
        if !self.capture.prefill_consuming {
            return String::new();
        }
        prefill_from_consuming(&self.get_media_items())
    }

    /// Classify a brain dump and store the results.
    ///
    /// The capture record, the extended media list and the extended idea
    /// list are written in one all-or-nothing step. Blank text is rejected
    /// without touching the store.
    pub fn record_brain_dump(&self, text: &str) -> Result<SmartCapture> {
        let extraction = self.classifier.extract(text)?;
        let capture = SmartCapture::new(text, extraction.media, extraction.ideas);

        let _guard = self.lock_writes()?;
        let mut media: Vec<MediaItem> = self.load_list(keys::MEDIA)?;
        let mut ideas: Vec<Idea> = self.load_list(keys::IDEAS)?;
        let mut captures: Vec<SmartCapture> = self.load_list(keys::CAPTURES)?;

        media.extend(capture.extracted_media.iter().cloned());
        ideas.extend(capture.extracted_ideas.iter().cloned());
        captures.push(capture.clone());

        self.write_many(vec![
            (keys::CAPTURES.to_string(), serde_json::to_string(&captures)?),
            (keys::MEDIA.to_string(), serde_json::to_string(&media)?),
            (keys::IDEAS.to_string(), serde_json::to_string(&ideas)?),
        ])?;

        tracing::info!(
            capture_id = %capture.id,
            media = capture.extracted_media.len(),
            ideas = capture.extracted_ideas.len(),
            "Recorded brain dump"
        );

        Ok(capture)
    }

    /// Classify a quick capture and append it to `date`'s timeline.
    ///
    /// When the text names a media item, the item is added to the media
    /// collection in the same write.
    pub fn quick_capture(&self, date: NaiveDate, text: &str) -> Result<QuickCaptureOutcome> {
        let classified = self.classifier.classify_quick(text)?;
        let entry = classified.to_entry()?;
        let media = match classified {
            QuickCapture::Media { item, .. } => Some(item),
            QuickCapture::Link { .. } | QuickCapture::Note { .. } => None,
        };

        let _guard = self.lock_writes()?;
        let timeline_key = keys::timeline_key(date);
        let mut entries: Vec<Entry> = self.load_list(&timeline_key)?;
        entries.push(entry.clone());
        let mut records = vec![(timeline_key, serde_json::to_string(&entries)?)];

        if let Some(item) = &media {
            let mut items: Vec<MediaItem> = self.load_list(keys::MEDIA)?;
            items.push(item.clone());
            records.push((keys::MEDIA.to_string(), serde_json::to_string(&items)?));
        }

        self.write_many(records)?;

        tracing::debug!(
            %date,
            kind = %entry.kind,
            media = media.is_some(),
            "Stored quick capture"
        );

        Ok(QuickCaptureOutcome { entry, media })
    }

    // ============================================
    // Profile and housekeeping
    // ============================================

    pub fn get_user_profile(&self) -> Option<UserProfile> {
        self.read(keys::PROFILE)
    }

    pub fn save_user_profile(&self, profile: &UserProfile) -> Result<()> {
        let _guard = self.lock_writes()?;
        self.write(keys::PROFILE, profile)
    }

    /// Erase every record in the journal
    pub fn delete_all_data(&self) -> Result<()> {
        let _guard = self.lock_writes()?;
        tracing::warn!("Deleting all journal data");
        self.kv.clear()
    }
}

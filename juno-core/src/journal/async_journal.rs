//! Async interface to the journal
//!
//! Storage calls block, so each operation runs on tokio's blocking pool.
//! Dropping a returned future does not cancel the write it started: the
//! blocking task runs to completion regardless.

use super::{Journal, QuickCaptureOutcome};
use crate::error::{Error, Result};
use crate::types::*;
use chrono::NaiveDate;
use std::sync::Arc;

/// Cloneable async handle sharing one [`Journal`]
#[derive(Clone)]
pub struct AsyncJournal {
    inner: Arc<Journal>,
}

impl AsyncJournal {
    pub fn new(journal: Journal) -> Self {
        Self {
            inner: Arc::new(journal),
        }
    }

    /// The underlying synchronous journal
    pub fn journal(&self) -> &Journal {
        &self.inner
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Journal) -> Result<T> + Send + 'static,
    {
        let journal = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&journal))
            .await
            .map_err(|e| Error::StoreUnavailable(format!("storage task failed: {}", e)))?
    }

    async fn read<T, F>(&self, op: F) -> T
    where
        T: Default + Send + 'static,
        F: FnOnce(&Journal) -> T + Send + 'static,
    {
        let journal = Arc::clone(&self.inner);
        match tokio::task::spawn_blocking(move || op(&journal)).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Storage read task failed, treating as empty");
                T::default()
            }
        }
    }

    // Daily slots

    pub async fn save_daily_slots(&self, date: NaiveDate, slots: DailySlots) -> Result<()> {
        self.run(move |j| j.save_daily_slots(date, &slots)).await
    }

    pub async fn get_daily_slots(&self, date: NaiveDate) -> DailySlots {
        self.read(move |j| j.get_daily_slots(date)).await
    }

    pub async fn list_dates_with_slots(&self) -> Vec<NaiveDate> {
        self.read(|j| j.list_dates_with_slots()).await
    }

    pub async fn set_slot(&self, date: NaiveDate, slot: SlotKey, entry: Entry) -> Result<()> {
        self.run(move |j| j.set_slot(date, slot, entry)).await
    }

    pub async fn clear_slot(&self, date: NaiveDate, slot: SlotKey) -> Result<Option<Entry>> {
        self.run(move |j| j.clear_slot(date, slot)).await
    }

    // Timeline

    pub async fn append_timeline_entry(&self, date: NaiveDate, entry: Entry) -> Result<()> {
        self.run(move |j| j.append_timeline_entry(date, entry)).await
    }

    pub async fn get_timeline_entries(&self, date: NaiveDate) -> Vec<Entry> {
        self.read(move |j| j.get_timeline_entries(date)).await
    }

    pub async fn delete_timeline_entry(&self, date: NaiveDate, entry_id: String) -> Result<bool> {
        self.run(move |j| j.delete_timeline_entry(date, &entry_id))
            .await
    }

    // Collections

    pub async fn save_media_items(&self, items: Vec<MediaItem>) -> Result<()> {
        self.run(move |j| j.save_media_items(&items)).await
    }

    pub async fn get_media_items(&self) -> Vec<MediaItem> {
        self.read(|j| j.get_media_items()).await
    }

    pub async fn add_media_item(&self, item: MediaItem) -> Result<()> {
        self.run(move |j| j.add_media_item(item)).await
    }

    pub async fn update_media_item<F>(&self, id: String, f: F) -> Result<bool>
    where
        F: FnOnce(&mut MediaItem) + Send + 'static,
    {
        self.run(move |j| j.update_media_item(&id, f)).await
    }

    pub async fn save_ideas(&self, ideas: Vec<Idea>) -> Result<()> {
        self.run(move |j| j.save_ideas(&ideas)).await
    }

    pub async fn get_ideas(&self) -> Vec<Idea> {
        self.read(|j| j.get_ideas()).await
    }

    pub async fn add_idea(&self, idea: Idea) -> Result<()> {
        self.run(move |j| j.add_idea(idea)).await
    }

    pub async fn save_smart_capture(&self, capture: SmartCapture) -> Result<()> {
        self.run(move |j| j.save_smart_capture(&capture)).await
    }

    pub async fn get_smart_captures(&self) -> Vec<SmartCapture> {
        self.read(|j| j.get_smart_captures()).await
    }

    // Capture flows

    pub async fn brain_dump_prefill(&self) -> String {
        self.read(|j| j.brain_dump_prefill()).await
    }

    pub async fn record_brain_dump(&self, text: String) -> Result<SmartCapture> {
        self.run(move |j| j.record_brain_dump(&text)).await
    }

    pub async fn quick_capture(&self, date: NaiveDate, text: String) -> Result<QuickCaptureOutcome> {
        self.run(move |j| j.quick_capture(date, &text)).await
    }

    // Profile

    pub async fn get_user_profile(&self) -> Option<UserProfile> {
        self.read(|j| j.get_user_profile()).await
    }

    pub async fn save_user_profile(&self, profile: UserProfile) -> Result<()> {
        self.run(move |j| j.save_user_profile(&profile)).await
    }

    pub async fn delete_all_data(&self) -> Result<()> {
        self.run(|j| j.delete_all_data()).await
    }
}

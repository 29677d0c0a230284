//! Record store seam over the daily-record document collection.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::record::DailyRecord;

type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the record for one (user, day), if any.
    async fn find(&self, user_id: &str, date: NaiveDate) -> StoreResult<Option<DailyRecord>>;

    /// Insert or replace the record for its (user, day). Last writer wins
    /// on the whole document.
    async fn upsert(&self, record: &DailyRecord) -> StoreResult<()>;

    /// Records for a user with `since <= date < before`, ordered most
    /// recent first.
    async fn history(
        &self,
        user_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> StoreResult<Vec<DailyRecord>>;

    /// Users with any record on or after `since`, for scheduled runs.
    async fn recent_user_ids(&self, since: NaiveDate) -> StoreResult<Vec<String>>;

    /// Load the record for a day, creating a fresh in-memory one when
    /// absent. The new record is only persisted on the first upsert.
    async fn find_or_create(&self, user_id: &str, date: NaiveDate) -> StoreResult<DailyRecord> {
        Ok(self
            .find(user_id, date)
            .await?
            .unwrap_or_else(|| DailyRecord::new(user_id, date)))
    }
}

/// In-memory store used by tests and single-process setups.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<(String, NaiveDate), DailyRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find(&self, user_id: &str, date: NaiveDate) -> StoreResult<Option<DailyRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&(user_id.to_string(), date)).cloned())
    }

    async fn upsert(&self, record: &DailyRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let mut stored = record.clone();
        stored.updated_at = chrono::Utc::now();
        records.insert((record.user_id.clone(), record.date), stored);
        Ok(())
    }

    async fn history(
        &self,
        user_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> StoreResult<Vec<DailyRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<DailyRecord> = records
            .values()
            .filter(|r| r.user_id == user_id && r.date >= since && r.date < before)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(matching)
    }

    async fn recent_user_ids(&self, since: NaiveDate) -> StoreResult<Vec<String>> {
        let records = self.records.read().await;
        let mut users: Vec<String> = records
            .values()
            .filter(|r| r.date >= since)
            .map(|r| r.user_id.clone())
            .collect();
        users.sort();
        users.dedup();
        Ok(users)
    }
}

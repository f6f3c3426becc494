//! Leaderboards over one context's check-in records

use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::CheckinService;
use crate::domain::entities::{CheckinDocument, CheckinRecord, ContextRecords, Metric};
use crate::domain::traits::Store;

pub const LEADERBOARD_SIZE: usize = 10;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    pub username: String,
    pub value: u64,
}

impl RankEntry {
    fn new(record: &CheckinRecord, value: u64) -> Self {
        Self {
            username: record.display_name().to_string(),
            value,
        }
    }
}

pub struct LeaderboardService<S> {
    checkins: Arc<CheckinService<S>>,
}

impl<S> Clone for LeaderboardService<S> {
    fn clone(&self) -> Self {
        Self {
            checkins: Arc::clone(&self.checkins),
        }
    }
}

impl<S: Store<CheckinDocument>> LeaderboardService<S> {
    pub fn new(checkins: Arc<CheckinService<S>>) -> Self {
        Self { checkins }
    }

    /// Top users of a context by one counter
    pub fn rank(&self, context: &str, metric: Metric) -> Result<Vec<RankEntry>, BotError> {
        let records = self.checkins.context_records(context)?;
        Ok(rank_records(&records, metric))
    }

    /// Users who checked in on `today`, longest streak first
    pub fn today_rank(&self, context: &str, today: NaiveDate) -> Result<Vec<RankEntry>, BotError> {
        let records = self.checkins.context_records(context)?;
        Ok(today_rank_records(&records, today))
    }
}

/// Sorts descending by `metric`. Records iterate in user-id order and the
/// sort is stable, so ties stay in ascending user-id order.
pub fn rank_records(records: &ContextRecords, metric: Metric) -> Vec<RankEntry> {
    top(
        records
            .values()
            .map(|record| RankEntry::new(record, metric.value(record)))
            .collect(),
    )
}

pub fn today_rank_records(records: &ContextRecords, today: NaiveDate) -> Vec<RankEntry> {
    top(
        records
            .values()
            .filter(|record| record.checked_in_on(today))
            .map(|record| RankEntry::new(record, record.continuous_days))
            .collect(),
    )
}

fn top(mut entries: Vec<RankEntry>) -> Vec<RankEntry> {
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user check-in counters for a single context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinRecord {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub total_days: u64,
    #[serde(default)]
    pub continuous_days: u64,
    #[serde(default)]
    pub month_days: u64,
    #[serde(default)]
    pub total_rewards: u64,
    #[serde(default)]
    pub month_rewards: u64,
    /// ISO date of the last successful check-in. Kept as written so a
    /// malformed value survives a load and is treated as a broken streak.
    #[serde(default)]
    pub last_checkin: Option<String>,
}

impl CheckinRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn last_checkin_date(&self) -> Option<NaiveDate> {
        self.last_checkin
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    pub fn checked_in_on(&self, day: NaiveDate) -> bool {
        self.last_checkin_date() == Some(day)
    }

    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_USERNAME)
    }
}

pub const UNKNOWN_USERNAME: &str = "未知";

/// Leaderboard metrics backed by a record counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalRewards,
    MonthRewards,
    TotalDays,
    MonthDays,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TotalRewards,
        Metric::MonthRewards,
        Metric::TotalDays,
        Metric::MonthDays,
    ];

    pub fn value(self, record: &CheckinRecord) -> u64 {
        match self {
            Metric::TotalRewards => record.total_rewards,
            Metric::MonthRewards => record.month_rewards,
            Metric::TotalDays => record.total_days,
            Metric::MonthDays => record.month_days,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::TotalRewards => "total_rewards",
            Metric::MonthRewards => "month_rewards",
            Metric::TotalDays => "total_days",
            Metric::MonthDays => "month_days",
        }
    }
}

/// user id -> record
pub type ContextRecords = BTreeMap<String, CheckinRecord>;

/// context id -> user id -> record, the whole persisted check-in state
pub type CheckinDocument = BTreeMap<String, ContextRecords>;

/// True when both dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

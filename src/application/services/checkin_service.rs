//! Daily check-in engine

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::BotError;
use crate::domain::entities::record::same_month;
use crate::domain::entities::{CheckinDocument, CheckinRecord, ContextRecords};
use crate::domain::traits::Store;

/// Stardust granted per check-in
pub const REWARD_RANGE: RangeInclusive<u64> = 1..=30;

/// One is attached to every successful check-in
pub const MOTIVATIONAL_MESSAGES: &[&str] = &[
    "不相信自己的人，连努力的价值都没有 💪",
    "孤独，不是被父母责备后难过的那种程度比得上的 🌌",
    "人的梦想，是不会终结的！ ✨",
    "不要为你的失败找借口！ ⚔️",
    "这个世界是残酷的，但依然美丽 🌸",
    "没有伴随着痛苦的教训是毫无意义的 💥",
    "已经无法回来的东西，拥有和舍弃都很痛苦 💔",
    "纵使我身形俱灭，也要将恶鬼斩杀 🔥",
    "所谓今天的自己，正是由昨天的自己积累而成 🧱",
    "痛苦的时候，就是成长的时候 🌱",
    "你将不再是道具，而是人如其名的人 🦋",
    "不要忘记相信你所坚信的自己的道路 🧭",
    "能哭的地方只有厕所和爸爸的怀里 😢🤗",
    "这虽然是游戏，但可不是闹着玩的 🎮❗",
    "不能逃避，不能逃避，不能逃避 🛡️",
    "有资格开枪的人，只有有着被射杀觉悟的人 🔫💀",
    "奇迹不是免费的 💫",
    "我对普通的人类没有兴趣 👽",
    "人类啊，就是会不断重复错误的种族 🔄",
    "我们总是在注意错过太多，却不注意自己拥有多少 💎",
    "或许前路永夜，即便如此我也要前进 🌃🚶♂️",
    "不要可怜自己，若是可怜自己，人生便是一场永无终结的噩梦 😈",
    "越是痛苦的时候，越要笑得灿烂 😄🌧️",
    "痛苦是成长的证明 📜",
    "前进吧，向着深渊的尽头 ⛰️➡️",
    "科学就是力量，但更重要的是使用力量的人 🔬🧠",
    "青春就是会做很多无意义的事啊 🎈",
    "命运是可以改变的，用自己的双手 👐🔧",
    "只要不放弃，总有一天会找到答案 🔍⌛",
    "你身体里的每一个细胞都在为你努力 🧬💦",
];

/// Result of one check-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckinOutcome {
    Success {
        continuous_days: u64,
        reward: u64,
        message: &'static str,
    },
    AlreadyCheckedIn,
    ServiceUnavailable,
}

/// Owns the check-in document and applies check-ins to it.
///
/// The document is loaded once on construction and written back in full after
/// every successful check-in.
pub struct CheckinService<S> {
    store: S,
    document: Mutex<CheckinDocument>,
    rng: Mutex<StdRng>,
}

impl<S: Store<CheckinDocument>> CheckinService<S> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Seeded variant so rewards are reproducible in tests
    pub fn with_rng(store: S, rng: StdRng) -> Self {
        let document = store.load();
        tracing::info!("Check-in data loaded for {} contexts", document.len());
        Self {
            store,
            document: Mutex::new(document),
            rng: Mutex::new(rng),
        }
    }

    /// Checks a user in for `today`. Never fails; problems become
    /// [`CheckinOutcome::ServiceUnavailable`].
    pub fn check_in(
        &self,
        context: &str,
        user_id: &str,
        display_name: &str,
        today: NaiveDate,
    ) -> CheckinOutcome {
        match self.try_check_in(context, user_id, display_name, today) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    context,
                    user_id,
                    "Check-in failed: {}",
                    e
                );
                CheckinOutcome::ServiceUnavailable
            }
        }
    }

    fn try_check_in(
        &self,
        context: &str,
        user_id: &str,
        display_name: &str,
        today: NaiveDate,
    ) -> Result<CheckinOutcome, BotError> {
        let mut document = self.lock_document()?;

        let existing = document.get_mut(context).and_then(|users| users.get_mut(user_id));
        if let Some(record) = existing {
            record.username = Some(display_name.to_string());
            if record.checked_in_on(today) {
                tracing::debug!(context, user_id, "Already checked in on {}", today);
                return Ok(CheckinOutcome::AlreadyCheckedIn);
            }
        }

        let previous = document
            .get(context)
            .and_then(|users| users.get(user_id))
            .cloned()
            .unwrap_or_default();

        let (reward, message) = self.draw()?;
        let next = advance(&previous, display_name, today, reward)?;
        let continuous_days = next.continuous_days;

        document
            .entry(context.to_string())
            .or_default()
            .insert(user_id.to_string(), next);

        if let Err(e) = self.store.save(&document) {
            // In-memory state stays ahead of disk until the next successful save.
            tracing::warn!(context, user_id, "Check-in kept in memory only: {}", e);
        }

        tracing::info!(context, user_id, continuous_days, reward, "Checked in on {}", today);
        Ok(CheckinOutcome::Success {
            continuous_days,
            reward,
            message,
        })
    }

    fn draw(&self) -> Result<(u64, &'static str), BotError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| BotError::Internal("reward rng lock poisoned".to_string()))?;
        let reward = rng.gen_range(REWARD_RANGE);
        let message = MOTIVATIONAL_MESSAGES.choose(&mut *rng).copied().unwrap_or("");
        Ok((reward, message))
    }

    fn lock_document(&self) -> Result<MutexGuard<'_, CheckinDocument>, BotError> {
        self.document
            .lock()
            .map_err(|_| BotError::Internal("check-in document lock poisoned".to_string()))
    }

    /// Current record for a user, if they ever checked in here
    pub fn record(&self, context: &str, user_id: &str) -> Result<Option<CheckinRecord>, BotError> {
        let document = self.lock_document()?;
        Ok(document.get(context).and_then(|users| users.get(user_id)).cloned())
    }

    /// Copy of every record in one context
    pub fn context_records(&self, context: &str) -> Result<ContextRecords, BotError> {
        let document = self.lock_document()?;
        Ok(document.get(context).cloned().unwrap_or_default())
    }
}

/// Applies one successful check-in to a record.
///
/// Continuity only survives when the previous check-in was exactly the day
/// before; any other gap, including a future or malformed date, restarts at 1.
/// Monthly counters reset when the month changed or the previous date is
/// unreadable.
pub fn advance(
    previous: &CheckinRecord,
    username: &str,
    today: NaiveDate,
    reward: u64,
) -> Result<CheckinRecord, BotError> {
    let last = previous.last_checkin_date();

    let continuous_days = match last {
        Some(day) if today.pred_opt() == Some(day) => bump(previous.continuous_days, 1)?,
        _ => 1,
    };

    let rollover = previous.last_checkin.is_some() && !last.is_some_and(|day| same_month(day, today));
    let (month_days, month_rewards) = if rollover {
        (0, 0)
    } else {
        (previous.month_days, previous.month_rewards)
    };

    Ok(CheckinRecord {
        username: Some(username.to_string()),
        total_days: bump(previous.total_days, 1)?,
        continuous_days,
        month_days: bump(month_days, 1)?,
        total_rewards: bump(previous.total_rewards, reward)?,
        month_rewards: bump(month_rewards, reward)?,
        last_checkin: Some(today.format("%Y-%m-%d").to_string()),
    })
}

fn bump(counter: u64, by: u64) -> Result<u64, BotError> {
    counter
        .checked_add(by)
        .ok_or_else(|| BotError::Internal("check-in counter overflow".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::StorageError;
    use crate::infrastructure::storage::MemoryStore;
    use std::sync::Arc;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service() -> (Arc<MemoryStore<CheckinDocument>>, CheckinService<Arc<MemoryStore<CheckinDocument>>>) {
        let store: Arc<MemoryStore<CheckinDocument>> = Arc::new(MemoryStore::new());
        let service = CheckinService::with_rng(store.clone(), StdRng::seed_from_u64(7));
        (store, service)
    }

    fn record_with_last(last: &str) -> CheckinRecord {
        CheckinRecord {
            username: Some("old name".into()),
            total_days: 10,
            continuous_days: 4,
            month_days: 3,
            total_rewards: 150,
            month_rewards: 45,
            last_checkin: Some(last.into()),
        }
    }

    struct BrokenStore;

    impl Store<CheckinDocument> for BrokenStore {
        fn load(&self) -> CheckinDocument {
            CheckinDocument::new()
        }

        fn save(&self, _document: &CheckinDocument) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn scenario_streak_and_gap() {
        let (_, service) = service();

        let outcome = service.check_in("C", "U", "Aqua", day("2024-03-01"));
        assert!(matches!(outcome, CheckinOutcome::Success { continuous_days: 1, .. }));
        let r = service.record("C", "U").unwrap().unwrap();
        assert_eq!((r.continuous_days, r.total_days, r.month_days), (1, 1, 1));

        assert_eq!(
            service.check_in("C", "U", "Aqua", day("2024-03-01")),
            CheckinOutcome::AlreadyCheckedIn
        );

        service.check_in("C", "U", "Aqua", day("2024-03-02"));
        let r = service.record("C", "U").unwrap().unwrap();
        assert_eq!((r.continuous_days, r.total_days, r.month_days), (2, 2, 2));

        service.check_in("C", "U", "Aqua", day("2024-03-10"));
        let r = service.record("C", "U").unwrap().unwrap();
        assert_eq!((r.continuous_days, r.total_days, r.month_days), (1, 3, 3));
    }

    #[test]
    fn second_check_in_same_day_leaves_counters_alone() {
        let (store, service) = service();
        service.check_in("C", "U", "Aqua", day("2024-03-01"));
        let before = service.record("C", "U").unwrap().unwrap();

        let outcome = service.check_in("C", "U", "Aqua (renamed)", day("2024-03-01"));
        assert_eq!(outcome, CheckinOutcome::AlreadyCheckedIn);

        let after = service.record("C", "U").unwrap().unwrap();
        assert_eq!(after.total_days, before.total_days);
        assert_eq!(after.total_rewards, before.total_rewards);
        assert_eq!(after.month_rewards, before.month_rewards);
        assert_eq!(after.continuous_days, before.continuous_days);
        assert_eq!(after.username.as_deref(), Some("Aqua (renamed)"));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn rewards_stay_in_range_and_sum_up() {
        let (_, service) = service();
        let mut granted = 0;
        let mut today = day("2024-01-01");
        for _ in 0..60 {
            match service.check_in("C", "U", "Darkness", today) {
                CheckinOutcome::Success { reward, message, .. } => {
                    assert!(REWARD_RANGE.contains(&reward));
                    assert!(MOTIVATIONAL_MESSAGES.contains(&message));
                    granted += reward;
                }
                other => panic!("unexpected outcome {:?}", other),
            }
            today = today.succ_opt().unwrap();
        }
        let r = service.record("C", "U").unwrap().unwrap();
        assert_eq!(r.total_rewards, granted);
        assert_eq!(r.total_days, 60);
        assert_eq!(r.continuous_days, 60);
        assert!(r.total_days >= r.month_days);
        assert!(r.total_rewards >= r.month_rewards);
    }

    #[test]
    fn contexts_are_isolated() {
        let (_, service) = service();
        service.check_in("group_1", "U", "Aqua", day("2024-03-01"));
        let outcome = service.check_in("group_2", "U", "Aqua", day("2024-03-01"));
        assert!(matches!(outcome, CheckinOutcome::Success { .. }));
        assert_eq!(service.context_records("group_1").unwrap().len(), 1);
        assert_eq!(service.context_records("group_2").unwrap().len(), 1);
    }

    #[test]
    fn every_success_is_persisted() {
        let (store, service) = service();
        service.check_in("C", "A", "a", day("2024-03-01"));
        service.check_in("C", "B", "b", day("2024-03-01"));
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load()["C"].len(), 2);
    }

    #[test]
    fn state_survives_reload() {
        let store: Arc<MemoryStore<CheckinDocument>> = Arc::new(MemoryStore::new());
        let first = CheckinService::with_rng(store.clone(), StdRng::seed_from_u64(1));
        first.check_in("C", "U", "Aqua", day("2024-03-01"));

        let second = CheckinService::with_rng(store.clone(), StdRng::seed_from_u64(2));
        assert_eq!(
            second.check_in("C", "U", "Aqua", day("2024-03-01")),
            CheckinOutcome::AlreadyCheckedIn
        );
    }

    #[test]
    fn save_failure_still_succeeds_in_memory() {
        let service = CheckinService::with_rng(BrokenStore, StdRng::seed_from_u64(3));
        let outcome = service.check_in("C", "U", "Aqua", day("2024-03-01"));
        assert!(matches!(outcome, CheckinOutcome::Success { .. }));
        assert_eq!(
            service.check_in("C", "U", "Aqua", day("2024-03-01")),
            CheckinOutcome::AlreadyCheckedIn
        );
    }

    #[test]
    fn overflow_reports_unavailable_without_mutation() {
        let mut users = ContextRecords::new();
        users.insert(
            "U".to_string(),
            CheckinRecord {
                total_rewards: u64::MAX,
                ..record_with_last("2024-02-29")
            },
        );
        let mut document = CheckinDocument::new();
        document.insert("C".to_string(), users);
        let store = Arc::new(MemoryStore::with_document(document));
        let service = CheckinService::with_rng(store.clone(), StdRng::seed_from_u64(4));

        let outcome = service.check_in("C", "U", "Aqua", day("2024-03-01"));
        assert_eq!(outcome, CheckinOutcome::ServiceUnavailable);
        let r = service.record("C", "U").unwrap().unwrap();
        assert_eq!(r.last_checkin.as_deref(), Some("2024-02-29"));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn advance_increments_on_consecutive_day() {
        let next = advance(&record_with_last("2024-03-04"), "new name", day("2024-03-05"), 7).unwrap();
        assert_eq!(next.continuous_days, 5);
        assert_eq!(next.total_days, 11);
        assert_eq!(next.month_days, 4);
        assert_eq!(next.total_rewards, 157);
        assert_eq!(next.month_rewards, 52);
        assert_eq!(next.username.as_deref(), Some("new name"));
        assert_eq!(next.last_checkin.as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn advance_resets_streak_after_gap() {
        let next = advance(&record_with_last("2024-03-04"), "n", day("2024-03-06"), 1).unwrap();
        assert_eq!(next.continuous_days, 1);
        assert_eq!(next.month_days, 4);
    }

    #[test]
    fn advance_resets_streak_for_future_or_malformed_dates() {
        let next = advance(&record_with_last("2024-03-09"), "n", day("2024-03-05"), 1).unwrap();
        assert_eq!(next.continuous_days, 1);

        let next = advance(&record_with_last("yesterday"), "n", day("2024-03-05"), 1).unwrap();
        assert_eq!(next.continuous_days, 1);
        assert_eq!(next.month_days, 1);
        assert_eq!(next.month_rewards, 1);
    }

    #[test]
    fn month_rollover_keeps_streak() {
        let next = advance(&record_with_last("2024-01-31"), "n", day("2024-02-01"), 9).unwrap();
        assert_eq!(next.month_days, 1);
        assert_eq!(next.month_rewards, 9);
        assert_eq!(next.continuous_days, 5);
        assert_eq!(next.total_days, 11);
    }

    #[test]
    fn year_rollover_resets_month() {
        let next = advance(&record_with_last("2023-12-31"), "n", day("2024-01-01"), 2).unwrap();
        assert_eq!(next.month_days, 1);
        assert_eq!(next.continuous_days, 5);
    }

    #[test]
    fn message_table_is_complete() {
        assert_eq!(MOTIVATIONAL_MESSAGES.len(), 30);
        assert!(MOTIVATIONAL_MESSAGES.iter().all(|m| !m.trim().is_empty()));
    }

    #[test]
    fn first_check_in_starts_everything_at_one() {
        let next = advance(&CheckinRecord::default(), "n", day("2024-03-01"), 30).unwrap();
        assert_eq!(
            (next.continuous_days, next.total_days, next.month_days),
            (1, 1, 1)
        );
        assert_eq!((next.total_rewards, next.month_rewards), (30, 30));
    }
}

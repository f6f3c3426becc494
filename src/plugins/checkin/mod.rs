//! Daily check-in plugin with streaks, stardust rewards and leaderboards

use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::errors::{CommandError, ConfigError};
use crate::application::messaging::resolve_context;
use crate::application::services::{CheckinOutcome, CheckinService, LeaderboardService, RankEntry};
use crate::domain::entities::{CheckinDocument, Command, Message, Metric};
use crate::domain::traits::Store;
use crate::infrastructure::config::{Config, DayPolicy};
use crate::infrastructure::storage::JsonStore;
use crate::plugins::Plugin;

pub const PLUGIN_NAME: &str = "checkin";
pub const DATA_FILE: &str = "checkin_data.json";

const UNAVAILABLE: &str = "🔧 契约服务暂时不可用，请联系管理员";

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct CheckinPlugin<S> {
    checkins: Arc<CheckinService<S>>,
    boards: LeaderboardService<S>,
    today: Clock,
}

impl CheckinPlugin<JsonStore<CheckinDocument>> {
    /// Plugin backed by `<data-dir>/checkin/checkin_data.json`
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let days = config.checkin.day_policy()?;
        let store = JsonStore::new(config.plugin_dir(PLUGIN_NAME).join(DATA_FILE));
        tracing::info!("Check-in data file: {}", store.path().display());
        Ok(Self::new(CheckinService::new(store), days))
    }
}

impl<S: Store<CheckinDocument>> CheckinPlugin<S> {
    pub fn new(service: CheckinService<S>, days: DayPolicy) -> Self {
        Self::with_clock(service, move || days.today())
    }

    /// Uses `today` instead of the wall clock to date check-ins
    pub fn with_clock<F>(service: CheckinService<S>, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        let checkins = Arc::new(service);
        Self {
            boards: LeaderboardService::new(Arc::clone(&checkins)),
            checkins,
            today: Arc::new(today),
        }
    }
}

impl<S: Store<CheckinDocument> + 'static> Plugin for CheckinPlugin<S> {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Daily check-in with streaks and leaderboards"
    }

    fn commands(&self) -> Vec<Command> {
        let mut commands = vec![self.checkin_command(), rank_menu_command()];

        for board in Board::ALL {
            let boards = self.boards.clone();
            let today = Arc::clone(&self.today);
            commands.push(
                Command::new(board.command())
                    .with_description(board.description())
                    .with_aliases(board.aliases().iter().copied())
                    .with_handler(move |msg, _| {
                        let context = resolve_context(msg);
                        let ranked = match board {
                            Board::Metric(metric) => boards.rank(&context, metric),
                            Board::Today => boards.today_rank(&context, today()),
                        };
                        Ok(match ranked {
                            Ok(entries) => render_board(board, &entries),
                            Err(e) => {
                                tracing::error!(context = %context, "Leaderboard failed: {}", e);
                                UNAVAILABLE.to_string()
                            }
                        })
                    }),
            );
        }

        commands
    }
}

impl<S: Store<CheckinDocument> + 'static> CheckinPlugin<S> {
    fn checkin_command(&self) -> Command {
        let checkins = Arc::clone(&self.checkins);
        let today = Arc::clone(&self.today);
        Command::new("checkin")
            .with_description("Daily check-in")
            .with_aliases(["signin", "签到", "打卡"])
            .with_handler(move |msg: &Message, _| {
                let user_id = msg
                    .sender_id()
                    .ok_or_else(|| CommandError::InvalidArgs("message has no sender".to_string()))?;
                let context = resolve_context(msg);
                let outcome = checkins.check_in(&context, user_id, &msg.sender_name(), today());
                Ok(render_outcome(&outcome))
            })
    }
}

fn rank_menu_command() -> Command {
    Command::new("rank")
        .with_description("List the check-in leaderboards")
        .with_aliases(["leaderboard", "签到排行榜", "签到排行"])
        .with_handler(|_, _| {
            let mut menu = vec!["📊 排行榜类型：".to_string()];
            menu.extend(
                Board::ALL
                    .iter()
                    .map(|b| format!("/{} - {}", b.command(), b.description())),
            );
            Ok(menu.join("\n"))
        })
}

/// The five leaderboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Metric(Metric),
    Today,
}

impl Board {
    pub const ALL: [Board; 5] = [
        Board::Metric(Metric::TotalRewards),
        Board::Metric(Metric::MonthRewards),
        Board::Metric(Metric::TotalDays),
        Board::Metric(Metric::MonthDays),
        Board::Today,
    ];

    pub fn command(self) -> &'static str {
        match self {
            Board::Metric(Metric::TotalRewards) => "rank-rewards",
            Board::Metric(Metric::MonthRewards) => "rank-month-rewards",
            Board::Metric(Metric::TotalDays) => "rank-days",
            Board::Metric(Metric::MonthDays) => "rank-month-days",
            Board::Today => "rank-today",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Board::Metric(Metric::TotalRewards) => &["签到总奖励排行榜", "签到总排行"],
            Board::Metric(Metric::MonthRewards) => &["签到月奖励排行榜", "签到月排行"],
            Board::Metric(Metric::TotalDays) => &["签到总天数排行榜", "签到总天数排行"],
            Board::Metric(Metric::MonthDays) => &["签到月天数排行榜", "签到月天数排行"],
            Board::Today => &["签到今日排行榜", "签到今日排行", "签到日排行"],
        }
    }

    fn description(self) -> &'static str {
        match self {
            Board::Metric(Metric::TotalRewards) => "累计获得星之碎片",
            Board::Metric(Metric::MonthRewards) => "本月获得星之碎片",
            Board::Metric(Metric::TotalDays) => "历史签到总天数",
            Board::Metric(Metric::MonthDays) => "本月签到天数",
            Board::Today => "今日签到用户榜",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Board::Metric(Metric::TotalRewards) => "🏆 累计星之碎片排行榜",
            Board::Metric(Metric::MonthRewards) => "🏆 本月星之碎片排行榜",
            Board::Metric(Metric::TotalDays) => "🏆 累计契约天数榜",
            Board::Metric(Metric::MonthDays) => "🏆 本月契约天数榜",
            Board::Today => "🏆 今日契约榜",
        }
    }
}

pub fn render_outcome(outcome: &CheckinOutcome) -> String {
    match outcome {
        CheckinOutcome::Success {
            continuous_days,
            reward,
            message,
        } => format!(
            "✨【契约成立】\n📅 连续签订契约: {}天\n🎁 获得星之碎片: {}个\n💬 契约签订寄语: {}",
            continuous_days, reward, message
        ),
        CheckinOutcome::AlreadyCheckedIn => {
            "⚠️ 今日已签订契约，请勿重复操作".to_string()
        }
        CheckinOutcome::ServiceUnavailable => UNAVAILABLE.to_string(),
    }
}

pub fn render_board(board: Board, entries: &[RankEntry]) -> String {
    let mut lines = vec![board.title().to_string()];
    if entries.is_empty() {
        lines.push("暂无记录".to_string());
    }
    lines.extend(entries.iter().enumerate().map(|(i, entry)| {
        let value = match board {
            Board::Metric(Metric::TotalRewards | Metric::MonthRewards) => {
                format!("{}个", entry.value)
            }
            Board::Metric(Metric::TotalDays | Metric::MonthDays) => format!("{}天", entry.value),
            Board::Today => format!("连续 {}天", entry.value),
        };
        format!("{}. 契约者 {} - {}", i + 1, entry.username, value)
    }));
    lines.join("\n")
}

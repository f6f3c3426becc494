//! Application services - Business logic orchestration

pub mod checkin_service;
pub mod command_service;
pub mod keyword_service;
pub mod leaderboard_service;

pub use checkin_service::{CheckinOutcome, CheckinService};
pub use command_service::CommandService;
pub use keyword_service::{KeywordService, KeywordTable};
pub use leaderboard_service::{LeaderboardService, RankEntry};

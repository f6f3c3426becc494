//! Configuration management

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub checkin: CheckinConfig,
    pub keyword_reply: KeywordReplyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Each plugin keeps its files under `<data-dir>/<plugin-name>/`
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckinConfig {
    pub enabled: bool,
    /// IANA timezone that decides what "today" is. Server local time when unset.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeywordReplyConfig {
    pub enabled: bool,
    /// Sender ids allowed to add or remove keywords
    #[serde(default)]
    pub admins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "checkin-bot".to_string(),
                prefix: "/".to_string(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data/plugins"),
            },
            checkin: CheckinConfig {
                enabled: true,
                timezone: None,
            },
            keyword_reply: KeywordReplyConfig {
                enabled: true,
                admins: Vec::new(),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(dir) = std::env::var("BOT_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        if let Ok(tz) = std::env::var("CHECKIN_TIMEZONE") {
            config.checkin.timezone = Some(tz);
        }

        if config.bot.prefix.is_empty() {
            config.bot.prefix = "/".to_string();
        }

        if let Err(e) = config.checkin.day_policy() {
            tracing::warn!("Ignoring CHECKIN_TIMEZONE: {}", e);
            config.checkin.timezone = None;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        self.checkin.day_policy()?;
        Ok(())
    }

    pub fn plugin_dir(&self, plugin: &str) -> PathBuf {
        self.storage.data_dir.join(plugin)
    }
}

impl CheckinConfig {
    pub fn day_policy(&self) -> Result<DayPolicy, ConfigError> {
        match self.timezone.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(DayPolicy::ServerLocal),
            Some(name) => name
                .parse::<Tz>()
                .map(DayPolicy::Zone)
                .map_err(|e| ConfigError::InvalidValue(format!("checkin.timezone '{}': {}", name, e))),
        }
    }
}

/// Decides which calendar date a check-in belongs to. One policy per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPolicy {
    ServerLocal,
    Zone(Tz),
}

impl DayPolicy {
    pub fn today(&self) -> NaiveDate {
        match self {
            DayPolicy::ServerLocal => Local::now().date_naive(),
            DayPolicy::Zone(tz) => Utc::now().with_timezone(tz).date_naive(),
        }
    }
}

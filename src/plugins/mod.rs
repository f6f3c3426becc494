//! Plugin system
//!
//! Plugins contribute commands and passive message handlers to the dispatcher.

pub mod checkin;
pub mod keyword;
pub mod manager;
pub mod trait_def;

pub use checkin::CheckinPlugin;
pub use keyword::KeywordPlugin;
pub use manager::PluginManager;
pub use trait_def::{Plugin, PluginInfo};

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::infrastructure::config::Config;

/// Register every plugin the config enables
pub fn install_plugins(dispatcher: &mut MessageDispatcher, config: &Config) -> Result<(), BotError> {
    if config.checkin.enabled {
        dispatcher.register_plugin(CheckinPlugin::from_config(config)?)?;
    }
    if config.keyword_reply.enabled {
        dispatcher.register_plugin(KeywordPlugin::from_config(config))?;
    }
    Ok(())
}

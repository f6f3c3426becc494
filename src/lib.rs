//! Check-in and keyword auto-reply plugins for chat bots

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

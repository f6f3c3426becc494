//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: JSON document persistence
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod adapters;

//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: check-in engine, leaderboards, keyword replies, commands
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, context resolution, dispatching

pub mod errors;
pub mod services;
pub mod messaging;

//! Domain layer - Core business objects with no I/O
//!
//! This layer contains:
//! - Entities: User, Message, Command, CheckinRecord
//! - Traits: Abstractions for infrastructure (Bot, Store)

pub mod entities;
pub mod traits;

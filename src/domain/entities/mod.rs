//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod record;

pub use user::User;
pub use message::{Message, Content, Route, Routing};
pub use command::{Command, CommandRegistry};
pub use record::{CheckinDocument, CheckinRecord, ContextRecords, Metric};

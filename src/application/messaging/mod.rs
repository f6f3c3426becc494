//! Message handling - parsing, context resolution, dispatching

pub mod context;
pub mod dispatcher;
pub mod parser;

pub use context::{resolve_context, DEFAULT_CONTEXT};
pub use dispatcher::MessageDispatcher;
pub use parser::MessageParser;

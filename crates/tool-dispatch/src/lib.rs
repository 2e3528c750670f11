//! Tool dispatcher: maps a decoded tool call to a page capability,
//! gates write-capable calls through the policy engine, and
//! normalizes every failure into one result shape.

pub mod dispatcher;
pub mod errors;
pub mod ports;
pub mod testing;

pub use dispatcher::{OnBlocked, ToolDispatcher, MAX_LINKS, PAGE_TEXT_LIMIT};
pub use errors::PageError;
pub use ports::PagePort;

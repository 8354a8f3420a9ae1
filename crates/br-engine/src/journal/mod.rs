//! Decision journal recording what happened during a session.

pub mod entry;
pub mod log;

pub use entry::LogEntry;
pub use log::DecisionLog;

//! Event System
//!
//! Outbound event queue and JSONL logging.

pub mod logger;
pub mod queue;

pub use logger::{EventLogger, TickEvents};
pub use queue::EventQueue;

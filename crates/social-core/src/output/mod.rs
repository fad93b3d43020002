//! Output
//!
//! Reports and run summaries.

pub mod report;
pub mod summary;

pub use report::{count_by_kind, CultureTraitSummary, EmpathyNetworkReport, NetworkStats};
pub use summary::SimulationSummary;

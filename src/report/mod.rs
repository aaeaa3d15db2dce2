//! Reporting: residuals, quality metrics, classification, and formatting.

pub mod format;
pub mod kpi;
pub mod quality;

pub use format::*;
pub use kpi::*;
pub use quality::*;

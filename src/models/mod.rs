//! Data models for TitleScan.

mod analysis;

pub use analysis::{AnalysisResult, HealthStatus};

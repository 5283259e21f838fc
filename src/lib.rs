//! TitleScan - title insurance document analysis client.
//!
//! Submits a single title policy document (PDF or image) to a remote
//! analysis service and presents the extracted fields or a classified
//! error. The heart of the crate is the upload-and-result state machine
//! in [`session`]; everything else feeds it (acquisition, transport) or
//! reads from it (rendering, the terminal UI).

pub mod candidate;
pub mod classify;
pub mod client;
pub mod config;
pub mod models;
pub mod render;
pub mod session;
pub mod tui;

pub use candidate::{CandidateError, UploadCandidate};
pub use classify::{ExchangeFailure, Failure, FailureKind};
pub use client::AnalysisClient;
pub use config::Settings;
pub use models::{AnalysisResult, HealthStatus};
pub use session::{AnalysisSession, ProcessingState, SettledOutcome, StateError};

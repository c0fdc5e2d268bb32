pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod presentation;
pub mod service;

pub use error::ScanError;

// Re-export commonly used types
pub use models::{FileUpload, RiskTier, ScanRequest, ScanResult, StatCategory};

pub use config::{RevealTimings, ScanConfig};
pub use controller::ScanController;
pub use presentation::{PresentationSequencer, ScanView, SequenceState};
pub use service::{HttpScanService, ScanService};

pub use cli::CliHandler;

pub mod request;
pub mod result;
pub mod risk;

pub use request::{FileUpload, RequestKind, ScanRequest};
pub use result::{HealthStatus, ScanResult, ServiceErrorBody, StatCategory};
pub use risk::RiskTier;

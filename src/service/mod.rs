// Service module - the external scanning service the controller dispatches to

pub mod client;

pub use client::{parse_scan_result, HttpScanService, FILE_FIELD};

use crate::error::ScanError;
use crate::models::{ScanRequest, ScanResult};
use futures::future::BoxFuture;

pub trait ScanService: Send + Sync {
    fn scan<'a>(&'a self, request: &'a ScanRequest) -> BoxFuture<'a, Result<ScanResult, ScanError>>;
    fn endpoint(&self) -> &str;
}

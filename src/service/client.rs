use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::{FileUpload, HealthStatus, RequestKind, ScanRequest, ScanResult, ServiceErrorBody};
use crate::service::ScanService;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Multipart field name the service reads the uploaded file from.
pub const FILE_FIELD: &str = "file";

#[derive(Serialize)]
struct UrlScanBody<'a> {
    url: &'a str,
}

/// Scanning service reached over HTTP.
pub struct HttpScanService {
    client: reqwest::Client,
    config: ScanConfig,
}

impl HttpScanService {
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub async fn scan_url(&self, url: &str) -> Result<ScanResult, ScanError> {
        let started = Instant::now();
        debug!(endpoint = %self.config.scan_url(), url, "submitting url scan");

        let response = self
            .client
            .post(self.config.scan_url())
            .json(&UrlScanBody { url })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let result = read_scan_response(response, RequestKind::Url).await;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, ok = result.is_ok(), "url scan finished");
        result
    }

    pub async fn scan_file(&self, file: &FileUpload) -> Result<ScanResult, ScanError> {
        let started = Instant::now();
        debug!(
            endpoint = %self.config.scan_file_url(),
            filename = %file.filename,
            size = file.size_bytes(),
            "submitting file scan"
        );

        let mut part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
        if let Some(ref content_type) = file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(self.config.scan_file_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let result = read_scan_response(response, RequestKind::File).await;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, ok = result.is_ok(), "file scan finished");
        result
    }

    pub async fn check_health(&self) -> Result<HealthStatus, ScanError> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScanError::Service {
                status: status.as_u16(),
                message: "Health check failed".to_string(),
                details: Some(body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ScanError::MalformedResult(format!("health response: {}", e)))
    }

    fn map_send_error(&self, error: reqwest::Error) -> ScanError {
        if error.is_timeout() {
            ScanError::Timeout {
                timeout: self.config.timeout_seconds,
            }
        } else if error.is_connect() {
            ScanError::Transport(format!(
                "cannot reach scanning service at {}: {}",
                self.config.endpoint, error
            ))
        } else {
            ScanError::NetworkError(error)
        }
    }
}

impl ScanService for HttpScanService {
    fn scan<'a>(&'a self, request: &'a ScanRequest) -> BoxFuture<'a, Result<ScanResult, ScanError>> {
        Box::pin(async move {
            match request {
                ScanRequest::Url(url) => self.scan_url(url).await,
                ScanRequest::File(file) => self.scan_file(file).await,
            }
        })
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

async fn read_scan_response(
    response: reqwest::Response,
    kind: RequestKind,
) -> Result<ScanResult, ScanError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let parsed: ServiceErrorBody = serde_json::from_str(&body).unwrap_or_default();
        if let Some(ref details) = parsed.details {
            warn!(status = status.as_u16(), details = %details, "scan service reported an error");
        }
        return Err(ScanError::Service {
            status: status.as_u16(),
            message: parsed
                .error
                .unwrap_or_else(|| kind.fallback_error().to_string()),
            details: parsed.details,
        });
    }

    parse_scan_result(&body)
}

/// Parses a success body. Only the overall shape is enforced: the body must
/// be a JSON object whose known fields have the right types.
pub fn parse_scan_result(body: &str) -> Result<ScanResult, ScanError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ScanError::MalformedResult(format!("response is not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ScanError::MalformedResult(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ScanError::MalformedResult(e.to_string()))
}

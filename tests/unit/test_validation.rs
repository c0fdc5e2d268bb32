use cyscan::error::ScanError;
use cyscan::models::{FileUpload, RequestKind, ScanRequest, ScanResult};
use cyscan::config::{RevealTimings, ScanConfig};

#[test]
fn blank_url_is_rejected() {
    for input in ["", "   ", "\t\n"] {
        let err = ScanRequest::url(input).validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Enter a URL");
    }
}

#[test]
fn url_is_trimmed_before_dispatch() {
    let request = ScanRequest::url("  https://example.com/path?q=1  ").normalized();
    assert_eq!(request, ScanRequest::Url("https://example.com/path?q=1".to_string()));
    assert_eq!(request.kind(), RequestKind::Url);
}

#[test]
fn empty_file_is_rejected() {
    let request = ScanRequest::File(FileUpload::new("empty.bin", Vec::new()));
    assert!(matches!(request.validate(), Err(ScanError::Validation(_))));
}

#[test]
fn file_keeps_name_and_type() {
    let file = FileUpload::new("invoice.pdf", b"%PDF-1.7".to_vec());
    assert_eq!(file.filename, "invoice.pdf");
    assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(file.size_bytes(), 8);

    let file = file.with_content_type("application/octet-stream");
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
    assert!(ScanRequest::File(file).validate().is_ok());
}

#[tokio::test]
async fn file_upload_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("cyscan-upload-{}.txt", std::process::id()));
    tokio::fs::write(&path, b"hello scanner").await.unwrap();

    let file = FileUpload::from_path(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(file.bytes, b"hello scanner");
    assert_eq!(file.content_type.as_deref(), Some("text/plain"));
    assert!(file.filename.starts_with("cyscan-upload-"));
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("cyscan-definitely-missing.bin");
    let err = FileUpload::from_path(&path).await.unwrap_err();
    assert!(matches!(err, ScanError::IoError(_)));
}

#[test]
fn danger_percentage_is_clamped() {
    assert_eq!(ScanResult::new(120.0).clamped().danger_percentage, 100.0);
    assert_eq!(ScanResult::new(-1.0).clamped().danger_percentage, 0.0);
    assert_eq!(ScanResult::new(45.0).clamped().danger_percentage, 45.0);
}

#[test]
fn config_rejects_zero_timeout() {
    let config = ScanConfig::default().with_timeout(0);
    assert!(matches!(config.validate(), Err(ScanError::ConfigError(_))));
}

#[test]
fn config_rejects_unordered_timings() {
    let timings = RevealTimings {
        stats_ms: 100,
        ..RevealTimings::default()
    };
    let config = ScanConfig::default().with_timings(timings);
    assert!(config.validate().is_err());
}

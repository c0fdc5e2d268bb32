use cyscan::config::ScanConfig;
use cyscan::error::ScanError;
use cyscan::models::{FileUpload, ScanRequest};
use cyscan::service::{HttpScanService, ScanService};
use mockito::{Matcher, Server};
use serde_json::json;

fn service(server: &Server) -> HttpScanService {
    HttpScanService::new(ScanConfig::new(server.url()).with_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_url_scan_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/scan")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "url": "https://example.com" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "url": "https://example.com",
                "status": "completed",
                "total": 20,
                "harmless": 8,
                "undetected": 2,
                "timeout": 1,
                "malicious": 4,
                "suspicious": 5,
                "danger_percentage": 45.0,
                "analysis_id": "u-abc"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let result = service(&server)
        .scan(&ScanRequest::url("https://example.com"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.total, Some(20));
    assert_eq!(result.malicious, Some(4));
    assert_eq!(result.danger_percentage, 45.0);
    assert_eq!(result.subject(), Some("https://example.com"));
    assert_eq!(result.analysis_id.as_deref(), Some("u-abc"));
}

#[tokio::test]
async fn test_file_scan_uses_multipart_file_field() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/scan_file")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="report.pdf""#.to_string()),
            Matcher::Regex("Content-Type: application/pdf".to_string()),
            Matcher::Regex("%PDF-1.7 sample".to_string()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "filename": "report.pdf",
                "status": "completed",
                "total": 60,
                "malicious": 0,
                "suspicious": 0,
                "harmless": 0,
                "undetected": 60,
                "timeout": 0,
                "danger_percentage": 0.0
            })
            .to_string(),
        )
        .create_async()
        .await;

    let upload = FileUpload::new("report.pdf", b"%PDF-1.7 sample".to_vec());
    let result = service(&server)
        .scan(&ScanRequest::File(upload))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.subject(), Some("report.pdf"));
    assert_eq!(result.undetected, Some(60));
}

#[tokio::test]
async fn test_error_body_message_and_details() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/scan")
        .with_status(502)
        .with_body(
            json!({ "error": "VirusTotal API error", "details": "rate limited" }).to_string(),
        )
        .create_async()
        .await;

    let err = service(&server)
        .scan(&ScanRequest::url("https://example.com"))
        .await
        .unwrap_err();

    match err {
        ScanError::Service {
            status,
            ref message,
            ref details,
        } => {
            assert_eq!(status, 502);
            assert_eq!(message, "VirusTotal API error");
            assert_eq!(details.as_deref(), Some("rate limited"));
        }
        other => panic!("expected a service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    let mut server = Server::new_async().await;

    let _url = server
        .mock("POST", "/scan")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let _file = server
        .mock("POST", "/scan_file")
        .with_status(400)
        .with_body("{}")
        .create_async()
        .await;

    let service = service(&server);

    let err = service
        .scan(&ScanRequest::url("https://example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Scan failed");

    let err = service
        .scan(&ScanRequest::File(FileUpload::new("a.bin", vec![0u8; 4])))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "File scan failed");
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/scan")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = service(&server)
        .scan(&ScanRequest::url("https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::MalformedResult(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(json!({ "status": "missing_api_key" }).to_string())
        .create_async()
        .await;

    let health = service(&server).check_health().await.unwrap();
    assert_eq!(health.status, "missing_api_key");
    assert!(!health.is_ok());
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let config = ScanConfig::new("http://127.0.0.1:9".to_string()).with_timeout(2);
    let service = HttpScanService::new(config).unwrap();

    let err = service
        .scan(&ScanRequest::url("https://example.com"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A user-submitted item to be evaluated by the scanning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanRequest {
    Url(String),
    File(FileUpload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: Option<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Url,
    File,
}

impl ScanRequest {
    pub fn url<S: Into<String>>(url: S) -> Self {
        ScanRequest::Url(url.into())
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            ScanRequest::Url(_) => RequestKind::Url,
            ScanRequest::File(_) => RequestKind::File,
        }
    }

    /// Rejects requests that must never reach the service. URLs are compared
    /// after trimming, so whitespace-only input is blank.
    pub fn validate(&self) -> Result<(), ScanError> {
        match self {
            ScanRequest::Url(url) if url.trim().is_empty() => {
                Err(ScanError::Validation("Enter a URL".to_string()))
            }
            ScanRequest::File(file) if file.filename.trim().is_empty() => {
                Err(ScanError::Validation("Choose a file".to_string()))
            }
            ScanRequest::File(file) if file.bytes.is_empty() => Err(ScanError::Validation(
                format!("File '{}' is empty", file.filename),
            )),
            _ => Ok(()),
        }
    }

    /// Trims surrounding whitespace from URL input; files pass through untouched.
    pub fn normalized(self) -> Self {
        match self {
            ScanRequest::Url(url) => ScanRequest::Url(url.trim().to_string()),
            other => other,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ScanRequest::Url(url) => url.trim().to_string(),
            ScanRequest::File(file) => format!("{} ({} bytes)", file.filename, file.bytes.len()),
        }
    }
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Url => "url",
            RequestKind::File => "file",
        }
    }

    /// Message shown when the service fails without saying why.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            RequestKind::Url => "Scan failed",
            RequestKind::File => "File scan failed",
        }
    }
}

impl FileUpload {
    pub fn new<S: Into<String>>(filename: S, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename).map(str::to_string);
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub async fn from_path(path: &Path) -> Result<Self, ScanError> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, bytes))
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

fn guess_content_type(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "zip" => Some("application/zip"),
        "apk" => Some("application/vnd.android.package-archive"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "exe" | "dll" => Some("application/vnd.microsoft.portable-executable"),
        "txt" => Some("text/plain"),
        "html" | "htm" => Some("text/html"),
        "js" => Some("text/javascript"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

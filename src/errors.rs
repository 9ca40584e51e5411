use std::path::PathBuf;

use crate::config::ClientConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid proxy URL {url:?}: {reason}")]
    InvalidProxy { url: String, reason: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Client certificate not found: {}", .0.display())]
    CertificateNotFound(PathBuf),

    #[error("Cannot parse client certificate {}: {reason}", .path.display())]
    CertificateParse { path: PathBuf, reason: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ClientConfigError),

    #[error("Cannot decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

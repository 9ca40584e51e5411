use url::Url;

use crate::errors::ClientError;

/// The pieces of a target URL a request is built from.
///
/// Derived once per request. `path` is never empty: a URL without a path
/// gets `"/"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    /// Host as it appears in the URL (IPv6 addresses keep their brackets).
    pub host: String,
    /// Explicit port, or the scheme's default.
    pub port: u16,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlParts {
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let url = Url::parse(input).map_err(|e| ClientError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(input, &url)
    }

    fn from_url(input: &str, url: &Url) -> Result<Self, ClientError> {
        let host = url.host_str().ok_or_else(|| ClientError::InvalidUrl {
            url: input.to_string(),
            reason: "missing host".to_string(),
        })?;
        let port = url.port_or_known_default().ok_or_else(|| ClientError::InvalidUrl {
            url: input.to_string(),
            reason: format!("no port given and no default port for scheme {:?}", url.scheme()),
        })?;

        let path = match url.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };

        Ok(UrlParts {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port,
            path,
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        })
    }

    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    /// `scheme://host:port` of the target, without path.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

//! Client configuration.
//!
//! `ClientConfig` holds the transport-level settings shared by every request a
//! [`Client`](crate::Client) issues. Proxy settings are deliberately not part
//! of it: those come from a [`ProxyEnvironment`](crate::net::ProxyEnvironment)
//! that is consulted per request.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use simple_client::ClientConfig;
//! let cfg = ClientConfig::default();
//! assert!(!cfg.accept_invalid_certs_with_client_cert);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use simple_client::ClientConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = ClientConfig::builder()
//!     .user_agent("simple-client/0.1")
//!     .timeout(Duration::from_secs(30))
//!     .connect_timeout(Duration::from_secs(5))
//!     .build()?; // returns Result<ClientConfig, ClientConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `user_agent`: Optional `User-Agent` header value sent with every request.
//! - `timeout`: Optional total request timeout, handed to the transport.
//! - `connect_timeout`: Optional connect timeout, handed to the transport.
//! - `accept_invalid_certs_with_client_cert`: When `true`, server certificate
//!   verification is switched off for requests that present a client
//!   certificate. Defaults to `false`.
//!
//! # Errors
//!
//! Builder validation returns [`ClientConfigError`] for zero timeouts or a
//! user agent that cannot be sent as a header value.

use std::fmt;
use std::time::Duration;

use http::HeaderValue;

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub accept_invalid_certs_with_client_cert: bool,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    inner: ClientConfig,
}

impl ClientConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut ClientConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = Some(ua.into())) }
    pub fn timeout(self, d: Duration) -> Self { self.map(|c| c.timeout = Some(d)) }
    pub fn connect_timeout(self, d: Duration) -> Self { self.map(|c| c.connect_timeout = Some(d)) }

    /// Skip server certificate verification whenever a client certificate is
    /// presented. Only for servers whose certificate cannot be verified.
    pub fn accept_invalid_certs_with_client_cert(self, on: bool) -> Self {
        self.map(|c| c.accept_invalid_certs_with_client_cert = on)
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut ClientConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientConfigError {
    ZeroTimeout,
    ZeroConnectTimeout,
    InvalidUserAgent(String),
}

impl fmt::Display for ClientConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientConfigError::ZeroTimeout =>
                write!(f, "timeout must be greater than zero"),
            ClientConfigError::ZeroConnectTimeout =>
                write!(f, "connect_timeout must be greater than zero"),
            ClientConfigError::InvalidUserAgent(ua) =>
                write!(f, "user_agent {ua:?} is not a valid header value"),
        }
    }
}
impl std::error::Error for ClientConfigError {}

fn validate(c: &ClientConfig) -> Result<(), ClientConfigError> {
    if c.timeout.is_some_and(|d| d.is_zero()) {
        return Err(ClientConfigError::ZeroTimeout);
    }
    if c.connect_timeout.is_some_and(|d| d.is_zero()) {
        return Err(ClientConfigError::ZeroConnectTimeout);
    }
    if let Some(ua) = &c.user_agent {
        if HeaderValue::from_str(ua).is_err() {
            return Err(ClientConfigError::InvalidUserAgent(ua.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_verification_on() {
        let cfg = ClientConfig::default();
        assert!(!cfg.accept_invalid_certs_with_client_cert);
        assert!(cfg.timeout.is_none());
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = ClientConfig::builder()
            .user_agent("tester/1.0")
            .timeout(Duration::from_secs(10))
            .accept_invalid_certs_with_client_cert(true)
            .build()
            .unwrap();

        assert_eq!(cfg.user_agent.as_deref(), Some("tester/1.0"));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(10)));
        assert!(cfg.accept_invalid_certs_with_client_cert);
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let err = ClientConfig::builder().timeout(Duration::ZERO).build().unwrap_err();
        assert_eq!(err, ClientConfigError::ZeroTimeout);

        let err = ClientConfig::builder().connect_timeout(Duration::ZERO).build().unwrap_err();
        assert_eq!(err, ClientConfigError::ZeroConnectTimeout);
    }

    #[test]
    fn user_agent_with_newline_is_rejected() {
        let err = ClientConfig::builder().user_agent("bad\nagent").build().unwrap_err();
        assert!(matches!(err, ClientConfigError::InvalidUserAgent(_)));
    }
}

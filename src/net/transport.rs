//! The HTTP transport a [`Request`](crate::net::Request) is sent over.
//!
//! [`ReqwestTransport`] is the production implementation: it builds a fresh
//! blocking `reqwest` client for every request (nothing is pooled), routes it
//! through the resolved proxy only, applies the connection's TLS settings and
//! never follows redirects.
use std::error::Error as StdError;
use std::io;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::net::request::{Connection, PreparedRequest};
use crate::net::response::Response;

/// Sends a prepared request over a prepared connection.
pub trait Transport {
    fn send(&self, connection: &Connection, request: PreparedRequest) -> Result<Response, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, connection: &Connection, request: PreparedRequest) -> Result<Response, ClientError> {
        (**self).send(connection, request)
    }
}

/// Blocking transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn build_client(&self, connection: &Connection) -> Result<reqwest::blocking::Client, ClientError> {
        // Environment proxies are resolved by us, never by reqwest.
        let mut builder = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy();

        if let Some(proxy) = &connection.proxy {
            let proxy_url = proxy.url();
            let proxy = reqwest::Proxy::all(&proxy_url).map_err(|e| ClientError::InvalidProxy {
                url: proxy_url.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        if connection.tls.use_tls {
            builder = builder.https_only(true);
        }
        if let Some(identity) = &connection.tls.client_identity {
            builder = builder.identity(identity.identity()?);
        }
        if connection.tls.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ua) = &self.config.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        builder.build().map_err(|e| ClientError::Tls(describe(&e)))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, connection: &Connection, request: PreparedRequest) -> Result<Response, ClientError> {
        let client = self.build_client(connection)?;

        let mut builder = client
            .request(request.method.as_http(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let res = builder.send().map_err(map_send_error)?;

        let url = res.url().clone();
        let status = res.status();
        let headers = res.headers().clone();

        // Note: does not deal with streaming
        let body = res
            .bytes()
            .map_err(|e| ClientError::Io(io::Error::other(describe(&e))))?
            .to_vec();

        Ok(Response::new(url, status, headers, body))
    }
}

fn map_send_error(err: reqwest::Error) -> ClientError {
    let message = describe(&err);

    if is_tls_failure(&err) {
        ClientError::Tls(message)
    } else if err.is_connect() || err.is_timeout() {
        ClientError::Connection(message)
    } else if err.is_builder() {
        ClientError::InvalidUrl {
            url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            reason: message,
        }
    } else {
        ClientError::Io(io::Error::other(message))
    }
}

// reqwest only names the failing step at the top level; the cause is further
// down the source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

const TLS_WORDS: [&str; 4] = ["certificate", "handshake", "tls", "ssl"];

// rustls errors reach us either directly or boxed inside an io::Error, whose
// `source()` skips the boxed error itself. Only when no typed error is found
// are the cause messages searched, word by word; the top-level message is
// skipped since it carries the URL.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if is_rustls_error(cause) {
            return true;
        }
        source = cause.source();
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if mentions_tls(&cause.to_string()) {
            return true;
        }
        source = cause.source();
    }
    false
}

fn is_rustls_error(cause: &(dyn StdError + 'static)) -> bool {
    if cause.is::<rustls::Error>() {
        return true;
    }
    cause
        .downcast_ref::<io::Error>()
        .and_then(io::Error::get_ref)
        .is_some_and(|inner| inner.is::<rustls::Error>())
}

fn mentions_tls(message: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| TLS_WORDS.iter().any(|tls| word.eq_ignore_ascii_case(tls)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Cause(&'static str);
    impl fmt::Display for Cause {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }
    impl StdError for Cause {}

    #[derive(Debug)]
    struct Outer(&'static str, Box<dyn StdError + Send + Sync>);
    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }
    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(self.1.as_ref())
        }
    }

    fn outer(message: &'static str, cause: &'static str) -> Outer {
        Outer(message, Box::new(Cause(cause)))
    }

    #[test]
    fn describe_walks_the_source_chain() {
        let err = outer("error sending request", "invalid peer certificate: UnknownIssuer");
        assert_eq!(describe(&err), "error sending request: invalid peer certificate: UnknownIssuer");
        assert!(is_tls_failure(&err));
    }

    #[test]
    fn refused_connection_is_not_a_tls_failure() {
        let err = outer(
            "error sending request for url (https://tls.example.test/)",
            "tcp connect error: Connection refused (os error 111)",
        );
        assert!(!is_tls_failure(&err));
    }

    #[test]
    fn rustls_error_inside_io_error_is_a_tls_failure() {
        // Message carries none of the TLS words; only the type identifies it.
        let io_err = io::Error::new(io::ErrorKind::InvalidData, rustls::Error::General("boom".to_string()));
        let err = Outer("error sending request", Box::new(io_err));
        assert!(is_tls_failure(&err));
    }

    #[test]
    fn bare_rustls_error_is_a_tls_failure() {
        let err = Outer("error sending request", Box::new(rustls::Error::General("boom".to_string())));
        assert!(is_tls_failure(&err));
    }

    #[test]
    fn tls_words_inside_other_words_do_not_count() {
        let err = outer(
            "error sending request",
            "dns error: failed to lookup address for sslproxy.internal",
        );
        assert!(!is_tls_failure(&err));
    }

    #[test]
    fn plain_io_error_is_not_a_tls_failure() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer");
        let err = Outer("error sending request", Box::new(io_err));
        assert!(!is_tls_failure(&err));
    }
}

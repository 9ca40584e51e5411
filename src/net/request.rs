//! Request preparation.
//!
//! A [`Request`] turns a URL string and a [`RequestParams`] set into a
//! [`PreparedRequest`] bound to a [`Connection`], and hands both to a
//! [`Transport`]. Every call runs the same linear pipeline:
//!
//! parse URL → resolve proxy → configure TLS → build request → attach headers → send
//!
//! Nothing is cached between calls and nothing is retried.
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::net::proxy::{ProxyConfig, ProxyEnvironment};
use crate::net::response::Response;
use crate::net::tls::{configure_tls, TlsSettings};
use crate::net::transport::Transport;
use crate::net::url_parts::UrlParts;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP verbs supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub fn as_http(&self) -> http::Method {
        match self {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }

    /// Builds the verb specific request for `connection`.
    ///
    /// GET sends the path plus query string. POST and PUT send the path with
    /// `body` attached. DELETE sends the path only. The fragment never leaves
    /// the client.
    pub fn create_request(self, connection: &Connection, body: Option<&Body>) -> PreparedRequest {
        let parts = &connection.parts;

        match self {
            Method::Get => {
                let target = match &parts.query {
                    Some(query) => format!("{}?{}", parts.path, query),
                    None => parts.path.clone(),
                };
                PreparedRequest::new(self, connection, target, None)
            }
            Method::Post | Method::Put => {
                PreparedRequest::new(self, connection, parts.path.clone(), body.map(Body::encode))
            }
            Method::Delete => PreparedRequest::new(self, connection, parts.path.clone(), None),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ClientError::UnsupportedOperation(format!("no request builder for HTTP verb {s:?}"))),
        }
    }
}

/// Request body: sent as-is, or url-form-encoded from name/value pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Form(Vec<(String, String)>),
}

impl Body {
    /// Wire representation. Form pairs are encoded in the order given.
    pub fn encode(&self) -> String {
        match self {
            Body::Text(text) => text.clone(),
            Body::Form(pairs) => form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish(),
        }
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

/// Per call parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// Headers in the order they are sent. Repeated names send every value.
    pub headers: Option<Vec<(String, String)>>,
    pub body: Option<Body>,
    /// PEM bundle with the client certificate and private key
    pub ssl_client_cert: Option<PathBuf>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    pub fn headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(|(n, v)| (n.into(), v.into())).collect());
        self
    }

    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn form<I, N, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.body = Some(Body::Form(pairs.into_iter().map(|(n, v)| (n.into(), v.into())).collect()));
        self
    }

    pub fn ssl_client_cert<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ssl_client_cert = Some(path.into());
        self
    }
}

/// Everything needed to reach the target: where, through which proxy, and
/// with which TLS setup.
#[derive(Debug, Clone)]
pub struct Connection {
    pub parts: UrlParts,
    pub proxy: Option<ProxyConfig>,
    pub tls: TlsSettings,
}

impl Connection {
    /// `host:port` the connection is bound to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.parts.host, self.parts.port)
    }
}

/// A request ready to be handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    /// Absolute URL (`scheme://host:port` + target)
    pub url: String,
    /// Request target as sent on the request line
    pub target: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl PreparedRequest {
    fn new(method: Method, connection: &Connection, target: String, body: Option<String>) -> Self {
        Self {
            method,
            url: format!("{}{}", connection.parts.origin(), target),
            target,
            headers: HeaderMap::new(),
            body,
        }
    }

    // A body without an explicit content type goes out as a form post.
    fn supply_default_content_type(&mut self) {
        if self.body.is_some() && !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
    }
}

/// Appends `headers` to the request. A name that repeats keeps every value.
pub fn add_headers(request: &mut PreparedRequest, headers: &[(String, String)]) -> Result<(), ClientError> {
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidHeader(format!("{name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidHeader(format!("{name}: {e}")))?;
        request.headers.append(header_name, header_value);
    }
    Ok(())
}

/// One verb-specific request pipeline.
pub struct Request<'a> {
    method: Method,
    proxy_env: &'a ProxyEnvironment,
    config: &'a ClientConfig,
}

impl<'a> Request<'a> {
    pub fn new(method: Method, proxy_env: &'a ProxyEnvironment, config: &'a ClientConfig) -> Self {
        Self {
            method,
            proxy_env,
            config,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Parses `url`, resolves the proxy for its host and derives the TLS
    /// settings.
    pub fn prepare_connection(&self, url: &str, params: &RequestParams) -> Result<Connection, ClientError> {
        let parts = UrlParts::parse(url)?;
        let proxy = self.proxy_env.resolve_proxy(&parts.host)?;
        let tls = configure_tls(&parts, params.ssl_client_cert.as_deref(), self.config)?;

        Ok(Connection { parts, proxy, tls })
    }

    pub fn create_request(&self, connection: &Connection, body: Option<&Body>) -> PreparedRequest {
        self.method.create_request(connection, body)
    }

    /// Runs the whole pipeline and returns the raw response. Transport errors
    /// are passed through untouched.
    pub fn request<T: Transport + ?Sized>(
        &self,
        transport: &T,
        url: &str,
        params: &RequestParams,
    ) -> Result<Response, ClientError> {
        let connection = self.prepare_connection(url, params)?;

        let mut request = self.create_request(&connection, params.body.as_ref());
        add_headers(&mut request, params.headers.as_deref().unwrap_or_default())?;
        request.supply_default_content_type();

        log::debug!("{} {} via {}", request.method, request.url, match &connection.proxy {
            Some(proxy) => proxy.to_string(),
            None => "direct connection".to_string(),
        });

        transport.send(&connection, request)
    }
}

//! Stateful client facade.
//!
//! A [`Client`] keeps configuration that applies to every call (request
//! headers, body, client certificate) and the state of the last response. Each
//! verb method returns the client itself, so calls and response inspection can
//! be chained:
//!
//! ```no_run
//! use simple_client::{Client, RequestParams};
//! # fn main() -> Result<(), simple_client::ClientError> {
//! let mut client = Client::new();
//! let code = client
//!     .get("http://www.foo.co.uk/sport", Some(RequestParams::new().header("X-Test1", "foo")))?
//!     .response_code()
//!     .map(str::to_string);
//! # Ok(()) }
//! ```
//!
//! ## Concurrency
//! Verb methods take `&mut self` because they overwrite the response state.
//! Use one client per thread, or [`RequestDescriptor`](crate::RequestDescriptor)
//! for requests shared between threads.
//!
//! ## Failures
//! A failed call returns the error untouched and leaves the response state of
//! the previous successful call in place.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::net::{Body, Method, ProxyEnvironment, ReqwestTransport, Request, RequestParams, Response, Transport};

pub struct Client<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    /// Fixed proxy settings. `None` reads the process environment per request.
    proxy_env: Option<ProxyEnvironment>,
    transport: T,

    // Held configuration, merged into every call
    ssl_client_cert: Option<PathBuf>,
    request_headers: Option<Vec<(String, String)>>,
    body: Option<Body>,

    // Last response
    response: Option<Response>,
    response_headers: HashMap<String, String>,
    response_code: Option<String>,
    response_body: Option<Vec<u8>>,
}

impl Client<ReqwestTransport> {
    /// Client with the default config, the `reqwest` transport and proxy
    /// settings taken from the process environment.
    pub fn new() -> Self {
        ClientBuilder::default().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl Default for Client<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Client<T> {
    fn with_parts(config: ClientConfig, proxy_env: Option<ProxyEnvironment>, transport: T) -> Self {
        Self {
            config,
            proxy_env,
            transport,
            ssl_client_cert: None,
            request_headers: None,
            body: None,
            response: None,
            response_headers: HashMap::new(),
            response_code: None,
            response_body: None,
        }
    }

    pub fn get(&mut self, url: &str, params: Option<RequestParams>) -> Result<&mut Self, ClientError> {
        self.do_request(Method::Get, url, params)
    }

    pub fn post(&mut self, url: &str, params: Option<RequestParams>) -> Result<&mut Self, ClientError> {
        self.do_request(Method::Post, url, params)
    }

    pub fn put(&mut self, url: &str, params: Option<RequestParams>) -> Result<&mut Self, ClientError> {
        self.do_request(Method::Put, url, params)
    }

    pub fn delete(&mut self, url: &str, params: Option<RequestParams>) -> Result<&mut Self, ClientError> {
        self.do_request(Method::Delete, url, params)
    }

    fn do_request(&mut self, method: Method, url: &str, params: Option<RequestParams>) -> Result<&mut Self, ClientError> {
        let params = self.merge_held_config(params.unwrap_or_default());

        let proxy_env = match &self.proxy_env {
            Some(env) => env.clone(),
            None => ProxyEnvironment::from_env(),
        };

        let response = Request::new(method, &proxy_env, &self.config).request(&self.transport, url, &params)?;
        self.store_response(response);
        Ok(self)
    }

    // Held values replace whatever the caller passed for the same field.
    fn merge_held_config(&self, mut params: RequestParams) -> RequestParams {
        if let Some(cert) = &self.ssl_client_cert {
            params.ssl_client_cert = Some(cert.clone());
        }
        if let Some(headers) = &self.request_headers {
            params.headers = Some(headers.clone());
        }
        if let Some(body) = &self.body {
            params.body = Some(body.clone());
        }
        params
    }

    fn store_response(&mut self, response: Response) {
        self.response_headers.clear();
        for (name, value) in response.headers.iter() {
            self.response_headers.insert(
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        self.response_code = Some(response.code().to_string());
        self.response_body = Some(response.body.clone());
        self.response = Some(response);
    }

    // ---------- Held configuration ----------

    pub fn ssl_client_cert(&self) -> Option<&Path> {
        self.ssl_client_cert.as_deref()
    }

    pub fn set_ssl_client_cert<P: Into<PathBuf>>(&mut self, path: P) -> &mut Self {
        self.ssl_client_cert = Some(path.into());
        self
    }

    pub fn request_headers(&self) -> Option<&[(String, String)]> {
        self.request_headers.as_deref()
    }

    pub fn set_request_headers<I, N, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.request_headers = Some(headers.into_iter().map(|(n, v)| (n.into(), v.into())).collect());
        self
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn set_body<B: Into<Body>>(&mut self, body: B) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Forgets the held certificate, headers and body.
    pub fn reset(&mut self) -> &mut Self {
        self.ssl_client_cert = None;
        self.request_headers = None;
        self.body = None;
        self
    }

    // ---------- Last response ----------

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Headers of the last response, keyed by lower-cased name. For repeated
    /// names the last value wins; the full set is in [`Client::response`].
    pub fn response_headers(&self) -> &HashMap<String, String> {
        &self.response_headers
    }

    /// Status code of the last response, e.g. `"200"`.
    pub fn response_code(&self) -> Option<&str> {
        self.response_code.as_deref()
    }

    pub fn response_body(&self) -> Option<&[u8]> {
        self.response_body.as_deref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Builder for [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    proxy_env: Option<ProxyEnvironment>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use fixed proxy settings instead of reading the process environment.
    pub fn proxy_environment(mut self, env: ProxyEnvironment) -> Self {
        self.proxy_env = Some(env);
        self
    }

    pub fn build(self) -> Client<ReqwestTransport> {
        let transport = ReqwestTransport::new(self.config.clone());
        Client::with_parts(self.config, self.proxy_env, transport)
    }

    pub fn build_with_transport<T: Transport>(self, transport: T) -> Client<T> {
        Client::with_parts(self.config, self.proxy_env, transport)
    }
}

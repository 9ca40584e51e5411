//! # simple-client
//!
//! A small HTTP client facade with chainable `get`/`post`/`put`/`delete`
//! calls, proxy routing driven by `http_proxy`/`no_proxy`, and optional TLS
//! client certificates.
//!
//! ```no_run
//! use simple_client::{Client, RequestParams};
//!
//! # fn main() -> Result<(), simple_client::ClientError> {
//! let mut client = Client::new();
//! client.get("http://www.foo.co.uk/sport", Some(RequestParams::new().header("X-Test1", "foo")))?;
//! println!("{:?} {:?}", client.response_code(), client.response_headers().get("cache-control"));
//!
//! // Configuration held by the client applies to every following call.
//! client.set_ssl_client_cert("/etc/pki/certificate.pem");
//! client.post("https://repo.example.test/items", Some(RequestParams::new().form([("name", "sport")])))?;
//! # Ok(()) }
//! ```
//!
//! ## Layers
//!
//! - [`net`]: a [`Request`] parses the URL, resolves the proxy from a
//!   [`ProxyEnvironment`], sets up TLS, builds the verb specific request and
//!   sends it through a [`Transport`] ([`ReqwestTransport`] by default).
//! - [`Client`]: holds headers/body/certificate across calls and captures the
//!   last response. Not for concurrent use; see [`RequestDescriptor`].
//!
//! No retries, connection pooling, redirect following, streaming, HTTP/2 or
//! cookies.

pub mod client;
pub mod config;
pub mod errors;
pub mod net;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder, ClientConfigError};
pub use errors::ClientError;
pub use net::{
    Body, Method, ProxyConfig, ProxyEnvironment, ReqwestTransport, Request, RequestDescriptor, RequestParams,
    Response, Transport,
};

//! Networking: URL parsing, proxy resolution, TLS setup, request building and
//! the transport that sends it.

mod descriptor;
mod proxy;
mod request;
mod response;
mod tls;
pub(crate) mod transport;
mod url_parts;

pub use descriptor::{RequestDescriptor, RequestDescriptorBuilder};
pub use proxy::{ProxyConfig, ProxyEnvironment};
pub use request::{add_headers, Body, Connection, Method, PreparedRequest, Request, RequestParams};
pub use response::Response;
pub use tls::{configure_tls, ClientIdentity, TlsSettings};
pub use transport::{ReqwestTransport, Transport};
pub use url_parts::UrlParts;

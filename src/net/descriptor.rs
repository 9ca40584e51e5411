use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::net::proxy::ProxyEnvironment;
use crate::net::request::{Body, Method, Request, RequestParams};
use crate::net::response::Response;
use crate::net::transport::Transport;
use crate::net::url_parts::UrlParts;

/// An immutable description of one request.
///
/// Unlike [`Client`](crate::Client), a descriptor holds no response state, so
/// one descriptor can be sent repeatedly and from several threads at once.
///
/// ```no_run
/// use simple_client::{ClientConfig, ProxyEnvironment, ReqwestTransport, RequestDescriptor};
/// # fn main() -> Result<(), simple_client::ClientError> {
/// let request = RequestDescriptor::get("http://www.foo.co.uk/sport")
///     .header("X-Test1", "foo")
///     .build()?;
///
/// let config = ClientConfig::default();
/// let transport = ReqwestTransport::new(config.clone());
/// let response = request.send(&transport, &ProxyEnvironment::from_env(), &config)?;
/// println!("{}", response.code());
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    params: RequestParams,
}

impl RequestDescriptor {
    pub fn builder<S: Into<String>>(method: Method, url: S) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            inner: RequestDescriptor {
                method,
                url: url.into(),
                params: RequestParams::default(),
            },
        }
    }

    pub fn get<S: Into<String>>(url: S) -> RequestDescriptorBuilder { Self::builder(Method::Get, url) }
    pub fn post<S: Into<String>>(url: S) -> RequestDescriptorBuilder { Self::builder(Method::Post, url) }
    pub fn put<S: Into<String>>(url: S) -> RequestDescriptorBuilder { Self::builder(Method::Put, url) }
    pub fn delete<S: Into<String>>(url: S) -> RequestDescriptorBuilder { Self::builder(Method::Delete, url) }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// Runs the request pipeline for this descriptor.
    pub fn send<T: Transport + ?Sized>(
        &self,
        transport: &T,
        proxy_env: &ProxyEnvironment,
        config: &ClientConfig,
    ) -> Result<Response, ClientError> {
        Request::new(self.method, proxy_env, config).request(transport, &self.url, &self.params)
    }
}

/// Builder for [`RequestDescriptor`].
#[derive(Debug, Clone)]
pub struct RequestDescriptorBuilder {
    inner: RequestDescriptor,
}

impl RequestDescriptorBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(RequestParams) -> RequestParams) -> Self {
        self.inner.params = f(std::mem::take(&mut self.inner.params));
        self
    }

    pub fn header<N: Into<String>, V: Into<String>>(self, name: N, value: V) -> Self {
        self.map(|p| p.header(name, value))
    }
    pub fn body<B: Into<Body>>(self, body: B) -> Self { self.map(|p| p.body(body)) }
    pub fn form<I, N, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.map(|p| p.form(pairs))
    }
    pub fn ssl_client_cert<P: Into<PathBuf>>(self, path: P) -> Self { self.map(|p| p.ssl_client_cert(path)) }

    /// Checks the URL and builds the descriptor.
    pub fn build(self) -> Result<RequestDescriptor, ClientError> {
        UrlParts::parse(&self.inner.url)?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::transport::testing::RecordingTransport;

    #[test]
    fn builder_collects_params() {
        let desc = RequestDescriptor::post("http://www.foo.co.uk/sport")
            .header("X-Test1", "foo")
            .form([("name", "sport")])
            .build()
            .unwrap();

        assert_eq!(desc.method(), Method::Post);
        assert_eq!(desc.url(), "http://www.foo.co.uk/sport");
        assert_eq!(
            desc.params().headers.as_deref(),
            Some(&[("X-Test1".to_string(), "foo".to_string())][..])
        );
        assert_eq!(desc.params().body.as_ref().map(Body::encode).as_deref(), Some("name=sport"));
    }

    #[test]
    fn build_rejects_invalid_url() {
        let err = RequestDescriptor::get("no scheme here").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn descriptor_can_be_sent_twice() {
        let transport = RecordingTransport::ok();
        let desc = RequestDescriptor::delete("http://www.foo.co.uk/sport/1").build().unwrap();
        let env = ProxyEnvironment::none();
        let config = ClientConfig::default();

        desc.send(&transport, &env, &config).unwrap();
        desc.send(&transport, &env, &config).unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(_, req)| req.method == Method::Delete && req.target == "/sport/1"));
    }

    #[test]
    fn descriptor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequestDescriptor>();
    }
}

//! Proxy resolution from `http_proxy` / `no_proxy` style settings.
//!
//! The settings are captured in a [`ProxyEnvironment`] value instead of being
//! read from the process environment at the point of use. A client either
//! holds a fixed environment or snapshots the process environment before every
//! request, so changes to the environment are always picked up.
//!
//! ## Exclusion matching
//! An entry of the `no_proxy` list excludes every host that **contains** it as
//! a substring: `foo` excludes `myfoo.com`, and `.google.co.uk` excludes
//! `www.google.co.uk`. This is looser than the suffix/domain matching most
//! HTTP clients apply. An entry that is empty after trimming (`"a,,b"`, a
//! trailing `", "`) is a substring of every host and so disables the proxy
//! for all of them.
use std::fmt;

use url::Url;

use crate::errors::ClientError;

const HTTP_PROXY_VARS: [&str; 2] = ["http_proxy", "HTTP_PROXY"];
const NO_PROXY_VARS: [&str; 2] = ["no_proxy", "NO_PROXY"];

/// Proxy host and port a connection is routed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// URL handed to the transport when tunnelling through this proxy.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Snapshot of the proxy-related environment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyEnvironment {
    /// Proxy URL, e.g. `http://cache.foo.co.uk:80`
    pub http_proxy: Option<String>,
    /// Comma separated list of host substrings that bypass the proxy
    pub no_proxy: Option<String>,
}

impl ProxyEnvironment {
    /// No proxy, no exclusions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Reads `http_proxy`/`HTTP_PROXY` and `no_proxy`/`NO_PROXY` from the
    /// process environment. Lower-case names are checked first; the first
    /// non-empty value wins.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds an environment from an arbitrary variable lookup, applying the
    /// same precedence rules as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.is_empty())
        };

        Self {
            http_proxy: first_set(&HTTP_PROXY_VARS),
            no_proxy: first_set(&NO_PROXY_VARS),
        }
    }

    pub fn with_http_proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.http_proxy = Some(proxy.into());
        self
    }

    pub fn with_no_proxy<S: Into<String>>(mut self, no_proxy: S) -> Self {
        self.no_proxy = Some(no_proxy.into());
        self
    }

    /// Returns the proxy to use for `host`, or `None` when no proxy is
    /// configured or `host` is excluded.
    pub fn resolve_proxy(&self, host: &str) -> Result<Option<ProxyConfig>, ClientError> {
        let Some(proxy) = self.http_proxy.as_deref() else {
            return Ok(None);
        };

        if self.is_excluded_from_proxy(host) {
            log::debug!("host {host} matches no_proxy, connecting directly");
            return Ok(None);
        }

        let config = parse_proxy(proxy)?;
        log::debug!("routing {host} through proxy {config}");
        Ok(Some(config))
    }

    /// True when any `no_proxy` entry is a substring of `host`.
    pub fn is_excluded_from_proxy(&self, host: &str) -> bool {
        let Some(no_proxy) = self.no_proxy.as_deref() else {
            return false;
        };

        no_proxy
            .split(',')
            .map(str::trim)
            .any(|entry| host.contains(entry))
    }
}

fn parse_proxy(proxy: &str) -> Result<ProxyConfig, ClientError> {
    let invalid = |reason: String| ClientError::InvalidProxy {
        url: proxy.to_string(),
        reason,
    };

    // `cache:3128` is taken as a plain HTTP proxy, not as scheme `cache`.
    let url = if proxy.contains("://") {
        Url::parse(proxy)
    } else {
        Url::parse(&format!("http://{proxy}"))
    }
    .map_err(|e| invalid(e.to_string()))?;
    let host = url.host_str().ok_or_else(|| invalid("missing host".to_string()))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid(format!("no port given and no default port for scheme {:?}", url.scheme())))?;

    Ok(ProxyConfig {
        host: host.to_string(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn no_proxy_configured_resolves_to_none() {
        let env = ProxyEnvironment::none();
        assert_eq!(env.resolve_proxy("www.google.co.uk").unwrap(), None);
    }

    #[test]
    fn proxy_is_used_without_exclusions() {
        let env = ProxyEnvironment::none().with_http_proxy("http://cache.foo.co.uk:80");
        let proxy = env.resolve_proxy("www.google.co.uk").unwrap().unwrap();
        assert_eq!(proxy.host, "cache.foo.co.uk");
        assert_eq!(proxy.port, 80);
        assert_eq!(proxy.url(), "http://cache.foo.co.uk:80");
    }

    #[test]
    fn proxy_port_defaults_from_scheme() {
        let env = ProxyEnvironment::none().with_http_proxy("http://cache.foo.co.uk");
        let proxy = env.resolve_proxy("example.test").unwrap().unwrap();
        assert_eq!(proxy.port, 80);
    }

    #[test]
    fn excluded_host_bypasses_proxy() {
        let env = ProxyEnvironment::none()
            .with_http_proxy("http://cache.foo.co.uk:80")
            .with_no_proxy(".google.co.uk");
        assert_eq!(env.resolve_proxy("www.google.co.uk").unwrap(), None);
    }

    #[test]
    fn multiple_exclusions_are_trimmed() {
        let env = ProxyEnvironment::none()
            .with_http_proxy("http://cache.foo.co.uk:80")
            .with_no_proxy(".google.co.uk, foo, localhost");
        assert!(env.is_excluded_from_proxy("localhost"));
        assert_eq!(env.resolve_proxy("localhost").unwrap(), None);
        assert!(env.resolve_proxy("www.bbc.co.uk").unwrap().is_some());
    }

    #[test]
    fn exclusion_is_a_substring_match() {
        let env = ProxyEnvironment::none().with_no_proxy("foo");
        // Not a domain-suffix match: "foo" anywhere in the host counts.
        assert!(env.is_excluded_from_proxy("myfoo.com"));
        assert!(env.is_excluded_from_proxy("foo.example.test"));
        assert!(!env.is_excluded_from_proxy("example.test"));
    }

    #[test]
    fn empty_exclusion_entry_matches_every_host() {
        let env = ProxyEnvironment::none()
            .with_http_proxy("http://cache.foo.co.uk:80")
            .with_no_proxy("localhost, ");
        assert!(env.is_excluded_from_proxy("www.google.co.uk"));
        assert_eq!(env.resolve_proxy("www.google.co.uk").unwrap(), None);

        let env = ProxyEnvironment::none().with_no_proxy("a,,b");
        assert!(env.is_excluded_from_proxy("example.test"));
    }

    #[test]
    fn empty_no_proxy_value_excludes_every_host() {
        let env = ProxyEnvironment::none().with_no_proxy("");
        assert!(env.is_excluded_from_proxy("example.test"));
    }

    #[test]
    fn unset_no_proxy_excludes_nothing() {
        let env = ProxyEnvironment::none();
        assert!(!env.is_excluded_from_proxy("localhost"));
    }

    #[test]
    fn lower_case_variables_win() {
        let env = ProxyEnvironment::from_lookup(lookup_from(&[
            ("http_proxy", "http://lower:3128"),
            ("HTTP_PROXY", "http://upper:3128"),
            ("no_proxy", "lower.test"),
            ("NO_PROXY", "upper.test"),
        ]));
        assert_eq!(env.http_proxy.as_deref(), Some("http://lower:3128"));
        assert_eq!(env.no_proxy.as_deref(), Some("lower.test"));
    }

    #[test]
    fn empty_lower_case_falls_back_to_upper_case() {
        let env = ProxyEnvironment::from_lookup(lookup_from(&[
            ("http_proxy", ""),
            ("HTTP_PROXY", "http://upper:3128"),
            ("NO_PROXY", "internal"),
        ]));
        assert_eq!(env.http_proxy.as_deref(), Some("http://upper:3128"));
        assert_eq!(env.no_proxy.as_deref(), Some("internal"));
    }

    #[test]
    fn nothing_set_yields_empty_environment() {
        let env = ProxyEnvironment::from_lookup(lookup_from(&[]));
        assert_eq!(env, ProxyEnvironment::none());
    }

    #[test]
    fn proxy_without_scheme_defaults_to_http() {
        let env = ProxyEnvironment::none().with_http_proxy("localhost:3128");
        let proxy = env.resolve_proxy("example.test").unwrap().unwrap();
        assert_eq!(proxy.host, "localhost");
        assert_eq!(proxy.port, 3128);

        let env = ProxyEnvironment::none().with_http_proxy("cache.foo.co.uk");
        assert_eq!(env.resolve_proxy("example.test").unwrap().unwrap().port, 80);
    }

    #[test]
    fn unparsable_proxy_is_rejected() {
        let env = ProxyEnvironment::none().with_http_proxy("not a proxy");
        let err = env.resolve_proxy("example.test").unwrap_err();
        assert!(matches!(err, ClientError::InvalidProxy { .. }));
    }

    #[test]
    fn invalid_proxy_is_not_parsed_for_excluded_hosts() {
        let env = ProxyEnvironment::none()
            .with_http_proxy("not a proxy")
            .with_no_proxy("example");
        assert_eq!(env.resolve_proxy("example.test").unwrap(), None);
    }
}

#![forbid(unsafe_code)]

//! Offline asset cache, cache-first with refill on miss.
//!
//! Mirrors what the page's service worker does:
//!
//! - **install**: fetch every URL of [`PRECACHE`] into the current cache.
//!   Any failure aborts the install and stores nothing.
//! - **activate**: delete every cache whose name is not the current one.
//! - **fetch**: answer from any cache on a hit; on a miss go to the network
//!   and keep a copy of `http(s)` responses with status 200 and a basic
//!   (same-origin) type.
//!
//! The network is a [`Fetcher`] supplied by the host, so the policy can be
//! exercised without a browser.

use std::collections::BTreeMap;
use std::fmt;

/// Identifier of the current cache version.
pub const CACHE_NAME: &str = "mindmap-cache-v1";

/// Static assets fetched on install.
pub const PRECACHE: [&str; 6] = [
    "/",
    "/static/css/style.css",
    "/static/js/main.js",
    "/static/manifest.json",
    "https://d3js.org/d3.v7.min.js",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600&display=swap",
];

/// Response type as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin.
    Basic,
    Cors,
    Opaque,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, kind: ResponseKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            kind,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, ResponseKind::Basic, body)
    }

    /// Status in `200..300`.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_storable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

/// Where a [`AssetCache::fetch`] answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    Cache,
    Network,
}

/// Network failure reported by a [`Fetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response.
    Network { url: String, reason: String },
    /// Install got a non-2xx response for a pre-cached asset.
    BadStatus { url: String, status: u16 },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { url, reason } => write!(f, "fetch {url} failed: {reason}"),
            Self::BadStatus { url, status } => write!(f, "fetch {url} returned HTTP {status}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Network access supplied by the host.
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> Result<Response, FetchError>;
}

impl<F> Fetcher for F
where
    F: FnMut(&str) -> Result<Response, FetchError>,
{
    fn fetch(&mut self, url: &str) -> Result<Response, FetchError> {
        self(url)
    }
}

type Entries = BTreeMap<String, Response>;

/// Named caches, one of which is current.
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    current: String,
    caches: BTreeMap<String, Entries>,
}

impl AssetCache {
    /// Cache store whose current version is [`CACHE_NAME`].
    pub fn new() -> Self {
        Self::named(CACHE_NAME)
    }

    pub fn named(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            caches: BTreeMap::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Names of every cache present, sorted.
    pub fn cache_names(&self) -> Vec<&str> {
        self.caches.keys().map(String::as_str).collect()
    }

    /// Whether `url` is stored in any cache.
    pub fn contains(&self, url: &str) -> bool {
        self.lookup(url).is_some()
    }

    /// Store `response` under `url` in the named cache.
    pub fn put(&mut self, cache: &str, url: impl Into<String>, response: Response) {
        self.caches
            .entry(cache.to_string())
            .or_default()
            .insert(url.into(), response);
    }

    /// Pre-fetch [`PRECACHE`] into the current cache, all or nothing.
    pub fn install(&mut self, fetcher: &mut impl Fetcher) -> Result<usize, FetchError> {
        self.install_urls(&PRECACHE, fetcher)
    }

    /// Pre-fetch `urls` into the current cache, all or nothing.
    pub fn install_urls(
        &mut self,
        urls: &[&str],
        fetcher: &mut impl Fetcher,
    ) -> Result<usize, FetchError> {
        let mut fetched = Vec::with_capacity(urls.len());
        for &url in urls {
            let response = fetcher.fetch(url)?;
            if !response.is_ok() {
                return Err(FetchError::BadStatus {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((url.to_string(), response));
        }
        let count = fetched.len();
        self.caches
            .entry(self.current.clone())
            .or_default()
            .extend(fetched);
        tracing::info!(cache = %self.current, count, "assets pre-cached");
        Ok(count)
    }

    /// Drop every cache that is not the current one. Returns the deleted names.
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| **name != self.current)
            .cloned()
            .collect();
        for name in &stale {
            self.caches.remove(name);
            tracing::debug!(cache = %name, "stale cache deleted");
        }
        stale
    }

    /// Cache-first lookup with network refill.
    pub fn fetch(
        &mut self,
        url: &str,
        fetcher: &mut impl Fetcher,
    ) -> Result<(Response, Served), FetchError> {
        if let Some(hit) = self.lookup(url) {
            return Ok((hit.clone(), Served::Cache));
        }
        let response = fetcher.fetch(url)?;
        if response.is_storable() && url.starts_with("http") {
            let current = self.current.clone();
            self.put(&current, url, response.clone());
            tracing::trace!(url, "asset cached on refill");
        }
        Ok((response, Served::Network))
    }

    fn lookup(&self, url: &str) -> Option<&Response> {
        self.caches.values().find_map(|entries| entries.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_ok(url: &str) -> Result<Response, FetchError> {
        Ok(Response::ok(url.as_bytes().to_vec()))
    }

    #[test]
    fn install_stores_all_assets() {
        let mut cache = AssetCache::new();
        assert_eq!(cache.install(&mut always_ok).unwrap(), PRECACHE.len());
        assert!(PRECACHE.iter().all(|url| cache.contains(url)));
        assert_eq!(cache.cache_names(), vec![CACHE_NAME]);
    }

    #[test]
    fn failed_install_stores_nothing() {
        let mut cache = AssetCache::new();
        let mut flaky = |url: &str| {
            if url.ends_with(".json") {
                Ok(Response::new(404, ResponseKind::Basic, Vec::new()))
            } else {
                always_ok(url)
            }
        };
        let err = cache.install(&mut flaky).unwrap_err();
        assert!(matches!(err, FetchError::BadStatus { status: 404, .. }));
        assert!(cache.cache_names().is_empty());
    }

    #[test]
    fn activate_deletes_old_versions() {
        let mut cache = AssetCache::new();
        cache.put("mindmap-cache-v0", "/", Response::ok("old"));
        cache.put(CACHE_NAME, "/", Response::ok("new"));
        assert_eq!(cache.activate(), vec!["mindmap-cache-v0".to_string()]);
        assert_eq!(cache.cache_names(), vec![CACHE_NAME]);
    }

    #[test]
    fn hit_skips_network() {
        let mut cache = AssetCache::new();
        cache.put(CACHE_NAME, "https://app.example/", Response::ok("cached"));
        let mut offline = |url: &str| -> Result<Response, FetchError> {
            Err(FetchError::Network {
                url: url.to_string(),
                reason: "offline".into(),
            })
        };
        let (response, served) = cache.fetch("https://app.example/", &mut offline).unwrap();
        assert_eq!(served, Served::Cache);
        assert_eq!(response.body, b"cached");
        assert!(cache.fetch("https://app.example/other", &mut offline).is_err());
    }

    #[test]
    fn refill_only_keeps_basic_200_http() {
        let mut cache = AssetCache::new();
        let mut net = |url: &str| -> Result<Response, FetchError> {
            Ok(match url {
                "https://app.example/a.js" => Response::ok("a"),
                "https://cdn.example/b.js" => Response::new(200, ResponseKind::Cors, "b"),
                "https://app.example/missing" => Response::new(404, ResponseKind::Basic, ""),
                _ => Response::ok("other"),
            })
        };
        for url in [
            "https://app.example/a.js",
            "https://cdn.example/b.js",
            "https://app.example/missing",
            "chrome-extension://x/y.js",
        ] {
            let (_, served) = cache.fetch(url, &mut net).unwrap();
            assert_eq!(served, Served::Network);
        }
        assert!(cache.contains("https://app.example/a.js"));
        assert!(!cache.contains("https://cdn.example/b.js"));
        assert!(!cache.contains("https://app.example/missing"));
        assert!(!cache.contains("chrome-extension://x/y.js"));
        let (_, served) = cache.fetch("https://app.example/a.js", &mut net).unwrap();
        assert_eq!(served, Served::Cache);
    }
}

//! Individual retrieval strategies for the resilient fetcher.
//!
//! Each strategy makes exactly one attempt per call and reports its failure
//! through the [`FetchError`] taxonomy; chaining and failure aggregation live
//! in [`super::ResilientFetcher`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::util::percent_encode;

/// Canonical host of the recognized raw-content mirror.
pub const RAW_MIRROR_HOST: &str = "raw.githubusercontent.com";

/// One retrieval strategy with a uniform result signature.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short identifier used in logs and failure diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this strategy can be attempted for the given URL at all.
    fn applies_to(&self, _url: &str) -> bool {
        true
    }

    /// Attempt the retrieval exactly once.
    async fn run(&self, client: &reqwest::Client, url: &str) -> Result<Value, FetchError>;
}

/// Issue a direct GET and parse the body as JSON.
///
/// Classification: transport failures (connect, timeout, unreadable body) are
/// [`FetchError::CrossOriginBlocked`]; a readable non-2xx response is
/// [`FetchError::HttpStatus`]; an unparseable body is [`FetchError::Malformed`].
pub(crate) async fn direct_get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<Value, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::CrossOriginBlocked(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::CrossOriginBlocked(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Strategy 1: plain direct fetch of the source URL.
pub struct DirectFetch;

#[async_trait]
impl FetchStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn run(&self, client: &reqwest::Client, url: &str) -> Result<Value, FetchError> {
        direct_get_json(client, url).await
    }
}

/// Strategy 2: relay through a third-party CORS proxy.
///
/// The relay wraps the target body in a `{contents: string}` envelope; the
/// `contents` string is parsed as the actual catalog document.
#[derive(Clone)]
pub struct ProxyRelay {
    base: String,
}

impl ProxyRelay {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub(crate) fn relay_url(&self, target: &str) -> String {
        format!("{}?url={}", self.base, percent_encode(target))
    }
}

/// Unwrap a relay envelope and parse its `contents` as JSON.
pub(crate) fn decode_relay_envelope(envelope: &Value) -> Result<Value, FetchError> {
    let contents = envelope
        .get("contents")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::Malformed("relay envelope missing contents".to_string()))?;
    serde_json::from_str(contents).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[async_trait]
impl FetchStrategy for ProxyRelay {
    fn name(&self) -> &'static str {
        "proxy-relay"
    }

    async fn run(&self, client: &reqwest::Client, url: &str) -> Result<Value, FetchError> {
        let relay_url = self.relay_url(url);
        debug!("Relaying through {}", self.base);
        let envelope = direct_get_json(client, &relay_url).await?;
        decode_relay_envelope(&envelope)
    }
}

/// Strategy 3: rewrite a raw-content mirror URL to its canonical form and
/// retry a direct GET. Only applicable when the URL host matches the
/// recognized mirror domain.
pub struct RawMirror;

/// Canonical raw-content form of a mirror URL, when the host matches.
pub(crate) fn rewrite_to_raw(url: &str) -> Option<String> {
    let marker = format!("{RAW_MIRROR_HOST}/");
    let suffix = url.split_once(&marker)?.1;
    if suffix.is_empty() {
        return None;
    }
    Some(format!("https://{RAW_MIRROR_HOST}/{suffix}"))
}

#[async_trait]
impl FetchStrategy for RawMirror {
    fn name(&self) -> &'static str {
        "raw-mirror"
    }

    fn applies_to(&self, url: &str) -> bool {
        rewrite_to_raw(url).is_some()
    }

    async fn run(&self, client: &reqwest::Client, url: &str) -> Result<Value, FetchError> {
        let rewritten = rewrite_to_raw(url).ok_or_else(|| {
            FetchError::Malformed(format!("not a recognized mirror URL: {url}"))
        })?;
        debug!("Rewrote mirror URL to {rewritten}");
        direct_get_json(client, &rewritten).await
    }
}

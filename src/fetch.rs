//! Resilient catalog fetching.
//!
//! Remote catalogs are retrieved through an ordered chain of strategies:
//! direct fetch, then a CORS proxy relay, then (for recognized mirror hosts)
//! a canonical raw-content rewrite. Each applicable strategy is attempted
//! exactly once per call; the first success wins, and only when every
//! strategy has failed is a single aggregated error reported.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchError, StrategyFailure};

pub mod strategy;

pub use strategy::{DirectFetch, FetchStrategy, ProxyRelay, RawMirror};

/// Retrieval of a remote catalog document, abstracted so sessions and tests
/// are independent of the network.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<Value, FetchError>;
}

/// Strategy-chaining fetcher over a shared HTTP client.
pub struct ResilientFetcher {
    client: reqwest::Client,
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl ResilientFetcher {
    /// Build a fetcher with the standard chain and a bounded per-attempt
    /// timeout.
    pub fn new(proxy_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            strategies: vec![
                Box::new(DirectFetch),
                Box::new(ProxyRelay::new(proxy_base)),
                Box::new(RawMirror),
            ],
        })
    }

    /// Build a fetcher over an explicit strategy chain.
    pub fn with_strategies(
        client: reqwest::Client,
        strategies: Vec<Box<dyn FetchStrategy>>,
    ) -> Self {
        Self { client, strategies }
    }
}

#[async_trait]
impl CatalogFetcher for ResilientFetcher {
    async fn fetch_document(&self, url: &str) -> Result<Value, FetchError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            if !strategy.applies_to(url) {
                debug!("Strategy {} not applicable to {url}", strategy.name());
                continue;
            }

            debug!("Attempting strategy {} for {url}", strategy.name());
            match strategy.run(&self.client, url).await {
                Ok(document) => return Ok(document),
                Err(error) => {
                    warn!("Strategy {} failed for {url}: {error}", strategy.name());
                    failures.push(StrategyFailure {
                        strategy: strategy.name(),
                        error,
                    });
                }
            }
        }

        Err(FetchError::AllStrategiesExhausted(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        applicable: bool,
        outcome: Result<Value, FetchError>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn ok(name: &'static str, value: Value) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    applicable: true,
                    outcome: Ok(value),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }

        fn err(name: &'static str, error: FetchError) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    applicable: true,
                    outcome: Err(error),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }

        fn inapplicable(name: &'static str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    applicable: false,
                    outcome: Err(FetchError::Malformed("should never run".into())),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl FetchStrategy for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn applies_to(&self, _url: &str) -> bool {
            self.applicable
        }

        async fn run(&self, _client: &reqwest::Client, _url: &str) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn fetcher(strategies: Vec<Box<dyn FetchStrategy>>) -> ResilientFetcher {
        ResilientFetcher::with_strategies(reqwest::Client::new(), strategies)
    }

    #[tokio::test]
    async fn first_success_wins_and_later_strategies_are_not_attempted() {
        let (a, a_calls) = Scripted::ok("direct", serde_json::json!([{"name": "Foo"}]));
        let (b, b_calls) = Scripted::ok("proxy-relay", serde_json::json!([]));
        let f = fetcher(vec![Box::new(a), Box::new(b)]);

        let doc = f.fetch_document("https://x/a.json").await.unwrap();
        assert_eq!(doc[0]["name"], "Foo");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blocked_direct_fetch_falls_through_to_relay() {
        let (a, a_calls) = Scripted::err(
            "direct",
            FetchError::CrossOriginBlocked("opaque response".into()),
        );
        let (b, b_calls) = Scripted::ok("proxy-relay", serde_json::json!([{"name": "Baz"}]));
        let f = fetcher(vec![Box::new(a), Box::new(b)]);

        let doc = f.fetch_document("https://x/a.json").await.unwrap();
        assert_eq!(doc[0]["name"], "Baz");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inapplicable_strategies_are_skipped_entirely() {
        let (a, _) = Scripted::err("direct", FetchError::HttpStatus(500));
        let (b, b_calls) = Scripted::inapplicable("raw-mirror");
        let f = fetcher(vec![Box::new(a), Box::new(b)]);

        let err = f.fetch_document("https://example.com/a.json").await.unwrap_err();
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
        match err {
            FetchError::AllStrategiesExhausted(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].strategy, "direct");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn exhausted_chain_aggregates_every_failure_in_order() {
        let (a, _) = Scripted::err(
            "direct",
            FetchError::CrossOriginBlocked("opaque response".into()),
        );
        let (b, _) = Scripted::err("proxy-relay", FetchError::HttpStatus(502));
        let (c, _) = Scripted::err("raw-mirror", FetchError::Malformed("not json".into()));
        let f = fetcher(vec![Box::new(a), Box::new(b), Box::new(c)]);

        let err = f.fetch_document("https://x/a.json").await.unwrap_err();
        match &err {
            FetchError::AllStrategiesExhausted(failures) => {
                let names: Vec<_> = failures.iter().map(|f| f.strategy).collect();
                assert_eq!(names, vec!["direct", "proxy-relay", "raw-mirror"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_cross_origin_block());
    }

    #[tokio::test]
    async fn strategies_are_attempted_exactly_once_per_call() {
        let (a, a_calls) = Scripted::err("direct", FetchError::HttpStatus(404));
        let f = fetcher(vec![Box::new(a)]);

        let _ = f.fetch_document("https://x/a.json").await;
        let _ = f.fetch_document("https://x/a.json").await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    }
}

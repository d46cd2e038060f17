//! Best-effort availability probing.
//!
//! Probes run independently of the main fetch path and only update a status
//! indicator; their failures are silent by design and never gate session
//! operations. Reachability follows the same direct-then-proxy order as the
//! resilient fetcher, but payload correctness is irrelevant here: any
//! readable confirmation counts.

use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::debug;

use crate::fetch::ProxyRelay;
use crate::types::{AvailabilityStatus, Source};

/// Whether a relay envelope confirms the target body was readable through
/// the proxy.
fn relay_confirms(envelope: &Value) -> bool {
    envelope
        .get("contents")
        .and_then(Value::as_str)
        .is_some_and(|contents| !contents.is_empty())
}

/// Probes sources for display-only up/down status.
#[derive(Clone)]
pub struct AvailabilityProber {
    client: reqwest::Client,
    relay: ProxyRelay,
}

impl AvailabilityProber {
    pub fn new(proxy_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            relay: ProxyRelay::new(proxy_base),
        })
    }

    /// Determine a binary reachability status for one source.
    ///
    /// A readable OK response, directly or relayed, counts as available;
    /// exhausting both paths yields [`AvailabilityStatus::Unavailable`]. The
    /// raw-content mirror strategy is not consulted here.
    pub async fn probe(&self, source: &Source) -> AvailabilityStatus {
        if let Ok(response) = self.client.get(&source.url).send().await {
            if response.status().is_success() {
                return AvailabilityStatus::Available;
            }
            debug!(
                "Direct probe of {:?} returned HTTP {}",
                source.name,
                response.status()
            );
        }

        if let Ok(response) = self.client.get(self.relay.relay_url(&source.url)).send().await {
            if response.status().is_success() {
                if let Ok(envelope) = response.json::<Value>().await {
                    if relay_confirms(&envelope) {
                        return AvailabilityStatus::Available;
                    }
                }
            }
        }

        AvailabilityStatus::Unavailable
    }

    /// Probe every source concurrently, one independent task each.
    ///
    /// Results are `(registry index, status)` pairs in completion order; no
    /// ordering is guaranteed relative to other probes or to session fetches.
    pub async fn probe_all(&self, sources: &[Source]) -> Vec<(usize, AvailabilityStatus)> {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.iter().cloned().enumerate() {
            let prober = self.clone();
            tasks.spawn(async move { (index, prober.probe(&source).await) });
        }

        let mut statuses = Vec::with_capacity(sources.len());
        while let Some(joined) = tasks.join_next().await {
            if let Ok(result) = joined {
                statuses.push(result);
            }
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relay_confirmation_requires_nonempty_contents() {
        assert!(relay_confirms(&json!({"contents": "[{\"name\":\"x\"}]"})));
        // Readability is all that matters; the body need not be JSON.
        assert!(relay_confirms(&json!({"contents": "<html>catalog</html>"})));

        assert!(!relay_confirms(&json!({"contents": ""})));
        assert!(!relay_confirms(&json!({"contents": null})));
        assert!(!relay_confirms(&json!({"status": {"http_code": 200}})));
    }
}

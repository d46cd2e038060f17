//! Source registry loading.
//!
//! The registry is a first-party, trusted JSON array of `{name, url}`
//! objects; no field-name fallback applies here. Loading does not retry
//! internally: on failure the caller renders a retry affordance that invokes
//! [`load_sources`] again.

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::types::Source;

/// Load and parse the source registry document.
///
/// Fails with [`LoadError::Unreachable`] when the document cannot be read,
/// or [`LoadError::Malformed`] when the body is not a JSON array of objects
/// with `name` and `url` string fields.
pub async fn load_sources(path: &Path) -> Result<Vec<Source>, LoadError> {
    debug!("Loading source registry from {}", path.display());

    let body = fs::read_to_string(path)
        .await
        .map_err(LoadError::Unreachable)?;

    let sources: Vec<Source> =
        serde_json::from_str(&body).map_err(|e| LoadError::Malformed(e.to_string()))?;

    info!("Loaded {} catalog source(s)", sources.len());
    Ok(sources)
}
